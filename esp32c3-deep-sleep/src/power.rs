// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Retention memory power domains

/// A power domain of the RTC memory that can stay powered during deep sleep
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerDomain {
    /// RTC slow memory
    RtcSlowMemory,

    /// RTC fast memory
    RtcFastMemory,
}

impl PowerDomain {
    /// All retention memory domains
    pub const RETENTION: [Self; 2] = [Self::RtcSlowMemory, Self::RtcFastMemory];
}

/// Power state of a domain during deep sleep
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerOption {
    /// Keep the domain powered
    On,

    /// Power the domain down
    Off,
}

impl PowerOption {
    /// Check whether the domain is kept at full power during sleep
    #[must_use]
    pub const fn forces_power_up(self) -> bool {
        matches!(self, Self::On)
    }

    /// Check whether the domain is forced into its low-power state during sleep
    #[must_use]
    pub const fn forces_low_power(self) -> bool {
        matches!(self, Self::Off)
    }
}

/// Policy for the retention memory during deep sleep
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep RTC slow and fast memory powered, so that their content survives
    Retain,

    /// Power RTC slow and fast memory down to minimize consumption
    PowerDown,
}

impl RetentionPolicy {
    /// Choose the policy depending on whether a timer wakeup is armed
    ///
    /// Firmware woken up by a timer usually keeps counters or timestamps in
    /// RTC memory, so memory is retained whenever a timer wakeup is armed.
    #[must_use]
    pub const fn for_timer_wakeup(timer_wakeup_armed: bool) -> Self {
        if timer_wakeup_armed {
            Self::Retain
        } else {
            Self::PowerDown
        }
    }

    /// Return the power option applied to every retention domain
    #[must_use]
    pub const fn power_option(self) -> PowerOption {
        match self {
            Self::Retain => PowerOption::On,
            Self::PowerDown => PowerOption::Off,
        }
    }
}
