// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Wakeup causes

/// The reason the chip woke up from its last deep sleep
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeupCause {
    /// Not a wakeup from deep sleep, e.g. power-on or reset
    Undefined,

    /// Timer wakeup
    Timer,

    /// GPIO wakeup
    Gpio,

    /// UART wakeup
    Uart,

    /// Any other wakeup source
    Other,
}

impl WakeupCause {
    /// Check whether the chip was woken up from deep sleep
    #[must_use]
    pub const fn is_wakeup(self) -> bool {
        !matches!(self, Self::Undefined)
    }
}
