// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Simulated power management backend for tests

use core::time::Duration;

use crate::PinMask;
use crate::PinNumber;
use crate::PowerDomain;
use crate::PowerManagementBackend;
use crate::PowerOption;
use crate::Pull;
use crate::WakeupCause;
use crate::WakeupLevel;

/// Number of simulated pads, as on ESP32-C3
const PIN_COUNT: usize = 22;

/// Number of simulated pads with RTC functions
const RTC_PIN_COUNT: PinNumber = 6;

/// Message of the panic raised when entering deep sleep
pub const DEEP_SLEEP_ENTERED: &str = "deep sleep entered";

/// Direction of a simulated pad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadMode {
    /// Pad left as after reset
    Unconfigured,

    /// Output driver enabled
    Output,

    /// Input buffer enabled and output driver disabled, with a pull resistor
    Input(Pull),
}

/// A backend recording the state of a simulated chip
#[derive(Debug)]
pub struct SimulatedBackend {
    /// Direction of each pad
    pub pads: [PadMode; PIN_COUNT],

    /// Active GPIO wakeup configuration
    pub gpio_wakeup: Option<(PinMask, WakeupLevel)>,

    /// Number of times GPIO wakeup was disabled
    pub gpio_wakeup_disables: usize,

    /// Armed timer wakeup
    pub timer_wakeup: Option<Duration>,

    /// Held pads, bit `n` standing for GPIO `n`
    pub held: u32,

    /// Power option of RTC slow memory
    pub slow_memory: Option<PowerOption>,

    /// Power option of RTC fast memory
    pub fast_memory: Option<PowerOption>,

    /// Reported wakeup cause
    pub cause: WakeupCause,
}

impl SimulatedBackend {
    /// Create a backend for a freshly booted chip
    pub const fn new() -> Self {
        Self {
            pads: [PadMode::Unconfigured; PIN_COUNT],
            gpio_wakeup: None,
            gpio_wakeup_disables: 0,
            timer_wakeup: None,
            held: 0,
            slow_memory: None,
            fast_memory: None,
            cause: WakeupCause::Undefined,
        }
    }

    /// Return the bit of a pad in the hold register
    fn hold_bit(pin: PinNumber) -> u32 {
        1 << pin
    }
}

impl PowerManagementBackend for SimulatedBackend {
    #[expect(clippy::cast_possible_truncation, reason = "There are 22 pads")]
    const PIN_COUNT: PinNumber = PIN_COUNT as PinNumber;

    fn configure_input(&mut self, pin: PinNumber, pull: Pull) {
        if let Some(pad) = self.pads.get_mut(usize::from(pin)) {
            *pad = PadMode::Input(pull);
        }
    }

    fn is_wakeup_capable(&self, pin: PinNumber) -> bool {
        pin < RTC_PIN_COUNT
    }

    fn enable_gpio_wakeup(&mut self, mask: PinMask, level: WakeupLevel) {
        self.gpio_wakeup = Some((mask, level));
    }

    fn disable_gpio_wakeup(&mut self) {
        self.gpio_wakeup = None;
        self.gpio_wakeup_disables += 1;
    }

    fn enable_timer_wakeup(&mut self, duration: Duration) {
        self.timer_wakeup = Some(duration);
    }

    fn is_hold_capable(&self, pin: PinNumber) -> bool {
        pin < RTC_PIN_COUNT
    }

    fn enable_hold(&mut self, pin: PinNumber) {
        self.held |= Self::hold_bit(pin);
    }

    fn disable_hold(&mut self, pin: PinNumber) {
        self.held &= !Self::hold_bit(pin);
    }

    fn wakeup_cause(&self) -> WakeupCause {
        self.cause
    }

    fn configure_power_domain(&mut self, domain: PowerDomain, option: PowerOption) {
        match domain {
            PowerDomain::RtcSlowMemory => self.slow_memory = Some(option),
            PowerDomain::RtcFastMemory => self.fast_memory = Some(option),
        }
    }

    #[expect(clippy::panic, reason = "A simulated chip cannot halt")]
    fn start_deep_sleep(&mut self) -> ! {
        panic!("{DEEP_SLEEP_ENTERED}");
    }
}
