// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Interface to the chip power management driver

use core::time::Duration;

use crate::PinMask;
use crate::PinNumber;
use crate::PowerDomain;
use crate::PowerOption;
use crate::Pull;
use crate::WakeupCause;
use crate::WakeupLevel;

/// Low-level power management primitives of a chip
///
/// Every method maps to a single driver operation. Implementations trust
/// their arguments: range checks are done by the
/// [`SleepController`](crate::SleepController).
pub trait PowerManagementBackend {
    /// Number of GPIO pads on the chip
    const PIN_COUNT: PinNumber;

    /// Configure a pin as a digital input with a pull resistor
    ///
    /// The input buffer is enabled and the output driver is disabled.
    fn configure_input(&mut self, pin: PinNumber, pull: Pull);

    /// Check whether a pin can wake up the chip from deep sleep
    fn is_wakeup_capable(&self, pin: PinNumber) -> bool;

    /// Enable GPIO wakeup on all pins in a mask at a level
    fn enable_gpio_wakeup(&mut self, mask: PinMask, level: WakeupLevel);

    /// Disable GPIO wakeup
    fn disable_gpio_wakeup(&mut self);

    /// Enable timer wakeup after a duration
    fn enable_timer_wakeup(&mut self, duration: Duration);

    /// Check whether a pin can hold its level during deep sleep
    fn is_hold_capable(&self, pin: PinNumber) -> bool;

    /// Hold the current level of a pin during deep sleep
    fn enable_hold(&mut self, pin: PinNumber);

    /// Release the hold of a pin
    fn disable_hold(&mut self, pin: PinNumber);

    /// Return the reason of the last wakeup
    fn wakeup_cause(&self) -> WakeupCause;

    /// Configure the power state of a domain during deep sleep
    fn configure_power_domain(&mut self, domain: PowerDomain, option: PowerOption);

    /// Enter deep sleep
    ///
    /// The chip restarts from scratch when it wakes up.
    fn start_deep_sleep(&mut self) -> !;
}
