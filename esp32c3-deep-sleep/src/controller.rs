// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Wakeup configuration and deep sleep entry

use core::time::Duration;

use log::debug;
use log::info;
use log::trace;
use log::warn;

use crate::Config;
use crate::Error;
use crate::LevelPolicy;
use crate::PinMask;
use crate::PinNumber;
use crate::PowerDomain;
use crate::PowerManagementBackend;
use crate::RetentionPolicy;
use crate::WakeupCause;
use crate::WakeupLevel;

/// Pins armed as GPIO wakeup sources, sharing a single level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WakeupPinSet {
    /// Armed pins
    mask: PinMask,

    /// Level shared by all armed pins
    level: WakeupLevel,
}

impl WakeupPinSet {
    /// The empty set
    const EMPTY: Self = Self {
        mask: PinMask::EMPTY,
        level: WakeupLevel::High,
    };

    /// Return the armed pins
    #[must_use]
    pub const fn mask(&self) -> PinMask {
        self.mask
    }

    /// Return the level shared by all armed pins
    #[must_use]
    pub const fn level(&self) -> WakeupLevel {
        self.level
    }

    /// Check whether no pin is armed
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }
}

impl Default for WakeupPinSet {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A controller for deep sleep wakeup sources and retention memory
///
/// The controller accumulates the wakeup configuration during a boot and
/// commits it when entering deep sleep. Nothing survives deep sleep: the
/// chip restarts from scratch and the firmware creates a new controller.
#[derive(Debug)]
pub struct SleepController<B> {
    /// Power management driver
    backend: B,

    /// Configuration
    config: Config,

    /// Pins armed as GPIO wakeup sources
    wakeup_pins: WakeupPinSet,

    /// Duration of the armed timer wakeup
    timer_wakeup: Option<Duration>,
}

impl<B> SleepController<B>
where
    B: PowerManagementBackend,
{
    /// Create a new controller with default configuration
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, Config::default())
    }

    /// Create a new controller
    #[must_use]
    pub fn with_config(backend: B, config: Config) -> Self {
        Self {
            backend,
            config,
            wakeup_pins: WakeupPinSet::EMPTY,
            timer_wakeup: None,
        }
    }

    /// Arm a pin as a GPIO wakeup source
    ///
    /// The pin is configured as input and pulled towards the level opposite
    /// to `wake_on_high`, then GPIO wakeup is reconfigured with all armed
    /// pins.
    ///
    /// All armed pins share one level. With [`LevelPolicy::LastWins`] the
    /// level of this call applies to all previously armed pins as well.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot wake up the chip, or if its level
    /// differs from the armed pins under [`LevelPolicy::RejectConflicts`].
    pub fn add_wakeup_pin(&mut self, pin: PinNumber, wake_on_high: bool) -> Result<(), Error> {
        if !self.backend.is_wakeup_capable(pin) {
            return Err(Error::UnsupportedWakeupPin(pin));
        }

        let level = WakeupLevel::from_wake_on_high(wake_on_high);
        let others = self.wakeup_pins.mask.without(pin);
        let armed = self.wakeup_pins.level;
        if !others.is_empty() && armed != level {
            match self.config.level_policy {
                LevelPolicy::LastWins => {
                    warn!("Wakeup level {level:?} of GPIO{pin} overrides level {armed:?} of {others}");
                }
                LevelPolicy::RejectConflicts => {
                    return Err(Error::ConflictingLevel {
                        pin,
                        requested: level,
                        armed,
                    });
                }
            }
        }

        let pull = level.idle_pull();
        debug!("Configure GPIO{pin} as input with pull {pull:?}");
        self.backend.configure_input(pin, pull);

        self.wakeup_pins = WakeupPinSet {
            mask: self.wakeup_pins.mask.with(pin),
            level,
        };

        let mask = self.wakeup_pins.mask;
        debug!("Enable GPIO wakeup on {mask} at level {level:?}");
        trace!("GPIO wakeup mask = {:#010b}", mask.bits());
        self.backend.disable_gpio_wakeup();
        self.backend.enable_gpio_wakeup(mask, level);

        Ok(())
    }

    /// Disarm all GPIO wakeup pins
    pub fn clear_wakeup_pins(&mut self) {
        debug!("Disable GPIO wakeup");
        self.wakeup_pins = WakeupPinSet::EMPTY;
        self.backend.disable_gpio_wakeup();
    }

    /// Arm a timer wakeup
    ///
    /// Calling this again replaces the duration. A timer wakeup cannot be
    /// disarmed, and it makes deep sleep retain the RTC memory.
    pub fn begin_timer_wakeup(&mut self, duration: Duration) {
        debug!("Enable timer wakeup after {duration:?}");
        self.backend.enable_timer_wakeup(duration);
        self.timer_wakeup = Some(duration);
    }

    /// Hold the level of a pin during deep sleep
    ///
    /// Pins without hold capability are silently skipped.
    pub fn hold_gpio(&mut self, pin: PinNumber) {
        if !self.backend.is_hold_capable(pin) {
            debug!("GPIO{pin} cannot be held, skipping");
            return;
        }

        debug!("Hold GPIO{pin}");
        self.backend.enable_hold(pin);
    }

    /// Release the hold of every pin
    pub fn release_all_holds(&mut self) {
        debug!("Release hold of all {} pins", B::PIN_COUNT);
        for pin in 0..B::PIN_COUNT {
            self.backend.disable_hold(pin);
        }
    }

    /// Return the reason of the last wakeup
    #[must_use]
    pub fn wakeup_cause(&self) -> WakeupCause {
        self.backend.wakeup_cause()
    }

    /// Return the armed GPIO wakeup pins
    #[must_use]
    pub const fn wakeup_pins(&self) -> WakeupPinSet {
        self.wakeup_pins
    }

    /// Return the duration of the armed timer wakeup
    #[must_use]
    pub const fn timer_wakeup(&self) -> Option<Duration> {
        self.timer_wakeup
    }

    /// Return the retention policy that deep sleep would apply now
    #[must_use]
    pub const fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::for_timer_wakeup(self.timer_wakeup.is_some())
    }

    /// Return the power management driver
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Return the power management driver for direct access
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Configure retention memory and return the deep sleep entry
    ///
    /// RTC slow and fast memory stay powered if a timer wakeup is armed, and
    /// are powered down otherwise.
    pub fn prepare_deep_sleep(&mut self) -> DeepSleep<'_, B> {
        let policy = self.retention_policy();
        let option = policy.power_option();

        info!("Retention policy: {policy:?}");
        for domain in PowerDomain::RETENTION {
            debug!("Configure {domain:?} as {option:?} during deep sleep");
            self.backend.configure_power_domain(domain, option);
        }

        DeepSleep {
            backend: &mut self.backend,
            policy,
        }
    }

    /// Enter deep sleep
    ///
    /// This never returns, the chip restarts on wakeup.
    pub fn go_deep_sleep(&mut self) -> ! {
        if let Some(duration) = self.timer_wakeup {
            info!("Wakeup timer armed for {duration:?}");
        }
        if !self.wakeup_pins.is_empty() {
            info!(
                "Wakeup pins {} armed at level {:?}",
                self.wakeup_pins.mask, self.wakeup_pins.level
            );
        }

        self.prepare_deep_sleep().enter()
    }
}

/// A prepared deep sleep entry
#[must_use = "Deep sleep is only entered by calling `enter()`"]
#[derive(Debug)]
pub struct DeepSleep<'backend, B> {
    /// Power management driver
    backend: &'backend mut B,

    /// Applied retention policy
    policy: RetentionPolicy,
}

impl<B> DeepSleep<'_, B>
where
    B: PowerManagementBackend,
{
    /// Return the applied retention policy
    #[must_use]
    pub const fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Enter deep sleep
    pub fn enter(self) -> ! {
        info!("Entering deep sleep");
        self.backend.start_deep_sleep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::PadMode;
    use crate::testing::SimulatedBackend;
    use crate::PowerOption;
    use crate::Pull;

    /// Create a controller over a freshly booted simulated chip
    fn controller() -> SleepController<SimulatedBackend> {
        SleepController::new(SimulatedBackend::new())
    }

    #[test]
    fn wakeup_pins_accumulate_and_last_level_wins() -> Result<(), Error> {
        let mut controller = controller();

        controller.add_wakeup_pin(3, true)?;
        assert_eq!(
            controller.backend().gpio_wakeup,
            Some((PinMask::EMPTY.with(3), WakeupLevel::High))
        );
        assert_eq!(controller.backend().pads[3], PadMode::Input(Pull::Down));

        controller.add_wakeup_pin(5, false)?;
        assert_eq!(
            controller.backend().gpio_wakeup,
            Some((PinMask::EMPTY.with(3).with(5), WakeupLevel::Low))
        );
        assert_eq!(controller.backend().pads[5], PadMode::Input(Pull::Up));
        assert_eq!(controller.wakeup_pins().mask(), PinMask::from_bits(0b10_1000));
        assert_eq!(controller.wakeup_pins().level(), WakeupLevel::Low);

        controller.clear_wakeup_pins();
        assert_eq!(controller.backend().gpio_wakeup, None);
        assert!(controller.wakeup_pins().is_empty());

        Ok(())
    }

    #[test]
    fn backend_mask_is_union_of_added_pins() -> Result<(), Error> {
        let sequences: [&[(PinNumber, bool)]; 4] = [
            &[(0, true)],
            &[(1, false), (1, false), (4, false)],
            &[(5, true), (0, false), (2, true), (3, true)],
            &[(0, true), (1, true), (2, true), (3, true), (4, true), (5, false)],
        ];

        for sequence in sequences {
            let mut controller = controller();
            for &(pin, wake_on_high) in sequence {
                controller.add_wakeup_pin(pin, wake_on_high)?;
            }

            let expected_mask: PinMask = sequence.iter().map(|&(pin, _)| pin).collect();
            let expected_level = sequence
                .last()
                .map(|&(_, wake_on_high)| WakeupLevel::from_wake_on_high(wake_on_high));
            let actual = controller.backend().gpio_wakeup;
            assert_eq!(actual.map(|(mask, _)| mask), Some(expected_mask));
            assert_eq!(actual.map(|(_, level)| level), expected_level);
        }

        Ok(())
    }

    #[test]
    fn adding_pin_reapplies_whole_configuration() -> Result<(), Error> {
        let mut controller = controller();

        controller.add_wakeup_pin(2, false)?;
        controller.add_wakeup_pin(4, false)?;

        assert_eq!(controller.backend().gpio_wakeup_disables, 2);

        Ok(())
    }

    #[test]
    fn output_pad_becomes_pulled_input_when_armed() -> Result<(), Error> {
        let mut controller = controller();
        controller.backend_mut().pads[2] = PadMode::Output;

        controller.add_wakeup_pin(2, false)?;

        assert_eq!(controller.backend().pads[2], PadMode::Input(Pull::Up));

        Ok(())
    }

    #[test]
    fn clearing_wakeup_pins_is_idempotent() {
        let mut controller = controller();

        controller.clear_wakeup_pins();
        controller.clear_wakeup_pins();

        assert_eq!(controller.backend().gpio_wakeup, None);
        assert!(controller.wakeup_pins().is_empty());
    }

    #[test]
    fn pin_without_wakeup_capability_is_rejected() {
        let mut controller = controller();

        let result = controller.add_wakeup_pin(10, true);

        assert_eq!(result, Err(Error::UnsupportedWakeupPin(10)));
        assert_eq!(controller.backend().gpio_wakeup, None);
        assert_eq!(controller.backend().pads[10], PadMode::Unconfigured);
    }

    #[test]
    fn conflicting_level_is_rejected_when_requested() -> Result<(), Error> {
        let config = Config::default().with_level_policy(LevelPolicy::RejectConflicts);
        let mut controller = SleepController::with_config(SimulatedBackend::new(), config);

        controller.add_wakeup_pin(3, true)?;
        let result = controller.add_wakeup_pin(5, false);

        assert_eq!(
            result,
            Err(Error::ConflictingLevel {
                pin: 5,
                requested: WakeupLevel::Low,
                armed: WakeupLevel::High,
            })
        );
        assert_eq!(
            controller.backend().gpio_wakeup,
            Some((PinMask::EMPTY.with(3), WakeupLevel::High))
        );
        assert_eq!(controller.backend().pads[5], PadMode::Unconfigured);

        // Re-arming the only armed pin with a new level is not a conflict
        controller.add_wakeup_pin(3, false)?;
        assert_eq!(
            controller.backend().gpio_wakeup,
            Some((PinMask::EMPTY.with(3), WakeupLevel::Low))
        );

        Ok(())
    }

    #[test]
    fn timer_wakeup_forwards_latest_duration() {
        let mut controller = controller();
        assert_eq!(controller.retention_policy(), RetentionPolicy::PowerDown);

        controller.begin_timer_wakeup(Duration::from_secs(10));
        controller.begin_timer_wakeup(Duration::from_micros(5_000_000));

        assert_eq!(controller.timer_wakeup(), Some(Duration::from_secs(5)));
        assert_eq!(
            controller.backend().timer_wakeup,
            Some(Duration::from_secs(5))
        );
        assert_eq!(controller.retention_policy(), RetentionPolicy::Retain);
    }

    #[test]
    fn sleep_with_timer_wakeup_retains_memory() {
        let mut controller = controller();
        controller.begin_timer_wakeup(Duration::from_micros(5_000_000));

        let policy = controller.prepare_deep_sleep().policy();

        assert_eq!(policy, RetentionPolicy::Retain);
        assert_eq!(controller.backend().slow_memory, Some(PowerOption::On));
        assert_eq!(controller.backend().fast_memory, Some(PowerOption::On));
        assert_eq!(
            controller.backend().timer_wakeup,
            Some(Duration::from_micros(5_000_000))
        );
    }

    #[test]
    fn sleep_without_timer_wakeup_powers_memory_down() -> Result<(), Error> {
        let mut controller = controller();
        controller.add_wakeup_pin(2, false)?;

        let policy = controller.prepare_deep_sleep().policy();

        assert_eq!(policy, RetentionPolicy::PowerDown);
        assert_eq!(controller.backend().slow_memory, Some(PowerOption::Off));
        assert_eq!(controller.backend().fast_memory, Some(PowerOption::Off));

        Ok(())
    }

    #[test]
    #[should_panic(expected = "deep sleep entered")]
    fn going_to_deep_sleep_enters_deep_sleep() {
        let mut controller = controller();
        controller.begin_timer_wakeup(Duration::from_secs(5));

        controller.go_deep_sleep();
    }

    #[test]
    fn pin_without_hold_capability_is_skipped() {
        let mut controller = controller();
        controller.hold_gpio(2);

        controller.hold_gpio(10);
        controller.hold_gpio(200);

        assert_eq!(controller.backend().held, 0b100);
    }

    #[test]
    fn releasing_holds_sweeps_every_pin() {
        let mut controller = controller();
        controller.hold_gpio(0);
        controller.hold_gpio(5);
        controller.backend_mut().held |= 1 << 21;

        controller.release_all_holds();

        assert_eq!(controller.backend().held, 0);
    }

    #[test]
    fn releasing_holds_without_holds_is_harmless() {
        let mut controller = controller();

        controller.release_all_holds();

        assert_eq!(controller.backend().held, 0);
    }

    #[test]
    fn wakeup_cause_comes_from_backend() {
        let mut backend = SimulatedBackend::new();
        backend.cause = WakeupCause::Timer;
        let controller = SleepController::new(backend);

        assert_eq!(controller.wakeup_cause(), WakeupCause::Timer);
        assert!(controller.wakeup_cause().is_wakeup());
        assert!(!WakeupCause::Undefined.is_wakeup());
    }
}
