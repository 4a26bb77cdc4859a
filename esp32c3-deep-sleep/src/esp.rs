// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Power management backend for ESP32-C3 based on `esp-hal`
//!
//! GPIO0 to GPIO5 are the only pads with RTC functions on ESP32-C3, so they
//! are the only ones that can wake up the chip from deep sleep or hold their
//! level through it. Wakeup sources are recorded and applied by
//! [`Rtc::sleep`] right before entering deep sleep, like `esp-hal` does.
//!
//! ESP32-C3 has a single RTC memory, the fast one. Its content survives deep
//! sleep in both power options: the option only selects whether the memory
//! stays at full power or is forced into its low-power retention state.

use core::time::Duration;

use log::debug;

use heapless::Vec;

use esp_hal::gpio::AnyPin;
use esp_hal::gpio::Input;
use esp_hal::gpio::InputConfig;
use esp_hal::gpio::Pull as EspPull;
use esp_hal::gpio::RtcPin;
use esp_hal::gpio::RtcPinWithResistors;
use esp_hal::peripherals::LPWR;
use esp_hal::rtc_cntl::sleep::RtcSleepConfig;
use esp_hal::rtc_cntl::sleep::RtcioWakeupSource;
use esp_hal::rtc_cntl::sleep::TimerWakeupSource;
use esp_hal::rtc_cntl::sleep::WakeupLevel as EspWakeupLevel;
use esp_hal::rtc_cntl::wakeup_cause;
use esp_hal::rtc_cntl::Rtc;
use esp_hal::rtc_cntl::SleepSource;

use crate::PinMask;
use crate::PinNumber;
use crate::PowerDomain;
use crate::PowerManagementBackend;
use crate::PowerOption;
use crate::Pull;
use crate::WakeupCause;
use crate::WakeupLevel;

/// Number of GPIO pads
const PIN_COUNT: PinNumber = 22;

/// Number of pads with RTC functions
const RTC_PIN_COUNT: usize = 6;

/// Pads with RTC functions
const RTC_PINS: [PinNumber; RTC_PIN_COUNT] = [0, 1, 2, 3, 4, 5];

/// Power management backend for ESP32-C3
pub struct EspBackend {
    /// RTC controller
    rtc: Rtc<'static>,

    /// Sleep configuration, starting from `esp-hal` deep sleep defaults
    sleep_config: RtcSleepConfig,

    /// Power option of RTC fast memory during sleep
    fast_memory: Option<PowerOption>,

    /// Pins and level of the GPIO wakeup
    gpio_wakeup: Option<(PinMask, WakeupLevel)>,

    /// Duration of the timer wakeup
    timer_wakeup: Option<Duration>,
}

impl EspBackend {
    /// Create a new backend
    #[must_use]
    pub fn new(rtc_cntl: LPWR) -> Self {
        Self {
            rtc: Rtc::new(rtc_cntl),
            sleep_config: RtcSleepConfig::deep(),
            fast_memory: None,
            gpio_wakeup: None,
            timer_wakeup: None,
        }
    }

    /// Check whether a pad has RTC functions
    fn is_rtc_pin(pin: PinNumber) -> bool {
        RTC_PINS.contains(&pin)
    }

    /// Write the RTC fast memory power option to the power control register
    fn apply_fast_memory_power(option: PowerOption) {
        debug!("Setting RTC fast memory to {option:?} during sleep");
        LPWR::regs().dig_pwc().modify(|_, writer| {
            writer
                .fastmem_force_lpu()
                .bit(option.forces_power_up())
                .fastmem_force_lpd()
                .bit(option.forces_low_power())
        });
    }
}

impl PowerManagementBackend for EspBackend {
    const PIN_COUNT: PinNumber = PIN_COUNT;

    fn configure_input(&mut self, pin: PinNumber, pull: Pull) {
        let pull = match pull {
            Pull::Up => EspPull::Up,
            Pull::Down => EspPull::Down,
        };

        // SAFETY:
        // Wakeup pads are input only and owned by the sleep controller
        let pad = unsafe { AnyPin::steal(pin) };

        // Enables the input buffer and disables the output driver, the pad
        // keeps this configuration after the driver is dropped
        let _input = Input::new(pad, InputConfig::default().with_pull(pull));
    }

    fn is_wakeup_capable(&self, pin: PinNumber) -> bool {
        Self::is_rtc_pin(pin)
    }

    fn enable_gpio_wakeup(&mut self, mask: PinMask, level: WakeupLevel) {
        self.gpio_wakeup = Some((mask, level));
    }

    fn disable_gpio_wakeup(&mut self) {
        self.gpio_wakeup = None;
    }

    fn enable_timer_wakeup(&mut self, duration: Duration) {
        self.timer_wakeup = Some(duration);
    }

    fn is_hold_capable(&self, pin: PinNumber) -> bool {
        Self::is_rtc_pin(pin)
    }

    fn enable_hold(&mut self, pin: PinNumber) {
        // SAFETY:
        // Hold only latches the current pad state
        let pad = unsafe { AnyPin::steal(pin) };
        pad.rtcio_pad_hold(true);
    }

    fn disable_hold(&mut self, pin: PinNumber) {
        if Self::is_rtc_pin(pin) {
            // SAFETY:
            // Releasing hold does not change the pad configuration
            let pad = unsafe { AnyPin::steal(pin) };
            pad.rtcio_pad_hold(false);
        } else {
            let mask = 1_u32 << pin;
            LPWR::regs().dig_pad_hold().modify(|reader, writer| {
                // SAFETY:
                // Every bit of the register is the hold of a digital pad
                unsafe { writer.bits(reader.bits() & !mask) }
            });
        }
    }

    fn wakeup_cause(&self) -> WakeupCause {
        match wakeup_cause() {
            SleepSource::Undefined => WakeupCause::Undefined,
            SleepSource::Timer => WakeupCause::Timer,
            SleepSource::Gpio => WakeupCause::Gpio,
            SleepSource::Uart => WakeupCause::Uart,
            _ => WakeupCause::Other,
        }
    }

    fn configure_power_domain(&mut self, domain: PowerDomain, option: PowerOption) {
        match domain {
            PowerDomain::RtcSlowMemory => {
                debug!("ESP32-C3 has no separate RTC slow memory, ignoring {option:?}");
            }
            PowerDomain::RtcFastMemory => self.fast_memory = Some(option),
        }
    }

    fn start_deep_sleep(&mut self) -> ! {
        let (mask, level) = self
            .gpio_wakeup
            .unwrap_or((PinMask::EMPTY, WakeupLevel::High));
        let level = match level {
            WakeupLevel::High => EspWakeupLevel::High,
            WakeupLevel::Low => EspWakeupLevel::Low,
        };

        // SAFETY:
        // Nothing else runs after deep sleep is entered
        let mut pads = RTC_PINS.map(|pin| unsafe { AnyPin::steal(pin) });

        // At most one entry per RTC pad, so the vector never overflows
        let mut wakeup_pins: Vec<(&mut dyn RtcPinWithResistors, EspWakeupLevel), RTC_PIN_COUNT> =
            RTC_PINS
                .iter()
                .zip(pads.iter_mut())
                .filter(|(pin, _)| mask.contains(**pin))
                .map(|(_, pad)| (pad as &mut dyn RtcPinWithResistors, level))
                .collect();

        // An empty set of pins does not enable GPIO wakeup
        let rtcio = RtcioWakeupSource::new(&mut wakeup_pins);

        let config = self.sleep_config;
        debug!("Sleep configuration: {config:?}");

        if let Some(option) = self.fast_memory {
            Self::apply_fast_memory_power(option);
        }

        if let Some(duration) = self.timer_wakeup {
            let timer = TimerWakeupSource::new(duration);
            self.rtc.sleep(&config, &[&timer, &rtcio]);
        } else {
            self.rtc.sleep(&config, &[&rtcio]);
        }

        // Deep sleep restarts the chip, execution never gets here
        loop {
            core::hint::spin_loop();
        }
    }
}
