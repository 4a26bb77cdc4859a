// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Firmware waking up periodically or when a button is pressed

#![no_std]
#![no_main]

use log::error;
use log::info;
use log::warn;

use embassy_executor::Spawner;

use embassy_time::Duration;
use embassy_time::Timer;

use esp_hal::clock::CpuClock;
use esp_hal::gpio::Level;
use esp_hal::gpio::Output;
use esp_hal::init as initialize_esp_hal;
use esp_hal::prelude::*; // main
use esp_hal::timer::systimer::SystemTimer;
use esp_hal::timer::systimer::Target;
use esp_hal::Config as EspConfig;

use esp_hal_embassy::init as initialize_embassy;

use esp_backtrace as _;

use esp32c3_deep_sleep::EspBackend;
use esp32c3_deep_sleep::Error as SleepError;
use esp32c3_deep_sleep::PinNumber;
use esp32c3_deep_sleep::SleepController;
use esp32c3_deep_sleep::WakeupCause;

mod logging;
use self::logging::setup as setup_logging;

mod retained;
use self::retained::increment_boot_count;

/// Pin connected to a button to ground
const BUTTON_PIN: PinNumber = 2;

/// Wake up when the button pin goes high instead of low
const WAKE_ON_HIGH: bool = false;

/// Pin connected to a LED
///
/// This must match the peripheral used for the LED output.
const LED_PIN: PinNumber = 3;

/// Duration of deep sleep
const DEEP_SLEEP_DURATION: Duration = Duration::from_secs(60);

/// Period to wait before going to deep sleep
const AWAKE_PERIOD: Duration = Duration::from_secs(10);

/// Main task
#[main]
async fn main(_spawner: Spawner) {
    setup_logging();

    let peripherals = initialize_esp_hal({
        let mut config = EspConfig::default();
        config.cpu_clock = CpuClock::max();
        config
    });

    let systimer = SystemTimer::new(peripherals.SYSTIMER).split::<Target>();
    initialize_embassy(systimer.alarm0);

    let boot_count = increment_boot_count();
    info!("Current boot count = {boot_count}");

    let mut controller = SleepController::new(EspBackend::new(peripherals.LPWR));

    match controller.wakeup_cause() {
        WakeupCause::Undefined => info!("Booted after power-on or reset"),
        WakeupCause::Timer => info!("Woken up by timer"),
        WakeupCause::Gpio => info!("Woken up by button on GPIO{BUTTON_PIN}"),
        cause => warn!("Woken up by unexpected cause {cause:?}"),
    }

    info!("Release pins held during deep sleep");
    controller.release_all_holds();

    info!("Turn on LED");
    let mut led = Output::new(peripherals.GPIO3, Level::High);

    if let Err(error) = configure_wakeup(&mut controller) {
        error!("Error while configuring wakeup sources: {error:?}");
    }

    info!("Stay awake for {}s", AWAKE_PERIOD.as_secs());
    Timer::after(AWAKE_PERIOD).await;

    info!("Turn off LED and keep it off during deep sleep");
    led.set_low();
    controller.hold_gpio(LED_PIN);

    controller.go_deep_sleep();
}

/// Arm the timer and button wakeup sources
///
/// The timer is armed first, so that the chip wakes up eventually even if the
/// button cannot be armed.
fn configure_wakeup(controller: &mut SleepController<EspBackend>) -> Result<(), Error> {
    info!("Arm timer wakeup after {}s", DEEP_SLEEP_DURATION.as_secs());
    controller.begin_timer_wakeup(DEEP_SLEEP_DURATION.into());

    info!("Arm button wakeup on GPIO{BUTTON_PIN}");
    controller.add_wakeup_pin(BUTTON_PIN, WAKE_ON_HIGH)?;

    Ok(())
}

/// An error
#[derive(Debug)]
enum Error {
    /// An error within sleep configuration
    #[expect(unused, reason = "Never read directly")]
    Sleep(SleepError),
}

impl From<SleepError> for Error {
    fn from(error: SleepError) -> Self {
        Self::Sleep(error)
    }
}
