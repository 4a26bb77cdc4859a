// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Deep sleep wakeup sources, GPIO hold and retention memory for ESP32-C3
//!
//! A [`SleepController`] accumulates the wakeup configuration of a boot
//! (GPIO wakeup pins sharing one level, an optional timer) and enters deep
//! sleep, keeping RTC memory powered only when a timer wakeup is armed.
//! Hardware access goes through a [`PowerManagementBackend`]; the
//! `esp32c3` feature provides one based on `esp-hal`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod backend;
pub use self::backend::PowerManagementBackend;

mod cause;
pub use self::cause::WakeupCause;

mod config;
pub use self::config::Config;
pub use self::config::LevelPolicy;

mod controller;
pub use self::controller::DeepSleep;
pub use self::controller::SleepController;
pub use self::controller::WakeupPinSet;

mod error;
pub use self::error::Error;

mod pin;
pub use self::pin::PinMask;
pub use self::pin::PinNumber;
pub use self::pin::Pull;
pub use self::pin::WakeupLevel;

mod power;
pub use self::power::PowerDomain;
pub use self::power::PowerOption;
pub use self::power::RetentionPolicy;

#[cfg(feature = "esp32c3")]
mod esp;
#[cfg(feature = "esp32c3")]
pub use self::esp::EspBackend;

#[cfg(test)]
mod testing;
