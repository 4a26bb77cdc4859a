// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Functions for setting up the logging system

use core::str::FromStr;

use log::max_level;
use log::set_logger_racy;
use log::set_max_level_racy;
use log::trace;
use log::Level;
use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;

use embassy_time::Instant;

use esp_println::println;

/// Setup logging
///
/// The log level is read at build time from the environment variable
/// `ESP_LOGLEVEL`, and logging is disabled if it is not set. Changing it
/// requires a clean rebuild because of
/// <https://github.com/rust-lang/cargo/issues/10358>
pub fn setup() {
    /// Log level
    const LEVEL: Option<&'static str> = option_env!("ESP_LOGLEVEL");

    // SAFETY:
    // Called once at boot, before any other code runs
    let result = unsafe { set_logger_racy(&UptimeLogger) };

    // SAFETY:
    // The logger was not set before
    unsafe { result.unwrap_unchecked() };

    if let Some(lvl) = LEVEL {
        let level = LevelFilter::from_str(lvl).unwrap_or(LevelFilter::Off);

        // SAFETY:
        // Called once at boot, before any other code runs
        unsafe { set_max_level_racy(level) };
    }

    trace!("Logger is ready");
}

/// Logger that prints messages to console, prefixed by the time since boot
///
/// Every boot after deep sleep starts from zero, so the prefix shows how long
/// the chip has been awake.
struct UptimeLogger;

impl Log for UptimeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record) {
        /// Modifier for restoring normal text style
        const RESET: &str = "\u{001B}[0m";
        /// Modifier for setting gray text
        const GRAY: &str = "\u{001B}[2m";
        /// Modifier for setting red text
        const RED: &str = "\u{001B}[31m";
        /// Modifier for setting green text
        const GREEN: &str = "\u{001B}[32m";
        /// Modifier for setting yellow text
        const YELLOW: &str = "\u{001B}[33m";
        /// Modifier for setting blue text
        const BLUE: &str = "\u{001B}[34m";
        /// Modifier for setting cyan text
        const CYAN: &str = "\u{001B}[35m";

        if !self.enabled(record.metadata()) {
            return;
        }

        let color = match record.level() {
            Level::Error => RED,
            Level::Warn => YELLOW,
            Level::Info => GREEN,
            Level::Debug => BLUE,
            Level::Trace => CYAN,
        };

        let uptime = Instant::now().as_millis();

        println!(
            "{GRAY}{:>6}.{:03}{RESET} {color}{:>5}{RESET} {GRAY}{}]{RESET} {}",
            uptime / 1000,
            uptime % 1000,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}
