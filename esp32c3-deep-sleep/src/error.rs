// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Data structures and functions for error handling

use core::fmt;

use crate::PinNumber;
use crate::WakeupLevel;

/// An error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The pin cannot wake up the chip from deep sleep
    UnsupportedWakeupPin(PinNumber),

    /// The pin level conflicts with the level of the already armed pins
    ConflictingLevel {
        /// Pin being added
        pin: PinNumber,

        /// Level requested for the pin
        requested: WakeupLevel,

        /// Level of the already armed pins
        armed: WakeupLevel,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnsupportedWakeupPin(pin) => {
                write!(formatter, "GPIO{pin} cannot wake up from deep sleep")
            }
            Self::ConflictingLevel {
                pin,
                requested,
                armed,
            } => write!(
                formatter,
                "GPIO{pin} requested wakeup level {requested:?} but armed pins use {armed:?}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
