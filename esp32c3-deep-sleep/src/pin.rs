// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! GPIO pin numbers, pin masks and levels

use core::fmt;

/// A GPIO pin number
pub type PinNumber = u8;

/// Maximal number of pins a [`PinMask`] can represent
const MASK_WIDTH: u8 = 64;

/// Logic level that triggers a GPIO wakeup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeupLevel {
    /// Wake up when the pin is low
    Low,

    /// Wake up when the pin is high
    High,
}

impl WakeupLevel {
    /// Convert a wake polarity flag to a level
    #[must_use]
    pub const fn from_wake_on_high(wake_on_high: bool) -> Self {
        if wake_on_high {
            Self::High
        } else {
            Self::Low
        }
    }

    /// Return the pull resistor that keeps a pin idle at the opposite level
    ///
    /// A pin waking on high is pulled down, a pin waking on low is pulled up,
    /// so that a floating pin never triggers a wakeup.
    #[must_use]
    pub const fn idle_pull(self) -> Pull {
        match self {
            Self::High => Pull::Down,
            Self::Low => Pull::Up,
        }
    }
}

/// Internal pull resistor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    /// Pull-up resistor
    Up,

    /// Pull-down resistor
    Down,
}

/// A set of pins stored as a bitmask, bit `n` standing for GPIO `n`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PinMask(u64);

impl PinMask {
    /// The empty mask
    pub const EMPTY: Self = Self(0);

    /// Create a mask from raw bits
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Return the raw bits
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Check whether no pin is in the mask
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return the number of pins in the mask
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Check whether a pin is in the mask
    #[must_use]
    pub const fn contains(self, pin: PinNumber) -> bool {
        match bit(pin) {
            Some(bit) => self.0 & bit != 0,
            None => false,
        }
    }

    /// Return this mask with a pin added
    ///
    /// Pins that do not fit in the mask are ignored.
    #[must_use]
    pub const fn with(self, pin: PinNumber) -> Self {
        match bit(pin) {
            Some(bit) => Self(self.0 | bit),
            None => self,
        }
    }

    /// Return this mask with a pin removed
    #[must_use]
    pub const fn without(self, pin: PinNumber) -> Self {
        match bit(pin) {
            Some(bit) => Self(self.0 & !bit),
            None => self,
        }
    }

    /// Iterate over the pins in the mask, in increasing order
    pub fn iter(self) -> impl Iterator<Item = PinNumber> {
        (0..MASK_WIDTH).filter(move |pin| self.contains(*pin))
    }
}

impl FromIterator<PinNumber> for PinMask {
    fn from_iter<I: IntoIterator<Item = PinNumber>>(pins: I) -> Self {
        pins.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for PinMask {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("{")?;
        for (index, pin) in self.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "GPIO{pin}")?;
        }
        formatter.write_str("}")
    }
}

/// Return the bit corresponding to a pin, if it fits in a mask
const fn bit(pin: PinNumber) -> Option<u64> {
    if pin < MASK_WIDTH {
        Some(1 << pin)
    } else {
        None
    }
}
