// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Controller configuration

/// Behaviour when wakeup pins are added with different levels
///
/// The hardware wakeup configuration tracked by the controller stores a
/// single level for all GPIO wakeup pins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LevelPolicy {
    /// The level of the last added pin applies to all pins
    ///
    /// A warning is logged whenever a previous level is overridden.
    #[default]
    LastWins,

    /// Adding a pin whose level differs from the armed pins is an error
    RejectConflicts,
}

/// Configuration of a sleep controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Behaviour when wakeup pins are added with different levels
    pub level_policy: LevelPolicy,
}

impl Config {
    /// Set the level policy
    #[must_use]
    pub const fn with_level_policy(mut self, level_policy: LevelPolicy) -> Self {
        self.level_policy = level_policy;
        self
    }
}
