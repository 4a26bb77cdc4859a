// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! State retained in RTC fast memory across deep sleep
//!
//! ESP32-C3 keeps the content of RTC fast memory through deep sleep whatever
//! the retention policy: without a timer wakeup the memory is only forced
//! into its low-power retention state. The content is undefined after a
//! power-on or a reset that clears RTC memory.

use core::cell::UnsafeCell;

use esp_hal::macros::ram;

/// An `UnsafeCell` that implements `Sync`
struct SyncUnsafeCell<T> {
    /// The inner cell
    inner: UnsafeCell<T>,
}

impl<T> SyncUnsafeCell<T> {
    /// Create a new cell
    const fn new(inner: T) -> Self {
        Self {
            inner: UnsafeCell::new(inner),
        }
    }
}

// SAFETY:
// There is only one thread on a ESP32-C3.
unsafe impl<T: Sync> Sync for SyncUnsafeCell<T> {}

/// Marker stored next to the counter when it was written by this firmware
const MAGIC: u32 = 0x5EE9_C0DE;

/// Number of boots since the last power-on, with a validity marker
///
/// This is a statically allocated variable and it is placed in the RTC Fast
/// memory, which survives deep sleep.
#[ram(rtc_fast)]
static BOOT_COUNT: SyncUnsafeCell<(u32, u32)> = SyncUnsafeCell::new((0, 0));

/// Increment the boot counter and return its new value
///
/// The counter restarts from 1 if RTC fast memory lost its content.
pub fn increment_boot_count() -> u32 {
    // SAFETY:
    // There is only one thread and no reference to the value outlives this
    // function
    let (marker, count) = unsafe { &mut *BOOT_COUNT.inner.get() };

    if *marker != MAGIC {
        *marker = MAGIC;
        *count = 0;
    }
    *count = count.wrapping_add(1);

    *count
}
