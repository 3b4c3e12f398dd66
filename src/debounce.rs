//! Timestamp-compare button debouncer.
//!
//! The raw input is sampled once per loop pass. A new raw level has to stay
//! put for the whole debounce window before it becomes the stable level.

use crate::config::BUTTON_DEBOUNCE_MS;

/// Debounce state for one digital input.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    last_raw: bool,
    stable: bool,
    last_change_ms: u32,
    delay_ms: u32,
}

impl Debouncer {
    /// Create a debouncer with an explicit settle time.
    pub const fn new(delay_ms: u32) -> Self {
        Self {
            last_raw: false,
            stable: false,
            last_change_ms: 0,
            delay_ms,
        }
    }

    /// Feed one raw sample taken at `now_ms` and return the stable level.
    ///
    /// A sample taken exactly `delay_ms` after the last raw change is
    /// already promoted.
    pub fn update(&mut self, raw: bool, now_ms: u32) -> bool {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change_ms = now_ms;
        }

        if now_ms.wrapping_sub(self.last_change_ms) >= self.delay_ms {
            self.stable = self.last_raw;
        }

        self.stable
    }

    /// Last stable level without sampling.
    pub fn stable(&self) -> bool {
        self.stable
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(BUTTON_DEBOUNCE_MS)
    }
}
