//! Fixed-interval cooperative gates for the HID task.
//!
//! Deadlines advance by whole intervals (`deadline += interval`) rather
//! than being reset to the current time, so loop jitter never accumulates
//! into drift. If the loop stalls for several intervals the gate fires once
//! per pass until it has caught up.

use crate::config::{MOUSE_INTERVAL_MS, WAKE_INTERVAL_MS};

/// One periodic gate with an accumulated deadline.
#[derive(Clone, Copy, Debug)]
pub struct IntervalTimer {
    start_ms: u32,
    interval_ms: u32,
}

impl IntervalTimer {
    /// Create a timer whose first period begins at `start_ms`.
    pub const fn new(interval_ms: u32, start_ms: u32) -> Self {
        Self {
            start_ms,
            interval_ms,
        }
    }

    /// Returns `true` (and consumes one period) when a full interval has
    /// elapsed since the current period began.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.start_ms) < self.interval_ms {
            return false;
        }
        self.start_ms = self.start_ms.wrapping_add(self.interval_ms);
        true
    }

    /// Start of the current (not yet elapsed) period.
    pub fn period_start(&self) -> u32 {
        self.start_ms
    }

    pub fn interval(&self) -> u32 {
        self.interval_ms
    }
}

/// What the HID task should do on this pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidTick {
    /// The 10 ms wake check is due: request remote wakeup if suspended.
    pub wake_check: bool,
    /// The mouse period elapsed: emit a report if enabled and ready.
    pub mouse_due: bool,
}

/// The two nested gates of the HID task.
///
/// The mouse gate is only evaluated on passes where the wake gate fired,
/// so its resolution is one wake interval.
#[derive(Clone, Copy, Debug)]
pub struct HidSchedule {
    wake: IntervalTimer,
    mouse: IntervalTimer,
}

impl HidSchedule {
    /// Both gates start counting at `now_ms`.
    pub const fn new(now_ms: u32) -> Self {
        Self::with_intervals(WAKE_INTERVAL_MS, MOUSE_INTERVAL_MS, now_ms)
    }

    pub const fn with_intervals(wake_ms: u32, mouse_ms: u32, now_ms: u32) -> Self {
        Self {
            wake: IntervalTimer::new(wake_ms, now_ms),
            mouse: IntervalTimer::new(mouse_ms, now_ms),
        }
    }

    pub fn poll(&mut self, now_ms: u32) -> HidTick {
        if !self.wake.poll(now_ms) {
            return HidTick::default();
        }

        HidTick {
            wake_check: true,
            mouse_due: self.mouse.poll(now_ms),
        }
    }

    pub fn wake(&self) -> &IntervalTimer {
        &self.wake
    }

    pub fn mouse(&self) -> &IntervalTimer {
        &self.mouse
    }
}
