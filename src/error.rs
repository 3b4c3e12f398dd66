//! Unified error type for the jiggler.
//!
//! We avoid `alloc` - all error variants are fieldless.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used at the hardware boundary.
///
/// The control loop never propagates these upward: a failed report or a
/// refused wakeup is logged and retried on the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // USB
    /// The HID endpoint cannot accept a report right now.
    NotReady,

    /// Host has not enabled the remote wakeup feature.
    RemoteWakeupDenied,

    // Board
    /// Reading or driving a GPIO pin failed.
    Gpio,
}
