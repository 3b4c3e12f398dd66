//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

use crate::toggle::ToggleMode;

// Jiggler behaviour

/// Whether the jiggler starts active after power-up.
pub const JIGGLER_ENABLED_AT_BOOT: bool = true;

/// How a held button drives the enable flag.
///
/// `Level` flips on every loop pass while the button reads pressed;
/// `Edge` flips once per press.
pub const TOGGLE_MODE: ToggleMode = ToggleMode::Level;

// Timing

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 50;

/// Interval between remote-wakeup checks (ms).
pub const WAKE_INTERVAL_MS: u32 = 10;

/// Interval between mouse nudges (ms).
pub const MOUSE_INTERVAL_MS: u32 = 5000;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "jiggler";
pub const USB_PRODUCT: &str = "Mouse Jiggler";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Bus current budget advertised in the configuration descriptor (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button 1    → P0.11 (active-low, internal pull-up)
//   LED 1       → P0.13 (active-low)
