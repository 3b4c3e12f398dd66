//! Host-testable core of the jiggler firmware.
//!
//! Everything that decides *what* the device does lives here and is
//! `no_std` without hardware dependencies: debouncing, the toggle state
//! machine, the HID schedule, report encoding and the stack callbacks.
//! Hardware reaches it through the [`board::Board`] and
//! [`stack::UsbStack`] traits.
//!
//! Usage: `cargo test --lib` and `cargo test --test integration`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with `--features embedded`.

#![cfg_attr(not(test), no_std)]

pub(crate) mod fmt;

pub mod app;
pub mod board;
pub mod bus;
pub mod callbacks;
pub mod config;
pub mod debounce;
pub mod error;
pub mod hid;
pub mod schedule;
pub mod stack;
pub mod toggle;

pub use app::Jiggler;
pub use board::Board;
pub use bus::BusState;
pub use callbacks::{DeviceCallbacks, UsbEvent};
pub use error::Error;
pub use stack::UsbStack;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
