//! USB Device subsystem - presents a HID mouse to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb` with a single HID interface (report-protocol mouse,
//! Report ID 2) that advertises remote wakeup.
//!
//! The application loop talks to it through `hid_device::EmbassyUsbStack`.

pub mod hid_device;
