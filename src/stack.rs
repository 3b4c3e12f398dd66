//! USB device stack seam.
//!
//! Enumeration, endpoints and suspend signalling belong to the stack; the
//! application only pumps it and asks a handful of questions.

use crate::callbacks::DeviceCallbacks;
use crate::error::Error;
use crate::hid::MouseReport;

pub trait UsbStack {
    /// Service the stack, delivering pending events to `callbacks`.
    fn task<C: DeviceCallbacks>(&mut self, callbacks: &mut C);

    /// Whether the mouse endpoint can take a report right now.
    fn hid_ready(&self) -> bool;

    /// Queue one mouse report for the host.
    fn hid_mouse_report(&mut self, report: &MouseReport) -> Result<(), Error>;

    /// Whether the host has suspended the bus.
    fn suspended(&self) -> bool;

    /// Ask the host to resume the bus.
    ///
    /// Fails with [`Error::RemoteWakeupDenied`] when the host has not enabled
    /// the feature; nothing is sent on the bus in that case.
    fn remote_wakeup(&mut self) -> Result<(), Error>;
}
