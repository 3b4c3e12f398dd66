//! USB stack lifecycle callbacks.
//!
//! The stack reports bus and HID events through [`DeviceCallbacks`]. Every
//! method has an empty default; GET_REPORT answers with zero bytes, which the
//! stack turns into a STALL.
//!
//! Stacks that notice events outside the application loop (interrupts, a
//! separate USB future) queue them as [`UsbEvent`]s and replay them with
//! [`UsbEvent::dispatch`] from their task pump.

use crate::hid::ReportType;

/// Largest report payload carried inside a queued [`UsbEvent`].
pub const EVENT_PAYLOAD_MAX: usize = 8;

/// Hooks invoked by the USB stack from its task pump.
pub trait DeviceCallbacks {
    /// Device configured by the host.
    fn mount(&mut self) {}

    /// Device deconfigured or detached.
    fn unmount(&mut self) {}

    /// Bus suspended. `remote_wakeup_en` tells whether the host allows us
    /// to wake it. The device must drop below 2.5 mA within 7 ms.
    fn suspend(&mut self, _remote_wakeup_en: bool) {}

    /// Bus resumed.
    fn resume(&mut self) {}

    /// An IN report has reached the host. For report-ID devices
    /// `report[0]` is the report ID.
    fn hid_report_complete(&mut self, _instance: u8, _report: &[u8]) {}

    /// GET_REPORT control request. Fill `buf` and return the length;
    /// returning 0 makes the stack STALL the request.
    fn hid_get_report(
        &mut self,
        _instance: u8,
        _report_id: u8,
        _report_type: ReportType,
        _buf: &mut [u8],
    ) -> usize {
        0
    }

    /// SET_REPORT control request or data on the OUT endpoint.
    fn hid_set_report(
        &mut self,
        _instance: u8,
        _report_id: u8,
        _report_type: ReportType,
        _data: &[u8],
    ) {
    }
}

/// Callbacks that ignore everything. Used where the stack needs an answer
/// synchronously and the application cannot be reached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCallbacks;

impl DeviceCallbacks for NoCallbacks {}

/// A stack event waiting to be delivered to [`DeviceCallbacks`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbEvent {
    Mounted,
    Unmounted,
    Suspended {
        remote_wakeup_en: bool,
    },
    Resumed,
    ReportComplete {
        instance: u8,
        report: [u8; EVENT_PAYLOAD_MAX],
        len: u8,
    },
    SetReport {
        instance: u8,
        report_id: u8,
        report_type: ReportType,
        data: [u8; EVENT_PAYLOAD_MAX],
        len: u8,
    },
}

impl UsbEvent {
    /// Queue a report-complete notification. Reports longer than
    /// [`EVENT_PAYLOAD_MAX`] are truncated.
    pub fn report_complete(instance: u8, report: &[u8]) -> Self {
        let (buf, len) = copy_payload(report);
        UsbEvent::ReportComplete {
            instance,
            report: buf,
            len,
        }
    }

    /// Queue a SET_REPORT payload. Payloads longer than
    /// [`EVENT_PAYLOAD_MAX`] are truncated.
    pub fn set_report(instance: u8, report_id: u8, report_type: ReportType, data: &[u8]) -> Self {
        let (buf, len) = copy_payload(data);
        UsbEvent::SetReport {
            instance,
            report_id,
            report_type,
            data: buf,
            len,
        }
    }

    /// Deliver the event to `callbacks`.
    pub fn dispatch<C: DeviceCallbacks + ?Sized>(&self, callbacks: &mut C) {
        match self {
            UsbEvent::Mounted => callbacks.mount(),
            UsbEvent::Unmounted => callbacks.unmount(),
            UsbEvent::Suspended { remote_wakeup_en } => callbacks.suspend(*remote_wakeup_en),
            UsbEvent::Resumed => callbacks.resume(),
            UsbEvent::ReportComplete {
                instance,
                report,
                len,
            } => callbacks.hid_report_complete(*instance, &report[..*len as usize]),
            UsbEvent::SetReport {
                instance,
                report_id,
                report_type,
                data,
                len,
            } => callbacks.hid_set_report(*instance, *report_id, *report_type, &data[..*len as usize]),
        }
    }
}

fn copy_payload(src: &[u8]) -> ([u8; EVENT_PAYLOAD_MAX], u8) {
    let mut buf = [0u8; EVENT_PAYLOAD_MAX];
    let n = src.len().min(EVENT_PAYLOAD_MAX);
    buf[..n].copy_from_slice(&src[..n]);
    (buf, n as u8)
}
