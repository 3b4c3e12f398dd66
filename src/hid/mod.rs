//! HID report types exposed by the device.
//!
//! The report map follows the usual composite numbering (keyboard = 1,
//! mouse = 2, ...); this firmware only ever sends the mouse report.

pub mod mouse;

pub use mouse::MouseReport;

/// Report ID of the relative mouse report.
pub const REPORT_ID_MOUSE: u8 = 2;

/// HID report type of a GET_REPORT / SET_REPORT control request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    Invalid,
    Input,
    Output,
    Feature,
}

impl From<u8> for ReportType {
    fn from(code: u8) -> Self {
        match code {
            1 => ReportType::Input,
            2 => ReportType::Output,
            3 => ReportType::Feature,
            _ => ReportType::Invalid,
        }
    }
}
