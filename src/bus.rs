//! USB bus state as seen from device-level stack notifications.
//!
//! Stacks report reset, power, configuration, suspend and the host's
//! remote-wakeup permission as separate notifications. [`BusState`] folds
//! them into one value and yields the [`UsbEvent`] (if any) the application
//! should hear about. A reset or power loss ends the session: a configured
//! device reports `Unmounted`, and suspend and remote-wakeup permission
//! are cleared along with it.

use crate::callbacks::UsbEvent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusState {
    configured: bool,
    suspended: bool,
    remote_wakeup_enabled: bool,
}

impl BusState {
    /// Detached, unconfigured bus.
    pub const fn new() -> Self {
        Self {
            configured: false,
            suspended: false,
            remote_wakeup_enabled: false,
        }
    }

    pub fn configured(&self) -> bool {
        self.configured
    }

    pub fn suspended(&self) -> bool {
        self.suspended
    }

    pub fn remote_wakeup_enabled(&self) -> bool {
        self.remote_wakeup_enabled
    }

    /// Bus reset from the host.
    pub fn on_reset(&mut self) -> Option<UsbEvent> {
        self.end_session()
    }

    /// VBUS applied (`true`) or removed (`false`).
    pub fn on_enabled(&mut self, enabled: bool) -> Option<UsbEvent> {
        if enabled {
            None
        } else {
            self.end_session()
        }
    }

    /// SET_CONFIGURATION outcome. Only a change is reported.
    pub fn on_configured(&mut self, configured: bool) -> Option<UsbEvent> {
        if self.configured == configured {
            return None;
        }
        self.configured = configured;
        Some(if configured {
            UsbEvent::Mounted
        } else {
            UsbEvent::Unmounted
        })
    }

    pub fn on_suspended(&mut self, suspended: bool) -> UsbEvent {
        self.suspended = suspended;
        if suspended {
            UsbEvent::Suspended {
                remote_wakeup_en: self.remote_wakeup_enabled,
            }
        } else {
            UsbEvent::Resumed
        }
    }

    /// SET_FEATURE / CLEAR_FEATURE (DEVICE_REMOTE_WAKEUP).
    pub fn on_remote_wakeup_enabled(&mut self, enabled: bool) {
        self.remote_wakeup_enabled = enabled;
    }

    fn end_session(&mut self) -> Option<UsbEvent> {
        let was_configured = self.configured;
        *self = Self::new();
        was_configured.then_some(UsbEvent::Unmounted)
    }
}
