//! The jiggler application: button toggle, HID scheduling, stack callbacks.
//!
//! One call to [`Jiggler::poll`] is one pass of the main loop:
//!
//! 1. pump the USB stack (callbacks run here),
//! 2. `button_task` - debounce and toggle,
//! 3. `hid_task`    - remote wakeup check and periodic mouse nudge.
//!
//! Nothing in here blocks; each task returns immediately when it has
//! nothing to do.

use crate::board::Board;
use crate::callbacks::DeviceCallbacks;
use crate::config::{BUTTON_DEBOUNCE_MS, JIGGLER_ENABLED_AT_BOOT, TOGGLE_MODE};
use crate::debounce::Debouncer;
use crate::fmt::{debug, info, trace, warn};
use crate::hid::{MouseReport, ReportType, REPORT_ID_MOUSE};
use crate::schedule::HidSchedule;
use crate::stack::UsbStack;
use crate::toggle::JigglerState;
use rand_core::RngCore;

pub struct Jiggler<R> {
    state: JigglerState,
    button: Debouncer,
    schedule: HidSchedule,
    rng: R,
}

impl<R: RngCore> Jiggler<R> {
    /// Jiggler with the compile-time defaults from `config`, its timers
    /// starting at `now_ms`.
    pub fn new(rng: R, now_ms: u32) -> Self {
        Self::with_parts(
            rng,
            JigglerState::new(JIGGLER_ENABLED_AT_BOOT, TOGGLE_MODE),
            Debouncer::new(BUTTON_DEBOUNCE_MS),
            HidSchedule::new(now_ms),
        )
    }

    pub fn with_parts(
        rng: R,
        state: JigglerState,
        button: Debouncer,
        schedule: HidSchedule,
    ) -> Self {
        Self {
            state,
            button,
            schedule,
            rng,
        }
    }

    /// Show the initial enable state on the LED.
    pub fn init<B: Board>(&mut self, board: &mut B) {
        board.led_write(self.state.enabled());
        info!(
            "Jiggler ready: enabled={} mode={:?}",
            self.state.enabled(),
            self.state.mode()
        );
    }

    /// One pass of the main loop.
    pub fn poll<B: Board, S: UsbStack>(&mut self, board: &mut B, usb: &mut S) {
        usb.task(self);
        self.button_task(board);
        self.hid_task(board, usb);
    }

    /// Debounce the button and flip `enabled` while it reads pressed.
    pub fn button_task<B: Board>(&mut self, board: &mut B) {
        let raw = board.button_read();
        let pressed = self.button.update(raw, board.millis());

        if let Some(enabled) = self.state.on_button(pressed) {
            board.led_write(enabled);
            debug!("Jiggler enabled={}", enabled);
        }
    }

    /// Wake check every wake interval; mouse nudge every mouse interval.
    pub fn hid_task<B: Board, S: UsbStack>(&mut self, board: &B, usb: &mut S) {
        let tick = self.schedule.poll(board.millis());

        if tick.wake_check && usb.suspended() {
            // Only succeeds if the host enabled REMOTE_WAKEUP.
            if let Err(e) = usb.remote_wakeup() {
                trace!("Remote wakeup not sent: {:?}", e);
            }
        }

        if !tick.mouse_due || !self.state.enabled() {
            return;
        }

        self.send_hid_report(usb, REPORT_ID_MOUSE);
    }

    fn send_hid_report<S: UsbStack>(&mut self, usb: &mut S, report_id: u8) {
        if !usb.hid_ready() {
            debug!("HID not ready, nudge skipped");
            return;
        }

        if report_id == REPORT_ID_MOUSE {
            let report = MouseReport::from_random(self.rng.next_u32());
            match usb.hid_mouse_report(&report) {
                Ok(()) => debug!("Nudge x={} y={}", report.x, report.y),
                Err(e) => warn!("Mouse report failed: {:?}", e),
            }
        }
    }

    pub fn enabled(&self) -> bool {
        self.state.enabled()
    }

    pub fn schedule(&self) -> &HidSchedule {
        &self.schedule
    }
}

impl<R> DeviceCallbacks for Jiggler<R> {
    fn mount(&mut self) {
        info!("USB mounted");
    }

    fn unmount(&mut self) {
        info!("USB unmounted");
    }

    fn suspend(&mut self, remote_wakeup_en: bool) {
        info!("USB suspended (remote wakeup allowed: {})", remote_wakeup_en);
    }

    fn resume(&mut self) {
        info!("USB resumed");
    }

    fn hid_report_complete(&mut self, instance: u8, report: &[u8]) {
        trace!("HID{} report complete, {} bytes", instance, report.len());
    }

    /// Reached only through stacks that pump GET_REPORT into the loop; the
    /// embassy adapter answers it inside the USB task via `NoCallbacks`.
    fn hid_get_report(
        &mut self,
        instance: u8,
        report_id: u8,
        report_type: ReportType,
        _buf: &mut [u8],
    ) -> usize {
        debug!(
            "HID{} GET_REPORT id={} type={:?} unsupported",
            instance, report_id, report_type
        );
        0
    }

    fn hid_set_report(
        &mut self,
        instance: u8,
        report_id: u8,
        report_type: ReportType,
        data: &[u8],
    ) {
        debug!(
            "HID{} SET_REPORT id={} type={:?}, {} bytes ignored",
            instance,
            report_id,
            report_type,
            data.len()
        );
    }
}
