//! Integration tests: drive the whole main loop with a scripted board,
//! a recording USB stack and a fixed random source.

use heapless::{Deque, Vec};
use jiggler::debounce::Debouncer;
use jiggler::hid::{MouseReport, ReportType, REPORT_ID_MOUSE};
use jiggler::schedule::HidSchedule;
use jiggler::toggle::{JigglerState, ToggleMode};
use jiggler::{Board, DeviceCallbacks, Error, Jiggler, UsbEvent, UsbStack};
use rand_core::RngCore;

struct ScriptedBoard {
    now: u32,
    pressed: bool,
    led: bool,
    led_writes: u32,
}

impl ScriptedBoard {
    fn new() -> Self {
        Self {
            now: 0,
            pressed: false,
            led: false,
            led_writes: 0,
        }
    }
}

impl Board for ScriptedBoard {
    fn led_write(&mut self, on: bool) {
        self.led = on;
        self.led_writes += 1;
    }

    fn button_read(&mut self) -> bool {
        self.pressed
    }

    fn millis(&self) -> u32 {
        self.now
    }
}

struct RecordingUsb {
    ready: bool,
    suspended: bool,
    remote_wakeup_allowed: bool,
    wakeup_requests: u32,
    wakeups_sent: u32,
    reports: Vec<MouseReport, 32>,
    pending: Deque<UsbEvent, 8>,
}

impl RecordingUsb {
    fn new() -> Self {
        Self {
            ready: true,
            suspended: false,
            remote_wakeup_allowed: false,
            wakeup_requests: 0,
            wakeups_sent: 0,
            reports: Vec::new(),
            pending: Deque::new(),
        }
    }
}

impl UsbStack for RecordingUsb {
    fn task<C: DeviceCallbacks>(&mut self, callbacks: &mut C) {
        while let Some(event) = self.pending.pop_front() {
            event.dispatch(callbacks);
        }
    }

    fn hid_ready(&self) -> bool {
        self.ready && !self.suspended
    }

    fn hid_mouse_report(&mut self, report: &MouseReport) -> Result<(), Error> {
        self.reports.push(*report).map_err(|_| Error::NotReady)
    }

    fn suspended(&self) -> bool {
        self.suspended
    }

    fn remote_wakeup(&mut self) -> Result<(), Error> {
        self.wakeup_requests += 1;
        if !self.remote_wakeup_allowed {
            return Err(Error::RemoteWakeupDenied);
        }
        self.wakeups_sent += 1;
        Ok(())
    }
}

/// Hands out a fixed sequence of values, then repeats the last one.
struct SequenceRng {
    values: &'static [u32],
    next: usize,
}

impl SequenceRng {
    fn new(values: &'static [u32]) -> Self {
        Self { values, next: 0 }
    }
}

impl RngCore for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        let idx = self.next.min(self.values.len() - 1);
        self.next += 1;
        self.values[idx]
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

fn jiggler(enabled: bool, mode: ToggleMode, rng: &'static [u32]) -> Jiggler<SequenceRng> {
    Jiggler::with_parts(
        SequenceRng::new(rng),
        JigglerState::new(enabled, mode),
        Debouncer::new(50),
        HidSchedule::new(0),
    )
}

/// Run one loop pass per millisecond over `range`, with the button state
/// chosen per tick.
fn run(
    app: &mut Jiggler<SequenceRng>,
    board: &mut ScriptedBoard,
    usb: &mut RecordingUsb,
    range: core::ops::RangeInclusive<u32>,
    pressed: impl Fn(u32) -> bool,
) {
    for ms in range {
        board.now = ms;
        board.pressed = pressed(ms);
        app.poll(board, usb);
    }
}

fn released(_: u32) -> bool {
    false
}

#[test]
fn first_nudge_after_mouse_interval() {
    let mut app = jiggler(true, ToggleMode::Level, &[0x1234_ABCD]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();

    run(&mut app, &mut board, &mut usb, 1..=4999, released);
    assert!(usb.reports.is_empty());

    run(&mut app, &mut board, &mut usb, 5000..=5000, released);
    assert_eq!(usb.reports.len(), 1);

    let report = usb.reports[0];
    assert_eq!(report.x, -51);
    assert_eq!(report.y, -85);
    assert_eq!(report.buttons, 0);
    assert_eq!(report.wheel, 0);
    assert_eq!(report.pan, 0);

    let mut wire = [0u8; 6];
    report.serialize(&mut wire);
    assert_eq!(wire[0], REPORT_ID_MOUSE);
}

#[test]
fn nudges_keep_period_on_busy_loop() {
    let mut app = jiggler(true, ToggleMode::Level, &[1, 2, 3, 4]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();

    for ms in 1..=20_000u32 {
        board.now = ms;
        // Several passes per millisecond must not produce extra reports.
        for _ in 0..3 {
            app.poll(&mut board, &mut usb);
        }
    }

    let xs: std::vec::Vec<i8> = usb.reports.iter().map(|r| r.x).collect();
    assert_eq!(xs, [1, 2, 3, 4]);
}

#[test]
fn init_shows_enable_state_on_led() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut board = ScriptedBoard::new();
    app.init(&mut board);
    assert!(board.led);
    assert_eq!(board.led_writes, 1);
}

#[test]
fn disabled_jiggler_skips_without_catch_up_burst() {
    let mut app = jiggler(false, ToggleMode::Edge, &[0x0000_0505]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();

    // Disabled through the first period; press at 6 s enables it.
    run(&mut app, &mut board, &mut usb, 1..=9999, |ms| {
        (6000..6060).contains(&ms)
    });
    assert!(app.enabled());
    assert!(board.led);
    assert!(usb.reports.is_empty());

    run(&mut app, &mut board, &mut usb, 10_000..=10_000, released);
    assert_eq!(usb.reports.len(), 1);
    assert_eq!(usb.reports[0].x, 5);
    assert_eq!(usb.reports[0].y, 5);
}

#[test]
fn held_button_oscillates_in_level_mode() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();

    // Held 100..160 ms: debounced pressed from 150 until 50 ms after the
    // release at 160, i.e. 60 loop passes.
    run(&mut app, &mut board, &mut usb, 1..=300, |ms| {
        (100..160).contains(&ms)
    });
    assert_eq!(board.led_writes, 60);
    assert!(app.enabled());
}

#[test]
fn held_button_toggles_once_in_edge_mode() {
    let mut app = jiggler(true, ToggleMode::Edge, &[0]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();

    run(&mut app, &mut board, &mut usb, 1..=1000, |ms| {
        (100..900).contains(&ms)
    });
    assert_eq!(board.led_writes, 1);
    assert!(!app.enabled());
    assert!(!board.led);
}

#[test]
fn button_bounce_does_not_toggle() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();

    // 30 ms of contact bounce.
    run(&mut app, &mut board, &mut usb, 1..=500, |ms| {
        (100..130).contains(&ms) && ms % 3 != 0
    });
    assert_eq!(board.led_writes, 0);
    assert!(app.enabled());
}

#[test]
fn not_ready_skips_tick_without_retry() {
    let mut app = jiggler(true, ToggleMode::Level, &[0x0000_0A0B, 0x0000_0102]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();

    usb.ready = false;
    run(&mut app, &mut board, &mut usb, 1..=5000, released);
    assert!(usb.reports.is_empty());

    usb.ready = true;
    run(&mut app, &mut board, &mut usb, 5001..=9999, released);
    assert!(usb.reports.is_empty());

    run(&mut app, &mut board, &mut usb, 10_000..=10_000, released);
    assert_eq!(usb.reports.len(), 1);
    // The skipped tick did not consume a random value.
    assert_eq!(usb.reports[0].x, 0x0B);
    assert_eq!(usb.reports[0].y, 0x0A);
}

#[test]
fn suspended_bus_requests_wakeup_every_wake_interval() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();
    usb.suspended = true;
    usb.remote_wakeup_allowed = true;

    run(&mut app, &mut board, &mut usb, 1..=100, released);
    assert_eq!(usb.wakeup_requests, 10);
    assert_eq!(usb.wakeups_sent, 10);
}

#[test]
fn wakeup_refused_when_host_did_not_allow_it() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();
    usb.suspended = true;

    run(&mut app, &mut board, &mut usb, 1..=5000, released);
    assert_eq!(usb.wakeup_requests, 500);
    assert_eq!(usb.wakeups_sent, 0);
    // Suspended endpoint is not ready: the nudge is dropped.
    assert!(usb.reports.is_empty());
}

#[test]
fn no_wakeup_while_bus_active() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();
    usb.remote_wakeup_allowed = true;

    run(&mut app, &mut board, &mut usb, 1..=1000, released);
    assert_eq!(usb.wakeup_requests, 0);
}

#[test]
fn stalled_loop_catches_up_one_wake_check_per_pass() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();
    usb.suspended = true;

    board.now = 35;
    for _ in 0..3 {
        app.poll(&mut board, &mut usb);
    }
    assert_eq!(usb.wakeup_requests, 3);

    app.poll(&mut board, &mut usb);
    assert_eq!(usb.wakeup_requests, 3);
    assert_eq!(app.schedule().wake().period_start(), 30);
}

#[test]
fn stack_events_are_drained_by_the_task_pump() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut board = ScriptedBoard::new();
    let mut usb = RecordingUsb::new();

    for event in [
        UsbEvent::Mounted,
        UsbEvent::Suspended {
            remote_wakeup_en: true,
        },
        UsbEvent::Resumed,
        UsbEvent::set_report(0, 0, ReportType::Output, &[0x01]),
    ] {
        usb.pending.push_back(event).unwrap();
    }

    board.now = 1;
    app.poll(&mut board, &mut usb);
    assert!(usb.pending.is_empty());
}

#[test]
fn get_report_is_stalled() {
    let mut app = jiggler(true, ToggleMode::Level, &[0]);
    let mut buf = [0u8; 8];
    let len = app.hid_get_report(0, REPORT_ID_MOUSE, ReportType::Input, &mut buf);
    assert_eq!(len, 0);
}
