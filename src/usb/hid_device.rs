//! USB HID mouse device on the nRF52840 USBD peripheral.
//!
//! The embassy-usb device future and the HID writer run as their own
//! tasks. Everything they learn about the bus is handed to the application
//! loop through statics: a [`BusState`] behind a critical-section mutex for
//! the cheap questions (`configured`, `suspended`), and a queue of
//! [`UsbEvent`]s that [`EmbassyUsbStack::task`] replays into the
//! application's [`DeviceCallbacks`].

use core::cell::Cell;

use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, UsbDevice};
use jiggler::callbacks::{DeviceCallbacks, NoCallbacks, UsbEvent};
use jiggler::hid::mouse::{MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE};
use jiggler::hid::{MouseReport, ReportType};
use jiggler::{config, BusState, Error, UsbStack};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Max packet size of the mouse IN endpoint.
const MOUSE_EP_SIZE: usize = 8;

pub type MouseWriter = HidWriter<'static, UsbDriver, MOUSE_EP_SIZE>;

/// HID interface number of the mouse (the only one).
const MOUSE_INSTANCE: u8 = 0;

static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_EVENT_HANDLER: StaticCell<UsbEventHandler> = StaticCell::new();
static MOUSE_REQUEST_HANDLER: StaticCell<MouseRequestHandler> = StaticCell::new();

static USB_EVENTS: Channel<CriticalSectionRawMutex, UsbEvent, 8> = Channel::new();
static MOUSE_REPORTS: Channel<CriticalSectionRawMutex, MouseReport, 1> = Channel::new();
static REMOTE_WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static BUS: Mutex<CriticalSectionRawMutex, Cell<BusState>> =
    Mutex::new(Cell::new(BusState::new()));

fn bus() -> BusState {
    BUS.lock(Cell::get)
}

fn update_bus<T>(f: impl FnOnce(&mut BusState) -> T) -> T {
    BUS.lock(|cell| {
        let mut state = cell.get();
        let out = f(&mut state);
        cell.set(state);
        out
    })
}

fn queue_event(event: UsbEvent) {
    if USB_EVENTS.try_send(event).is_err() {
        warn!("USB event queue full, dropping {:?}", event);
    }
}

struct UsbEventHandler;

impl embassy_usb::Handler for UsbEventHandler {
    fn enabled(&mut self, enabled: bool) {
        info!("USB {}", if enabled { "powered" } else { "power removed" });
        if let Some(event) = update_bus(|bus| bus.on_enabled(enabled)) {
            queue_event(event);
        }
    }

    fn reset(&mut self) {
        if let Some(event) = update_bus(BusState::on_reset) {
            queue_event(event);
        }
    }

    fn configured(&mut self, configured: bool) {
        if let Some(event) = update_bus(|bus| bus.on_configured(configured)) {
            queue_event(event);
        }
    }

    fn suspended(&mut self, suspended: bool) {
        queue_event(update_bus(|bus| bus.on_suspended(suspended)));
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        update_bus(|bus| bus.on_remote_wakeup_enabled(enabled));
    }
}

/// Control requests on the mouse interface.
///
/// GET_REPORT has to be answered inside the USB task, where the application
/// is out of reach, so it goes to the default callbacks (zero length ⇒
/// STALL). SET_REPORT payloads are queued for the application.
struct MouseRequestHandler;

impl RequestHandler for MouseRequestHandler {
    fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
        let (report_type, report_id) = split_report_id(id);
        match NoCallbacks.hid_get_report(MOUSE_INSTANCE, report_id, report_type, buf) {
            0 => None,
            n => Some(n),
        }
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let (report_type, report_id) = split_report_id(id);
        queue_event(UsbEvent::set_report(
            MOUSE_INSTANCE,
            report_id,
            report_type,
            data,
        ));
        OutResponse::Accepted
    }
}

fn split_report_id(id: ReportId) -> (ReportType, u8) {
    match id {
        ReportId::In(n) => (ReportType::Input, n),
        ReportId::Out(n) => (ReportType::Output, n),
        ReportId::Feature(n) => (ReportType::Feature, n),
    }
}

/// Build result containing the USB device runner and the mouse writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub mouse_writer: MouseWriter,
}

/// Initialise the USB stack and create the HID mouse device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = true;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    builder.handler(USB_EVENT_HANDLER.init(UsbEventHandler));

    let mouse_state = MOUSE_STATE.init(State::new());
    let mouse_config = HidConfig {
        report_descriptor: MOUSE_REPORT_DESCRIPTOR,
        request_handler: Some(MOUSE_REQUEST_HANDLER.init(MouseRequestHandler)),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let mouse_writer = HidWriter::new(&mut builder, mouse_state, mouse_config);

    let device = builder.build();

    info!("USB HID mouse initialised");

    UsbHidDevice {
        device,
        mouse_writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// Handles enumeration and endpoint servicing. While the bus is suspended
/// it waits for either a host resume or a wakeup request from the
/// application.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");

    loop {
        device.run_until_suspend().await;

        match select(device.wait_resume(), REMOTE_WAKEUP.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                if let Err(e) = device.remote_wakeup().await {
                    warn!("Remote wakeup failed: {:?}", e);
                }
            }
        }

        // Requests that piled up while the bus was down are stale now.
        REMOTE_WAKEUP.reset();
    }
}

/// HID writer task - moves queued mouse reports onto the IN endpoint.
pub async fn mouse_writer_task(mut writer: MouseWriter) -> ! {
    info!("HID writer task started - waiting for reports");

    let mut buf = [0u8; MOUSE_REPORT_SIZE];

    loop {
        let report = MOUSE_REPORTS.receive().await;
        let n = report.serialize(&mut buf);

        match writer.write(&buf[..n]).await {
            Ok(()) => queue_event(UsbEvent::report_complete(MOUSE_INSTANCE, &buf[..n])),
            Err(e) => warn!("USB mouse write failed: {:?}", e),
        }
    }
}

/// [`UsbStack`] view of the embassy-usb device for the application loop.
pub struct EmbassyUsbStack;

impl UsbStack for EmbassyUsbStack {
    fn task<C: DeviceCallbacks>(&mut self, callbacks: &mut C) {
        while let Ok(event) = USB_EVENTS.try_receive() {
            event.dispatch(callbacks);
        }
    }

    fn hid_ready(&self) -> bool {
        let bus = bus();
        bus.configured() && !bus.suspended() && !MOUSE_REPORTS.is_full()
    }

    fn hid_mouse_report(&mut self, report: &MouseReport) -> Result<(), Error> {
        MOUSE_REPORTS.try_send(*report).map_err(|_| Error::NotReady)
    }

    fn suspended(&self) -> bool {
        bus().suspended()
    }

    fn remote_wakeup(&mut self) -> Result<(), Error> {
        if !bus().remote_wakeup_enabled() {
            return Err(Error::RemoteWakeupDenied);
        }
        REMOTE_WAKEUP.signal(());
        Ok(())
    }
}
