//! Mouse jiggler firmware for the nRF52840-DK.
//!
//! Button 1 toggles the jiggler, LED 1 shows whether it is on. While on, a
//! small random mouse movement is sent every few seconds so the host never
//! sees the machine as idle.

#![no_std]
#![no_main]

mod usb;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_nrf::config::{Config as NrfConfig, HfclkSource};
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::rng::Rng;
use embassy_nrf::{bind_interrupts, peripherals, rng};
use embassy_time::Instant;
use embassy_usb::UsbDevice;
use jiggler::board::{Board, GpioBoard};
use jiggler::Jiggler;
use usb::hid_device::{self, EmbassyUsbStack, MouseWriter, UsbDriver};

use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    RNG => rng::InterruptHandler<peripherals::RNG>;
});

fn board_millis() -> u32 {
    // Truncation is the wrap the scheduler expects.
    Instant::now().as_millis() as u32
}

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn mouse_task(writer: MouseWriter) {
    hid_device::mouse_writer_task(writer).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("jiggler starting");

    // USBD needs the crystal oscillator.
    let mut nrf_config = NrfConfig::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    let button = Input::new(p.P0_11, Pull::Up);
    let led = Output::new(p.P0_13, Level::High, OutputDrive::Standard);
    let mut board = GpioBoard::new(button, led, board_millis);

    let usb = hid_device::init(p.USBD);
    board.init_after_usb();

    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(mouse_task(usb.mouse_writer)));

    let rng = Rng::new(p.RNG, Irqs);
    let mut stack = EmbassyUsbStack;
    let mut app = Jiggler::new(rng, board.millis());
    app.init(&mut board);

    loop {
        app.poll(&mut board, &mut stack);
        yield_now().await;
    }
}
