//! Board support seam: one button, one indicator LED, a millisecond clock.

use crate::error::Error;
use crate::fmt::warn;
use embedded_hal::digital::{InputPin, OutputPin};

/// What the application needs from the board.
pub trait Board {
    /// Drive the indicator LED (`true` = lit).
    fn led_write(&mut self, on: bool);

    /// Raw, undebounced button level (`true` = pressed).
    fn button_read(&mut self) -> bool;

    /// Monotonic milliseconds since boot. Wraps after ~49.7 days.
    fn millis(&self) -> u32;

    /// Hook for board setup that has to happen once the USB stack exists.
    fn init_after_usb(&mut self) {}
}

/// [`Board`] over `embedded-hal` pins: an active-low button (pull-up) and
/// an active-low LED, as wired on the nRF52840-DK.
pub struct GpioBoard<B, L> {
    button: B,
    led: L,
    clock: fn() -> u32,
}

impl<B, L> GpioBoard<B, L>
where
    B: InputPin,
    L: OutputPin,
{
    pub fn new(button: B, led: L, clock: fn() -> u32) -> Self {
        Self { button, led, clock }
    }

    /// Give the pins back.
    pub fn release(self) -> (B, L) {
        (self.button, self.led)
    }

    fn try_led_write(&mut self, on: bool) -> Result<(), Error> {
        let res = if on {
            self.led.set_low()
        } else {
            self.led.set_high()
        };
        res.map_err(|_| Error::Gpio)
    }

    fn try_button_read(&mut self) -> Result<bool, Error> {
        self.button.is_low().map_err(|_| Error::Gpio)
    }
}

impl<B, L> Board for GpioBoard<B, L>
where
    B: InputPin,
    L: OutputPin,
{
    fn led_write(&mut self, on: bool) {
        if let Err(e) = self.try_led_write(on) {
            warn!("LED write failed: {:?}", e);
        }
    }

    fn button_read(&mut self) -> bool {
        // A pin that cannot be read counts as released.
        self.try_button_read().unwrap_or_else(|e| {
            warn!("Button read failed: {:?}", e);
            false
        })
    }

    fn millis(&self) -> u32 {
        (self.clock)()
    }
}
