//! Button-to-enable toggle controller.

/// How a debounced button reading drives the enable flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToggleMode {
    /// Flip on every pass while the button reads pressed.
    ///
    /// Holding the button past the debounce window makes the flag oscillate
    /// once per loop iteration.
    Level,
    /// Flip once per released-to-pressed transition.
    Edge,
}

/// Jiggler state shared between the toggle controller and the emitter.
#[derive(Clone, Copy, Debug)]
pub struct JigglerState {
    enabled: bool,
    mode: ToggleMode,
    last_pressed: bool,
}

impl JigglerState {
    pub const fn new(enabled: bool, mode: ToggleMode) -> Self {
        Self {
            enabled,
            mode,
            last_pressed: false,
        }
    }

    /// Whether mouse reports should currently be emitted.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> ToggleMode {
        self.mode
    }

    /// Apply one debounced button reading.
    ///
    /// Returns the new enable state when it flipped, so the caller can
    /// update the indicator LED.
    pub fn on_button(&mut self, pressed: bool) -> Option<bool> {
        let fire = match self.mode {
            ToggleMode::Level => pressed,
            ToggleMode::Edge => pressed && !self.last_pressed,
        };
        self.last_pressed = pressed;

        if fire {
            self.enabled = !self.enabled;
            Some(self.enabled)
        } else {
            None
        }
    }
}
