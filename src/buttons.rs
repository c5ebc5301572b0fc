//! Calibrate, confirm and volume buttons.
//!
//! All are active low with internal pull-ups. Edge detection and lockout
//! are done by [`alarm_core::EdgeButton`] on every loop tick, and the D-pad
//! pair is read as an axis through [`alarm_core::ButtonAxis`], so the pins
//! are handed over as plain inputs.

use esp_hal::gpio::{
    Input,
    InputConfig,
    Pull,
};

use crate::ButtonResources;

/// The control buttons of the alarm.
pub struct ControlButtons {
    /// D-pad up: raise the volume.
    pub up: Input<'static>,
    /// D-pad down: lower the volume.
    pub down: Input<'static>,
    /// A button: store a new threshold from the current ambient level.
    pub calibrate: Input<'static>,
    /// Joystick click: repaint the status line and beep.
    pub confirm: Input<'static>,
}

impl From<ButtonResources<'static>> for ControlButtons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        Self {
            up: Input::new(res.up, pull_up),
            down: Input::new(res.down, pull_up),
            calibrate: Input::new(res.calibrate, pull_up),
            confirm: Input::new(res.confirm, pull_up),
        }
    }
}
