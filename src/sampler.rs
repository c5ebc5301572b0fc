//! Raw readings for the alarm: microphone on I2S, volume axis on the D-pad.

use alarm_core::{
    AnalogSampler,
    ButtonAxis,
    Channel,
};
use esp_hal::gpio::Input;

use crate::Microphone;

/// D-pad up/down as a volume axis: up reads 0, down reads `full_scale`.
pub type DpadAxis = ButtonAxis<Input<'static>, Input<'static>>;

/// Both sources of the board behind one [`AnalogSampler`].
pub struct BoardSampler {
    mic: Microphone<'static>,
    axis: DpadAxis,
}

impl BoardSampler {
    pub const fn new(mic: Microphone<'static>, axis: DpadAxis) -> Self {
        Self { mic, axis }
    }
}

impl AnalogSampler for BoardSampler {
    fn read_raw(&mut self, channel: Channel) -> u16 {
        match channel {
            Channel::Microphone => self.mic.next_magnitude(),
            Channel::JoystickY => self.axis.read(),
        }
    }

    fn begin_burst(&mut self, channel: Channel) {
        if channel == Channel::Microphone {
            self.mic.discard_pending();
        }
    }
}
