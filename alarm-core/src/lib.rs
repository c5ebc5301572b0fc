//! # alarm-core
//!
//! Board-independent logic of the quiet-alarm: a device that listens to the
//! ambient sound level and sounds a buzzer when it drops below a calibrated
//! threshold (a stopped machine, a silenced room).
//!
//! Hardware is reached through small traits so the whole loop runs on the
//! host in tests:
//! - [`AnalogSampler`]: raw readings for the microphone and joystick channels
//! - [`embedded_hal::digital::InputPin`]: active-low calibrate/confirm buttons
//! - [`TextDisplay`]: character display
//! - [`ToneGenerator`]: buzzer with intensity, beeps and a continuous tone
//!
//! ```rust,ignore
//! let mut monitor = Monitor::new(AlarmConfig::DEFAULT, adc, calibrate, confirm, lcd, buzzer, now_ms())?;
//! monitor.start(now_ms());
//! loop {
//!     monitor.tick(now_ms()).await;
//!     Timer::after_millis(monitor.config().tick_ms).await;
//! }
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod alarm;
pub mod config;
pub mod input;
pub mod monitor;
pub mod output;
pub mod sampler;

pub use alarm::{
    AlarmState,
    SoundAlarm,
};
pub use config::{
    AlarmConfig,
    ConfigError,
};
pub use input::{
    AxisStep,
    ButtonAxis,
    EdgeButton,
    RateLimitedAxis,
};
pub use monitor::{
    Monitor,
    TickReport,
};
pub use output::{
    OutputCoordinator,
    StatusLine,
    TONE_LEVEL_MAX,
    TextDisplay,
    ToneGenerator,
    Volume,
    render,
};
pub use sampler::{
    AmplitudeSampler,
    AnalogSampler,
    Channel,
};
