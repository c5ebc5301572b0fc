//! The per-tick control sequence.
//!
//! [`Monitor`] owns every piece of mutable state (volume, threshold, alarm
//! flag, debounce and refresh timers) and is driven by a single periodic
//! task. Each [`tick`](Monitor::tick) runs, in order:
//!
//! 1. calibrate button press edge → calibrate, confirmation beep, repaint
//! 2. volume axis → volume step (rate limited; a step at a limit is not taken)
//! 3. confirm button press edge → repaint, acknowledgement beep
//! 4. if armed, sample the microphone and re-assert the alarm tone
//! 5. periodic repaint
//!
//! The caller sleeps for [`AlarmConfig::tick_ms`] between ticks. Ticks never
//! overlap, so the state has exactly one writer.

use embedded_hal::digital::InputPin;

use crate::{
    alarm::{
        AlarmState,
        SoundAlarm,
    },
    config::{
        AlarmConfig,
        ConfigError,
    },
    input::{
        EdgeButton,
        RateLimitedAxis,
    },
    output::{
        OutputCoordinator,
        TextDisplay,
        ToneGenerator,
        Volume,
    },
    sampler::{
        AmplitudeSampler,
        AnalogSampler,
        Channel,
    },
};

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// New threshold if a calibration ran.
    pub calibrated: Option<u16>,
    /// Volume after an accepted, effective axis step.
    pub volume_changed: Option<u8>,
    pub confirmed: bool,
    /// Microphone amplitude, sampled only while armed.
    pub amplitude: Option<u16>,
    pub alarm_active: bool,
    pub refreshed: bool,
}

/// Sound-level monitor: control inputs in, display and tone out.
pub struct Monitor<S, C, F, D, T> {
    config: AlarmConfig,
    sampler: AmplitudeSampler,
    source: S,
    calibrate: EdgeButton<C>,
    confirm: EdgeButton<F>,
    axis: RateLimitedAxis,
    alarm: SoundAlarm,
    volume: Volume,
    output: OutputCoordinator<D, T>,
}

impl<S, C, F, D, T> Monitor<S, C, F, D, T>
where
    S: AnalogSampler,
    C: InputPin,
    F: InputPin,
    D: TextDisplay,
    T: ToneGenerator,
{
    /// Build a monitor; `now_ms` seeds the debounce and refresh timers.
    pub fn new(
        config: AlarmConfig,
        source: S,
        calibrate_pin: C,
        confirm_pin: F,
        display: D,
        tone: T,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            sampler: AmplitudeSampler::new(config.burst_len),
            source,
            calibrate: EdgeButton::new(calibrate_pin, config.calibrate_lockout_ms),
            confirm: EdgeButton::new(confirm_pin, config.confirm_lockout_ms),
            axis: RateLimitedAxis::new(config.axis_low, config.axis_high, config.axis_repeat_ms, now_ms),
            alarm: SoundAlarm::new(config),
            volume: Volume::new(config.initial_volume, config.volume_step),
            output: OutputCoordinator::new(display, tone, config.refresh_interval_ms, now_ms),
        })
    }

    /// Put the outputs into a known state before the first tick.
    pub fn start(&mut self, now_ms: u64) {
        let effective = self.config.effective_alarm_percent();
        if effective > 100 {
            warn!(
                "alarm fires below {}% of calibration ambient, i.e. at or above the calibration level",
                effective
            );
        }

        self.output.drive_alarm(false);
        self.output.apply_volume(self.volume);
        self.output.refresh(self.volume, now_ms);
        info!("monitoring started, volume {}%", self.volume.percent());
    }

    /// Run one control-loop iteration.
    ///
    /// `now_ms` is read once by the caller; beeps stall the tick but do not
    /// advance the timestamp used for the remaining steps.
    pub async fn tick(&mut self, now_ms: u64) -> TickReport {
        let mut report = TickReport::default();

        if self.calibrate.pressed_edge(now_ms) {
            let ambient = self.sampler.sample(&mut self.source, Channel::Microphone);
            report.calibrated = Some(self.alarm.calibrate(ambient));
            self.output.beep(self.volume, self.config.calibrate_beep_ms).await;
            self.output.refresh(self.volume, now_ms);
            report.refreshed = true;
        }

        let y = self.source.read_raw(Channel::JoystickY);
        let volume = &mut self.volume;
        if self.axis.poll_with(y, now_ms, |step| volume.apply(step)).is_some() {
            self.output.apply_volume(self.volume);
            report.volume_changed = Some(self.volume.percent());
            info!("volume {}%", self.volume.percent());
        }

        if self.confirm.pressed_edge(now_ms) {
            self.output.refresh(self.volume, now_ms);
            self.output.beep(self.volume, self.config.confirm_beep_ms).await;
            report.confirmed = true;
            report.refreshed = true;
        }

        if self.alarm.is_armed() {
            let amplitude = self.sampler.sample(&mut self.source, Channel::Microphone);
            report.amplitude = Some(amplitude);
            self.alarm.evaluate(amplitude);
            debug!(
                "amplitude {}, threshold {}, alarm {}",
                amplitude,
                self.alarm.threshold(),
                self.alarm.is_active()
            );
        }
        report.alarm_active = self.alarm.is_active();
        self.output.drive_alarm(report.alarm_active);

        if self.output.refresh_if_due(self.volume, now_ms) {
            report.refreshed = true;
        }

        report
    }

    pub const fn config(&self) -> &AlarmConfig {
        &self.config
    }

    pub const fn volume(&self) -> Volume {
        self.volume
    }

    pub const fn threshold(&self) -> u16 {
        self.alarm.threshold()
    }

    pub const fn state(&self) -> AlarmState {
        self.alarm.state()
    }

    pub const fn alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    pub const fn output(&self) -> &OutputCoordinator<D, T> {
        &self.output
    }

    pub const fn source(&self) -> &S {
        &self.source
    }
}
