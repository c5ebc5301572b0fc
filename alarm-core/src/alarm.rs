//! Calibration and the level-triggered "too quiet" decision.

use crate::config::AlarmConfig;

/// Whether a threshold has been set since power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    /// Threshold is 0, the alarm is gated off.
    Uncalibrated,
    Armed,
}

/// Owns the sound threshold and the alarm flag.
///
/// Invariant: while the threshold is 0 the alarm is never active.
#[derive(Clone, Copy, Debug)]
pub struct SoundAlarm {
    config: AlarmConfig,
    threshold: u16,
    active: bool,
}

impl SoundAlarm {
    pub const fn new(config: AlarmConfig) -> Self {
        Self {
            config,
            threshold: 0,
            active: false,
        }
    }

    /// Store a threshold derived from the ambient amplitude and return it.
    ///
    /// Allowed in either state. The alarm flag is cleared; it is re-evaluated
    /// from the next amplitude passed to [`evaluate`](Self::evaluate), never
    /// from the calibration sample. A near-silent ambient yields threshold 0
    /// and leaves the machine [`AlarmState::Uncalibrated`].
    pub fn calibrate(&mut self, ambient: u16) -> u16 {
        self.threshold = self.config.threshold_for(ambient);
        self.active = false;
        if self.threshold == 0 {
            warn!("calibration ambient {} too low, alarm stays disabled", ambient);
        } else {
            info!(
                "calibrated: ambient {}, threshold {}, alarm below {}",
                ambient,
                self.threshold,
                self.alarm_level()
            );
        }
        self.threshold
    }

    /// Decide from the current amplitude alone whether the alarm holds.
    pub fn evaluate(&mut self, amplitude: u16) -> bool {
        self.active = self.threshold > 0 && u32::from(amplitude) < self.alarm_level();
        self.active
    }

    pub const fn state(&self) -> AlarmState {
        if self.threshold == 0 {
            AlarmState::Uncalibrated
        } else {
            AlarmState::Armed
        }
    }

    pub const fn is_armed(&self) -> bool {
        self.threshold > 0
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn threshold(&self) -> u16 {
        self.threshold
    }

    pub const fn alarm_level(&self) -> u32 {
        self.config.alarm_level(self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncalibrated_and_silent() {
        let mut alarm = SoundAlarm::new(AlarmConfig::DEFAULT);
        assert_eq!(alarm.state(), AlarmState::Uncalibrated);
        assert!(!alarm.evaluate(0));
        assert!(!alarm.evaluate(u16::MAX));
        assert!(!alarm.is_active());
    }

    #[test]
    fn baseline_scenario() {
        let mut alarm = SoundAlarm::new(AlarmConfig::DEFAULT);
        assert_eq!(alarm.calibrate(1000), 700);
        assert_eq!(alarm.state(), AlarmState::Armed);
        assert!(!alarm.evaluate(1500));
        assert!(!alarm.evaluate(1400));
        assert!(alarm.evaluate(1399));
        assert!(alarm.evaluate(1000));
    }

    #[test]
    fn decision_ignores_previous_tick() {
        let mut alarm = SoundAlarm::new(AlarmConfig::DEFAULT);
        alarm.calibrate(1000);
        let samples = [1000, 1000, 2000, 100, 1400, 0, 5000];
        for amplitude in samples {
            assert_eq!(alarm.evaluate(amplitude), amplitude < 1400);
        }
    }

    #[test]
    fn recalibration_overwrites_and_clears_flag() {
        let mut alarm = SoundAlarm::new(AlarmConfig::DEFAULT);
        alarm.calibrate(1000);
        assert!(alarm.evaluate(100));
        assert_eq!(alarm.calibrate(2000), 1400);
        assert!(!alarm.is_active());
        assert!(alarm.evaluate(2000));
        assert!(!alarm.evaluate(2800));
    }

    #[test]
    fn silent_calibration_disarms() {
        let mut alarm = SoundAlarm::new(AlarmConfig::DEFAULT);
        alarm.calibrate(1000);
        assert_eq!(alarm.calibrate(1), 0);
        assert_eq!(alarm.state(), AlarmState::Uncalibrated);
        assert!(!alarm.evaluate(0));
    }
}
