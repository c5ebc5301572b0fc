//! Tunables for sampling, debouncing and the alarm decision.
//!
//! Every constant the monitor depends on lives in [`AlarmConfig`]. Changing the
//! sensitivity of the device is a one-place edit here, followed by
//! [`AlarmConfig::validate`] (the defaults are checked at compile time).
//!
//! # Margin coupling
//!
//! Calibration stores `threshold = ambient × calibration_margin_percent / 100`
//! and each tick alarms when `amplitude < threshold × alarm_factor`. The two
//! constants only make sense together: the alarm fires below
//! `calibration_margin_percent × alarm_factor` percent of the calibration
//! ambient, see [`AlarmConfig::effective_alarm_percent`]. With the defaults
//! (70 % and ×2) that is 140 %, i.e. the alarm is active even at the
//! calibration level itself. That behaviour is kept as shipped and reported
//! at start-up rather than silently corrected.

/// Reasons an [`AlarmConfig`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The amplitude burst must take at least one reading.
    EmptyBurst,
    /// Calibration margin outside `1..=100` percent.
    CalibrationMargin,
    /// Alarm factor of zero would disable the alarm forever.
    AlarmFactor,
    /// Axis thresholds must satisfy `low < high <= full_scale`.
    AxisThresholds,
    /// Volume step must be non-zero and divide 100.
    VolumeStep,
    /// Initial volume above 100 or not a multiple of the step.
    InitialVolume,
    /// A timing interval is zero.
    ZeroInterval,
}

/// All tunable constants of the monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmConfig {
    /// Raw readings averaged into one amplitude.
    pub burst_len: u16,
    /// Fraction of the ambient amplitude stored as threshold, in percent.
    pub calibration_margin_percent: u8,
    /// Multiplier applied to the stored threshold each tick.
    pub alarm_factor: u8,
    /// Axis readings below this raise the volume.
    pub axis_low: u16,
    /// Axis readings above this lower the volume.
    pub axis_high: u16,
    /// Full-scale reading of the sampler (12-bit converter).
    pub sampler_full_scale: u16,
    /// Minimum time between accepted axis steps.
    pub axis_repeat_ms: u64,
    /// Calibrate presses inside this window after a calibration are ignored.
    pub calibrate_lockout_ms: u64,
    /// Confirm presses inside this window after a confirmation are ignored.
    pub confirm_lockout_ms: u64,
    /// Periodic display repaint interval.
    pub refresh_interval_ms: u64,
    /// Loop period.
    pub tick_ms: u64,
    pub initial_volume: u8,
    pub volume_step: u8,
    pub calibrate_beep_ms: u32,
    pub confirm_beep_ms: u32,
}

impl AlarmConfig {
    pub const DEFAULT: Self = Self {
        burst_len: 1000,
        calibration_margin_percent: 70,
        alarm_factor: 2,
        axis_low: 500,
        axis_high: 3500,
        sampler_full_scale: 4095,
        axis_repeat_ms: 250,
        calibrate_lockout_ms: 1000,
        confirm_lockout_ms: 250,
        refresh_interval_ms: 500,
        tick_ms: 50,
        initial_volume: 50,
        volume_step: 10,
        calibrate_beep_ms: 200,
        confirm_beep_ms: 100,
    };

    /// Check the invariants the monitor relies on.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.burst_len == 0 {
            return Err(ConfigError::EmptyBurst);
        }
        if self.calibration_margin_percent == 0 || self.calibration_margin_percent > 100 {
            return Err(ConfigError::CalibrationMargin);
        }
        if self.alarm_factor == 0 {
            return Err(ConfigError::AlarmFactor);
        }
        if self.axis_low >= self.axis_high || self.axis_high > self.sampler_full_scale {
            return Err(ConfigError::AxisThresholds);
        }
        if self.volume_step == 0 || 100 % self.volume_step != 0 {
            return Err(ConfigError::VolumeStep);
        }
        if self.initial_volume > 100 || self.initial_volume % self.volume_step != 0 {
            return Err(ConfigError::InitialVolume);
        }
        if self.axis_repeat_ms == 0
            || self.calibrate_lockout_ms == 0
            || self.confirm_lockout_ms == 0
            || self.refresh_interval_ms == 0
            || self.tick_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// Alarm level as a percentage of the calibration ambient.
    pub const fn effective_alarm_percent(&self) -> u16 {
        self.calibration_margin_percent as u16 * self.alarm_factor as u16
    }

    /// Threshold stored for a given ambient amplitude (truncating).
    pub const fn threshold_for(&self, ambient: u16) -> u16 {
        (ambient as u32 * self.calibration_margin_percent as u32 / 100) as u16
    }

    /// Amplitude below which the alarm is active for a stored threshold.
    pub const fn alarm_level(&self, threshold: u16) -> u32 {
        threshold as u32 * self.alarm_factor as u32
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const _: () = assert!(AlarmConfig::DEFAULT.validate().is_ok());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(AlarmConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_margins_alarm_above_baseline() {
        assert_eq!(AlarmConfig::DEFAULT.effective_alarm_percent(), 140);
    }

    #[test]
    fn threshold_truncates() {
        let config = AlarmConfig::DEFAULT;
        assert_eq!(config.threshold_for(1000), 700);
        assert_eq!(config.threshold_for(999), 699);
        assert_eq!(config.threshold_for(1), 0);
        assert_eq!(config.alarm_level(700), 1400);
    }

    #[test]
    fn threshold_does_not_overflow_at_full_scale() {
        assert_eq!(AlarmConfig::DEFAULT.threshold_for(u16::MAX), 45_874);
    }

    #[test]
    fn rejects_inconsistent_values() {
        let base = AlarmConfig::DEFAULT;

        let config = AlarmConfig { burst_len: 0, ..base };
        assert_eq!(config.validate(), Err(ConfigError::EmptyBurst));

        let config = AlarmConfig { calibration_margin_percent: 101, ..base };
        assert_eq!(config.validate(), Err(ConfigError::CalibrationMargin));

        let config = AlarmConfig { alarm_factor: 0, ..base };
        assert_eq!(config.validate(), Err(ConfigError::AlarmFactor));

        let config = AlarmConfig { axis_low: 3500, axis_high: 500, ..base };
        assert_eq!(config.validate(), Err(ConfigError::AxisThresholds));

        let config = AlarmConfig { axis_high: 5000, ..base };
        assert_eq!(config.validate(), Err(ConfigError::AxisThresholds));

        let config = AlarmConfig { volume_step: 30, ..base };
        assert_eq!(config.validate(), Err(ConfigError::VolumeStep));

        let config = AlarmConfig { initial_volume: 55, ..base };
        assert_eq!(config.validate(), Err(ConfigError::InitialVolume));

        let config = AlarmConfig { refresh_interval_ms: 0, ..base };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }
}
