//! Volume, status text and the tone/display side of each tick.

use core::fmt::Write as _;

use heapless::String;

use crate::input::AxisStep;

/// Top of the tone generator's intensity range.
pub const TONE_LEVEL_MAX: u16 = 0xFFFF;

/// Rendered status line, e.g. `"Volume:  50%"`.
pub type StatusLine = String<16>;

/// Character display with a fixed cell grid.
pub trait TextDisplay {
    fn clear(&mut self);
    fn draw_text(&mut self, col: u8, row: u8, text: &str);
}

/// Buzzer with adjustable intensity.
///
/// Momentary beeps and the continuous alarm tone share the same output; a
/// beep leaves the output off when it finishes.
#[allow(async_fn_in_trait)]
pub trait ToneGenerator {
    /// Intensity used by subsequent beeps and the continuous tone,
    /// `0..=TONE_LEVEL_MAX`.
    fn set_level(&mut self, level: u16);
    fn set_continuous(&mut self, enabled: bool);
    /// Sound for `duration_ms`, then silence. Stalls the caller meanwhile.
    async fn beep(&mut self, duration_ms: u32);
}

/// Output volume in percent, `0..=100` in fixed steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Volume {
    percent: u8,
    step: u8,
}

impl Volume {
    pub const MAX: u8 = 100;

    /// `percent` is clamped to 100.
    pub const fn new(percent: u8, step: u8) -> Self {
        Self {
            percent: if percent > Self::MAX { Self::MAX } else { percent },
            step,
        }
    }

    pub const fn percent(self) -> u8 {
        self.percent
    }

    /// Move one step in the given direction, saturating at 0 and 100.
    /// Returns whether the volume changed.
    pub fn apply(&mut self, step: AxisStep) -> bool {
        let before = self.percent;
        self.percent = match step {
            AxisStep::Increase => self.percent.saturating_add(self.step).min(Self::MAX),
            AxisStep::Decrease => self.percent.saturating_sub(self.step),
        };
        self.percent != before
    }

    /// Volume scaled linearly onto the tone generator's range.
    pub const fn tone_level(self) -> u16 {
        (self.percent as u32 * TONE_LEVEL_MAX as u32 / Self::MAX as u32) as u16
    }
}

/// Status text for the display. Pure; identical input gives identical text.
pub fn render(volume: Volume) -> StatusLine {
    let mut line = StatusLine::new();
    // "Volume: 100%" is 12 bytes, the line holds 16
    let _ = write!(line, "Volume: {:>3}%", volume.percent());
    line
}

/// Owns the display and tone generator and keeps them in step with the
/// monitor's state.
pub struct OutputCoordinator<D, T> {
    display: D,
    tone: T,
    refresh_interval_ms: u64,
    last_refresh_ms: u64,
}

impl<D: TextDisplay, T: ToneGenerator> OutputCoordinator<D, T> {
    pub const fn new(display: D, tone: T, refresh_interval_ms: u64, now_ms: u64) -> Self {
        Self {
            display,
            tone,
            refresh_interval_ms,
            last_refresh_ms: now_ms,
        }
    }

    /// Clear and repaint the status line, restarting the refresh interval.
    pub fn refresh(&mut self, volume: Volume, now_ms: u64) {
        self.display.clear();
        self.display.draw_text(0, 0, &render(volume));
        self.last_refresh_ms = now_ms;
    }

    /// Repaint once more than the refresh interval has passed since the last
    /// paint. Returns whether it did.
    pub fn refresh_if_due(&mut self, volume: Volume, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_refresh_ms) <= self.refresh_interval_ms {
            return false;
        }
        self.refresh(volume, now_ms);
        true
    }

    pub fn apply_volume(&mut self, volume: Volume) {
        self.tone.set_level(volume.tone_level());
    }

    /// Fixed-length confirmation beep at the current volume.
    pub async fn beep(&mut self, volume: Volume, duration_ms: u32) {
        self.apply_volume(volume);
        self.tone.beep(duration_ms).await;
    }

    /// Re-assert the continuous alarm tone from the current alarm flag.
    pub fn drive_alarm(&mut self, active: bool) {
        self.tone.set_continuous(active);
    }

    pub const fn display(&self) -> &D {
        &self.display
    }

    pub const fn tone(&self) -> &T {
        &self.tone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_pads_percentage() {
        assert_eq!(render(Volume::new(50, 10)).as_str(), "Volume:  50%");
        assert_eq!(render(Volume::new(0, 10)).as_str(), "Volume:   0%");
        assert_eq!(render(Volume::new(100, 10)).as_str(), "Volume: 100%");
    }

    #[test]
    fn render_is_idempotent() {
        let volume = Volume::new(70, 10);
        assert_eq!(render(volume), render(volume));
    }

    #[test]
    fn volume_saturates() {
        let mut volume = Volume::new(90, 10);
        assert!(volume.apply(AxisStep::Increase));
        assert_eq!(volume.percent(), 100);
        assert!(!volume.apply(AxisStep::Increase));
        assert_eq!(volume.percent(), 100);

        let mut volume = Volume::new(10, 10);
        assert!(volume.apply(AxisStep::Decrease));
        assert!(!volume.apply(AxisStep::Decrease));
        assert_eq!(volume.percent(), 0);
    }

    #[test]
    fn volume_constructor_clamps() {
        assert_eq!(Volume::new(250, 10).percent(), 100);
    }

    #[test]
    fn tone_level_is_linear() {
        assert_eq!(Volume::new(0, 10).tone_level(), 0);
        assert_eq!(Volume::new(50, 10).tone_level(), 32_767);
        assert_eq!(Volume::new(100, 10).tone_level(), TONE_LEVEL_MAX);
    }
}
