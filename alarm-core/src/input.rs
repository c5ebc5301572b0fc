//! Debounced control inputs: press-edge buttons and a rate-limited joystick axis.

use embedded_hal::digital::InputPin;

/// Direction of an accepted axis movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisStep {
    Increase,
    Decrease,
}

/// Turns a continuous axis reading into discrete steps, at most one per
/// `repeat_ms`.
///
/// Readings below `low` are [`AxisStep::Increase`] (stick pushed up on the
/// board), readings above `high` are [`AxisStep::Decrease`], anything in
/// between is ignored.
#[derive(Clone, Copy, Debug)]
pub struct RateLimitedAxis {
    low: u16,
    high: u16,
    repeat_ms: u64,
    last_accepted_ms: u64,
}

impl RateLimitedAxis {
    /// `now_ms` seeds the rate limiter, so the first step is accepted no
    /// earlier than `repeat_ms` after construction.
    pub const fn new(low: u16, high: u16, repeat_ms: u64, now_ms: u64) -> Self {
        Self {
            low,
            high,
            repeat_ms,
            last_accepted_ms: now_ms,
        }
    }

    pub fn poll(&mut self, value: u16, now_ms: u64) -> Option<AxisStep> {
        self.poll_with(value, now_ms, |_| true)
    }

    /// Like [`poll`](Self::poll), but the window only restarts when `apply`
    /// accepts the step. A step that changes nothing (volume already at a
    /// limit) leaves the window open, so a reversal is taken on the next tick.
    pub fn poll_with(
        &mut self,
        value: u16,
        now_ms: u64,
        apply: impl FnOnce(AxisStep) -> bool,
    ) -> Option<AxisStep> {
        if now_ms.saturating_sub(self.last_accepted_ms) < self.repeat_ms {
            return None;
        }

        let step = if value < self.low {
            AxisStep::Increase
        } else if value > self.high {
            AxisStep::Decrease
        } else {
            return None;
        };

        if !apply(step) {
            return None;
        }

        self.last_accepted_ms = now_ms;
        Some(step)
    }
}

/// Two-button stand-in for an analog axis, on the sampler's native scale.
///
/// Up (active low) reads 0, down reads `full_scale`, neither or both read the
/// midpoint.
pub struct ButtonAxis<U, D> {
    up: U,
    down: D,
    full_scale: u16,
}

impl<U: InputPin, D: InputPin> ButtonAxis<U, D> {
    pub const fn new(up: U, down: D, full_scale: u16) -> Self {
        Self { up, down, full_scale }
    }

    /// A pin read error counts as released.
    pub fn read(&mut self) -> u16 {
        let up = self.up.is_low().unwrap_or(false);
        let down = self.down.is_low().unwrap_or(false);
        match (up, down) {
            (true, false) => 0,
            (false, true) => self.full_scale,
            _ => self.full_scale / 2 + 1,
        }
    }
}

/// Active-low push button that reports each physical press exactly once.
///
/// The pin level is compared with the previous poll; only a released→pressed
/// transition counts. Holding the button never repeats and never blocks.
/// Accepted presses are further spaced by `lockout_ms`.
pub struct EdgeButton<P> {
    pin: P,
    was_pressed: bool,
    lockout_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl<P: InputPin> EdgeButton<P> {
    pub const fn new(pin: P, lockout_ms: u64) -> Self {
        Self {
            pin,
            was_pressed: false,
            lockout_ms,
            last_accepted_ms: None,
        }
    }

    /// Sample the pin once; `true` on an accepted press edge.
    ///
    /// A pin read error counts as released.
    pub fn pressed_edge(&mut self, now_ms: u64) -> bool {
        let pressed = self.pin.is_low().unwrap_or(false);
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;

        if !edge {
            return false;
        }

        if let Some(last) = self.last_accepted_ms
            && now_ms.saturating_sub(last) < self.lockout_ms
        {
            return false;
        }

        self.last_accepted_ms = Some(now_ms);
        true
    }

    /// Level seen by the most recent poll.
    pub const fn is_held(&self) -> bool {
        self.was_pressed
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock,
        State as PinState,
        Transaction as PinTransaction,
    };

    use super::*;

    fn levels(states: &[PinState]) -> PinMock {
        let expectations: std::vec::Vec<PinTransaction> =
            states.iter().map(|s| PinTransaction::get(*s)).collect();
        PinMock::new(&expectations)
    }

    #[test]
    fn axis_ignores_mid_band() {
        let mut axis = RateLimitedAxis::new(500, 3500, 250, 0);
        assert_eq!(axis.poll(2048, 1000), None);
        assert_eq!(axis.poll(500, 1000), None);
        assert_eq!(axis.poll(3500, 1000), None);
    }

    #[test]
    fn axis_directions() {
        let mut axis = RateLimitedAxis::new(500, 3500, 250, 0);
        assert_eq!(axis.poll(0, 250), Some(AxisStep::Increase));
        assert_eq!(axis.poll(4095, 500), Some(AxisStep::Decrease));
    }

    #[test]
    fn axis_rate_limit_applies_regardless_of_value() {
        let mut axis = RateLimitedAxis::new(500, 3500, 250, 0);
        assert_eq!(axis.poll(0, 100), None);
        assert_eq!(axis.poll(0, 249), None);
        assert_eq!(axis.poll(0, 250), Some(AxisStep::Increase));
        assert_eq!(axis.poll(4095, 300), None);
        assert_eq!(axis.poll(4095, 499), None);
        assert_eq!(axis.poll(4095, 500), Some(AxisStep::Decrease));
    }

    #[test]
    fn axis_mid_band_does_not_restart_window() {
        let mut axis = RateLimitedAxis::new(500, 3500, 250, 0);
        assert_eq!(axis.poll(2000, 300), None);
        assert_eq!(axis.poll(0, 310), Some(AxisStep::Increase));
    }

    #[test]
    fn held_axis_steps_once_per_window() {
        let mut axis = RateLimitedAxis::new(500, 3500, 250, 0);
        let steps = (1..=40)
            .map(|tick| axis.poll(0, tick * 50))
            .filter(Option::is_some)
            .count();
        // 2000 ms of ticks, one step per 250 ms
        assert_eq!(steps, 8);
    }

    #[test]
    fn axis_step_rejected_by_apply_keeps_window_open() {
        let mut axis = RateLimitedAxis::new(500, 3500, 250, 0);
        assert_eq!(axis.poll_with(0, 250, |_| false), None);
        assert_eq!(axis.poll_with(4095, 300, |_| true), Some(AxisStep::Decrease));
        assert_eq!(axis.poll_with(4095, 400, |_| true), None);
        assert_eq!(axis.poll_with(4095, 550, |_| true), Some(AxisStep::Decrease));
    }

    #[test]
    fn button_axis_maps_onto_full_scale() {
        let mut up = levels(&[PinState::Low, PinState::High, PinState::High, PinState::Low]);
        let mut down = levels(&[PinState::High, PinState::Low, PinState::High, PinState::Low]);
        let mut axis = ButtonAxis::new(up.clone(), down.clone(), 4095);

        assert_eq!(axis.read(), 0);
        assert_eq!(axis.read(), 4095);
        assert_eq!(axis.read(), 2048);
        assert_eq!(axis.read(), 2048);

        up.done();
        down.done();
    }

    #[test]
    fn released_button_axis_stays_in_dead_band() {
        let mut up = levels(&[PinState::High; 20]);
        let mut down = levels(&[PinState::High; 20]);
        let mut buttons = ButtonAxis::new(up.clone(), down.clone(), 4095);
        let mut axis = RateLimitedAxis::new(500, 3500, 250, 0);

        for tick in 1..=20 {
            assert_eq!(axis.poll(buttons.read(), tick * 50), None);
        }

        up.done();
        down.done();
    }

    #[test]
    fn button_reports_press_once_while_held() {
        let mut pin = levels(&[
            PinState::High,
            PinState::Low,
            PinState::Low,
            PinState::Low,
            PinState::High,
        ]);
        let mut button = EdgeButton::new(pin.clone(), 0);

        assert!(!button.pressed_edge(0));
        assert!(button.pressed_edge(50));
        assert!(button.is_held());
        assert!(!button.pressed_edge(100));
        assert!(!button.pressed_edge(150));
        assert!(!button.pressed_edge(200));
        assert!(!button.is_held());

        pin.done();
    }

    #[test]
    fn button_repress_after_release_is_reported() {
        let mut pin = levels(&[PinState::Low, PinState::High, PinState::Low]);
        let mut button = EdgeButton::new(pin.clone(), 0);

        assert!(button.pressed_edge(0));
        assert!(!button.pressed_edge(50));
        assert!(button.pressed_edge(100));

        pin.done();
    }

    #[test]
    fn button_lockout_swallows_fast_repress() {
        let mut pin = levels(&[
            PinState::Low,
            PinState::High,
            PinState::Low,
            PinState::High,
            PinState::Low,
        ]);
        let mut button = EdgeButton::new(pin.clone(), 1000);

        assert!(button.pressed_edge(0));
        assert!(!button.pressed_edge(50));
        assert!(!button.pressed_edge(100));
        assert!(!button.pressed_edge(900));
        assert!(button.pressed_edge(1000));

        pin.done();
    }
}
