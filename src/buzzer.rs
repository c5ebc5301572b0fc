//! Piezo buzzer on two LEDC PWM channels.
//!
//! Both lines carry the same square wave so either pin can drive the piezo.
//! Loudness is set through the duty cycle, 0 % (silent) to 50 % (loudest).

use alarm_core::{
    TONE_LEVEL_MAX,
    ToneGenerator,
};
use defmt::warn;
use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::{
    gpio::DriveMode,
    ledc::{
        LSGlobalClkSource,
        Ledc,
        LowSpeed,
        channel::{
            self,
            ChannelIFace as _,
        },
        timer::{
            self,
            TimerIFace as _,
        },
    },
    time::Rate,
};

use crate::BuzzerResources;

/// Tone frequency, near the resonance of common piezo discs.
pub const TONE_FREQUENCY_HZ: u32 = 2_700;

const MAX_DUTY_PCT: u32 = 50;

/// Two-line piezo driver implementing [`ToneGenerator`].
pub struct Buzzer {
    a: channel::Channel<'static, LowSpeed>,
    b: channel::Channel<'static, LowSpeed>,
    duty_pct: u8,
    continuous: bool,
}

impl From<BuzzerResources<'static>> for Buzzer {
    fn from(res: BuzzerResources<'static>) -> Self {
        let ledc = crate::mk_static!(Ledc<'static>, Ledc::new(res.ledc));
        ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

        let tone_timer = crate::mk_static!(
            timer::Timer<'static, LowSpeed>,
            ledc.timer::<LowSpeed>(timer::Number::Timer0)
        );
        tone_timer
            .configure(timer::config::Config {
                duty: timer::config::Duty::Duty10Bit,
                clock_source: timer::LSClockSource::APBClk,
                frequency: Rate::from_hz(TONE_FREQUENCY_HZ),
            })
            .unwrap();
        let tone_timer: &'static timer::Timer<'static, LowSpeed> = tone_timer;

        let silent = move || channel::config::Config {
            timer: tone_timer,
            duty_pct: 0,
            drive_mode: DriveMode::PushPull,
        };

        let mut a = ledc.channel(channel::Number::Channel0, res.a);
        a.configure(silent()).unwrap();
        let mut b = ledc.channel(channel::Number::Channel1, res.b);
        b.configure(silent()).unwrap();

        Self {
            a,
            b,
            duty_pct: 0,
            continuous: false,
        }
    }
}

impl Buzzer {
    fn write_duty(&mut self, duty_pct: u8) {
        if self.a.set_duty(duty_pct).is_err() || self.b.set_duty(duty_pct).is_err() {
            warn!("buzzer duty update to {}% failed", duty_pct);
        }
    }
}

impl ToneGenerator for Buzzer {
    fn set_level(&mut self, level: u16) {
        self.duty_pct = (u32::from(level) * MAX_DUTY_PCT / u32::from(TONE_LEVEL_MAX)) as u8;
        if self.continuous {
            self.write_duty(self.duty_pct);
        }
    }

    fn set_continuous(&mut self, enabled: bool) {
        self.continuous = enabled;
        self.write_duty(if enabled { self.duty_pct } else { 0 });
    }

    async fn beep(&mut self, duration_ms: u32) {
        self.write_duty(self.duty_pct);
        Timer::after(Duration::from_millis(u64::from(duration_ms))).await;
        self.write_duty(0);
        self.continuous = false;
    }
}
