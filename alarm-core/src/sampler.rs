//! Burst-averaged amplitude readings.

/// Analog inputs the monitor reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Microphone,
    JoystickY,
}

/// Raw analog source, one reading per call.
///
/// Implementations select `channel` before reading. Callers must not assume
/// the previous channel is still selected afterwards.
pub trait AnalogSampler {
    fn read_raw(&mut self, channel: Channel) -> u16;

    /// Called once before each burst on `channel`. Buffered sources drop
    /// readings captured before this point so the burst reflects the present.
    fn begin_burst(&mut self, _channel: Channel) {}
}

/// Averages a fixed-size burst of raw readings into one amplitude.
#[derive(Clone, Copy, Debug)]
pub struct AmplitudeSampler {
    burst_len: u16,
}

impl AmplitudeSampler {
    pub const fn new(burst_len: u16) -> Self {
        Self {
            burst_len: if burst_len == 0 { 1 } else { burst_len },
        }
    }

    pub const fn burst_len(&self) -> u16 {
        self.burst_len
    }

    /// Take `burst_len` fresh readings from `channel` back to back and return
    /// their truncated mean.
    pub fn sample<S: AnalogSampler>(&self, source: &mut S, channel: Channel) -> u16 {
        source.begin_burst(channel);
        let sum: u64 = (0..self.burst_len)
            .map(|_| u64::from(source.read_raw(channel)))
            .sum();
        (sum / u64::from(self.burst_len)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ramp {
        next: u16,
        reads: usize,
        bursts: usize,
        last_channel: Option<Channel>,
    }

    impl AnalogSampler for Ramp {
        fn read_raw(&mut self, channel: Channel) -> u16 {
            self.reads += 1;
            self.last_channel = Some(channel);
            let value = self.next;
            self.next += 1;
            value
        }

        fn begin_burst(&mut self, _channel: Channel) {
            assert_eq!(self.reads % 4, 0, "burst started mid-burst");
            self.bursts += 1;
        }
    }

    #[test]
    fn mean_is_truncated() {
        // 0 + 1 + 2 + 3 = 6, 6 / 4 = 1.5
        let mut ramp = Ramp::default();
        assert_eq!(AmplitudeSampler::new(4).sample(&mut ramp, Channel::Microphone), 1);
        assert_eq!(ramp.reads, 4);
        assert_eq!(ramp.last_channel, Some(Channel::Microphone));
    }

    #[test]
    fn full_scale_burst_does_not_overflow() {
        struct Pinned;
        impl AnalogSampler for Pinned {
            fn read_raw(&mut self, _: Channel) -> u16 {
                u16::MAX
            }
        }
        assert_eq!(AmplitudeSampler::new(u16::MAX).sample(&mut Pinned, Channel::JoystickY), u16::MAX);
    }

    #[test]
    fn zero_burst_reads_once() {
        let mut ramp = Ramp { next: 42, ..Ramp::default() };
        let sampler = AmplitudeSampler::new(0);
        assert_eq!(sampler.burst_len(), 1);
        assert_eq!(sampler.sample(&mut ramp, Channel::Microphone), 42);
        assert_eq!(ramp.reads, 1);
    }

    #[test]
    fn each_burst_starts_fresh() {
        let mut ramp = Ramp::default();
        let sampler = AmplitudeSampler::new(4);
        sampler.sample(&mut ramp, Channel::Microphone);
        sampler.sample(&mut ramp, Channel::Microphone);
        assert_eq!(ramp.bursts, 2);
        assert_eq!(ramp.reads, 8);
    }
}
