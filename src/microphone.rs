//! I2S MEMS microphone as a stream of magnitude readings.
//!
//! The badge has an I2S microphone connected via:
//! - WS (word select / LRCLK) on GPIO8
//! - SD (serial data / DIN) on GPIO3
//! - DIO (bit clock / BCLK) on GPIO46
//!
//! Samples are pulled through DMA one block at a time and handed out one by
//! one, scaled onto the same 12-bit range as the volume axis.

use defmt::warn;
use esp_hal::{
    Blocking,
    dma::DmaDescriptor,
    i2s::master::{
        Channels,
        Config,
        DataFormat,
        I2s,
        I2sRx,
    },
    time::Rate,
};

use crate::MicResources;

/// Default sample rate for the microphone (16 kHz).
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Words fetched per DMA read.
pub const BLOCK_LEN: usize = 256;

/// 16-bit PCM magnitude (0..=32768) down to 12 bits.
const MAGNITUDE_SHIFT: u32 = 3;

/// I2S microphone with a block buffer of pending samples.
pub struct Microphone<'a> {
    rx: I2sRx<'a, Blocking>,
    block: [i16; BLOCK_LEN],
    cursor: usize,
}

impl<'a> Microphone<'a> {
    /// Create a new microphone from raw resources and a static descriptor slice.
    ///
    /// `sample_rate` is in Hz (e.g. 16000 for 16 kHz).
    /// `descriptors` must be a `&'static mut` slice — use [`mk_static!`](crate::mk_static)
    /// or a static array.
    pub fn new(
        res: MicResources<'a>,
        sample_rate: u32,
        descriptors: &'static mut [DmaDescriptor],
    ) -> Self {
        let i2s = I2s::new(
            res.i2s,
            res.dma,
            Config::new_tdm_philips()
                .with_sample_rate(Rate::from_hz(sample_rate))
                .with_data_format(DataFormat::Data16Channel16)
                .with_channels(Channels::MONO),
        )
        .unwrap();

        let rx = i2s
            .i2s_rx
            .with_bclk(res.dio)
            .with_ws(res.ws)
            .with_din(res.sd)
            .build(descriptors);

        Self {
            rx,
            block: [0; BLOCK_LEN],
            cursor: BLOCK_LEN,
        }
    }

    /// Next sample magnitude on a 0..=4096 scale.
    ///
    /// Refills the block when it is used up. A failed DMA read drops the
    /// block and reads as silence.
    pub fn next_magnitude(&mut self) -> u16 {
        if self.cursor == BLOCK_LEN {
            if let Err(e) = self.rx.read_words(&mut self.block) {
                warn!("microphone read failed: {}", e);
                self.block = [0; BLOCK_LEN];
            }
            self.cursor = 0;
        }

        let sample = self.block[self.cursor];
        self.cursor += 1;
        sample.unsigned_abs() >> MAGNITUDE_SHIFT
    }

    /// Drop the unread rest of the current block; the next read starts a
    /// fresh DMA transfer.
    pub fn discard_pending(&mut self) {
        self.cursor = BLOCK_LEN;
    }
}
