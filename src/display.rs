//! ST7789 status display — 320×170 LCD over SPI with DMA, used as a text grid.

use alarm_core::TextDisplay;
use defmt::warn;
use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        iso_8859_1::FONT_10X20,
    },
    pixelcolor::Rgb565,
    prelude::*,
    text::{
        Baseline,
        Text,
    },
};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Async,
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    spi::master::Spi,
    time::Rate,
};

use crate::DisplayResources;

type SpiInterface<'a> = mipidsi::interface::SpiInterface<
    'a,
    ExclusiveDevice<esp_hal::spi::master::SpiDmaBus<'a, Async>, Output<'a>, esp_hal::delay::Delay>,
    Output<'a>,
>;

type Lcd<'a> = mipidsi::Display<SpiInterface<'a>, mipidsi::models::ST7789, Output<'a>>;

/// Character cell size of [`FONT_10X20`].
const CELL_WIDTH: i32 = 10;
const CELL_HEIGHT: i32 = 20;
/// Inset of the text grid from the panel edge.
const MARGIN: i32 = 8;

/// Status LCD with its backlight, addressed in text cells.
pub struct StatusDisplay<'a> {
    lcd: Lcd<'a>,
    /// Held high for as long as the display lives.
    _backlight: Output<'a>,
    style: MonoTextStyle<'static, Rgb565>,
}

impl TextDisplay for StatusDisplay<'_> {
    fn clear(&mut self) {
        if self.lcd.clear(Rgb565::BLACK).is_err() {
            warn!("display clear failed");
        }
    }

    fn draw_text(&mut self, col: u8, row: u8, text: &str) {
        let origin = Point::new(
            MARGIN + i32::from(col) * CELL_WIDTH,
            MARGIN + i32::from(row) * CELL_HEIGHT,
        );
        if Text::with_baseline(text, origin, self.style, Baseline::Top)
            .draw(&mut self.lcd)
            .is_err()
        {
            warn!("display draw failed at {},{}", col, row);
        }
    }
}

impl<'a> From<DisplayResources<'a>> for StatusDisplay<'a> {
    fn from(res: DisplayResources<'a>) -> Self {
        let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(32000);
        let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
        let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

        let mut delay = esp_hal::delay::Delay::new();

        let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
        let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
        rst.set_high();

        let spi = Spi::new(
            res.spi,
            esp_hal::spi::master::Config::default().with_frequency(Rate::from_mhz(80)),
        )
        .unwrap()
        .with_sck(res.sck)
        .with_mosi(res.mosi)
        .with_miso(res.miso)
        .with_dma(res.dma)
        .with_buffers(dma_rx_buf, dma_tx_buf)
        .into_async();

        let cs = Output::new(res.cs, Level::High, OutputConfig::default());
        let spi_device = ExclusiveDevice::new(spi, cs, delay).unwrap();

        let buffer = crate::mk_static!([u8; 32000], [0_u8; 32000]);
        let di = mipidsi::interface::SpiInterface::new(spi_device, dc, buffer);

        let lcd = mipidsi::Builder::new(mipidsi::models::ST7789, di)
            .reset_pin(rst)
            .display_size(170, 320)
            .invert_colors(mipidsi::options::ColorInversion::Inverted)
            .orientation(
                mipidsi::options::Orientation::new().rotate(mipidsi::options::Rotation::Deg90),
            )
            .display_offset(35, 0)
            .init(&mut delay)
            .unwrap();

        Self {
            lcd,
            _backlight: Output::new(res.backlight, Level::High, OutputConfig::default()),
            style: MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE),
        }
    }
}
