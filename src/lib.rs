//! # quiet-alarm
//!
//! Board support for running the silence alarm on the Disobey 2026 badge.
//!
//! Wires the badge peripherals to the traits of [`alarm_core`]:
//! - **Display**: 320×170 ST7789 LCD over SPI with DMA, used as a text grid
//! - **Buttons**: A button calibrates, joystick click confirms, D-pad up/down
//!   sets the volume (all active low)
//! - **Sampler**: I2S MEMS microphone plus the D-pad read as a volume axis
//! - **Buzzer**: external piezo on the expansion pins, driven from two LEDC
//!   PWM channels
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = quiet_alarm::init();
//! let resources = quiet_alarm::split_resources!(peripherals);
//!
//! let display: quiet_alarm::StatusDisplay = resources.display.into();
//! let buttons: quiet_alarm::ControlButtons = resources.buttons.into();
//! let buzzer: quiet_alarm::Buzzer = resources.buzzer.into();
//! ```

#![no_std]

mod buttons;
mod buzzer;
mod display;
pub mod microphone;
mod sampler;

pub use buttons::ControlButtons;
pub use buzzer::Buzzer;
pub use display::StatusDisplay;
use esp_hal::{
    assign_resources,
    clock::CpuClock,
};
pub use microphone::Microphone;
pub use sampler::{
    BoardSampler,
    DpadAxis,
};

/// StaticCell helper — allocates a value into a `static` exactly once.
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}

// ── Pin / peripheral assignments ────────────────────────────────────────────

assign_resources! {
    pub Resources<'d> {
        display: DisplayResources<'d> {
            dc: GPIO15,
            rst: GPIO7,
            sck: GPIO4,
            cs: GPIO6,
            miso: GPIO16,
            mosi: GPIO5,
            spi: SPI2,
            dma: DMA_CH0,
            backlight: GPIO19,
        },
        buttons: ButtonResources<'d> {
            up: GPIO11,
            down: GPIO1,
            calibrate: GPIO13,
            confirm: GPIO14,
        },
        mic: MicResources<'d> {
            ws: GPIO8,
            sd: GPIO3,
            dio: GPIO46,
            i2s: I2S0,
            dma: DMA_CH1,
        },
        // not on the badge itself: piezo wired to the expansion header
        buzzer: BuzzerResources<'d> {
            a: GPIO40,
            b: GPIO41,
            ledc: LEDC,
        }
    }
}

// ── Board initialisation ────────────────────────────────────────────────────

/// Initialise the badge hardware and return the raw peripheral set.
///
/// Call this once at the top of `main`, then use [`split_resources!`] to
/// break the peripherals into typed resource groups.
#[must_use]
pub fn init() -> esp_hal::peripherals::Peripherals {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::_160MHz);
    esp_hal::init(config)
}

impl From<esp_hal::peripherals::Peripherals> for Resources<'_> {
    fn from(peripherals: esp_hal::peripherals::Peripherals) -> Self {
        split_resources!(peripherals)
    }
}
