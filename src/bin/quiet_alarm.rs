//! Silence alarm: calibrate to the ambient sound level, then sound the buzzer
//! whenever it drops below the calibrated threshold.
//!
//! Controls: A calibrates, D-pad up/down sets the volume, the joystick click
//! repaints the status line and beeps.

#![no_std]
#![no_main]

use alarm_core::{
    AlarmConfig,
    ButtonAxis,
    Monitor,
};
use defmt::info;
use embassy_executor::Spawner;
use embassy_time::{
    Duration,
    Instant,
    Timer,
};
use esp_backtrace as _;
use esp_hal::{
    dma::DmaDescriptor,
    gpio::Input,
    timer::timg::TimerGroup,
};
use esp_println as _;
#[allow(clippy::wildcard_imports)]
use quiet_alarm::*;

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

type BoardMonitor =
    Monitor<BoardSampler, Input<'static>, Input<'static>, StatusDisplay<'static>, Buzzer>;

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

#[embassy_executor::task]
async fn monitor_task(monitor: &'static mut BoardMonitor) {
    let period = Duration::from_millis(monitor.config().tick_ms);
    monitor.start(now_ms());

    loop {
        monitor.tick(now_ms()).await;
        Timer::after(period).await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = quiet_alarm::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let descriptors = mk_static!([DmaDescriptor; 8], [DmaDescriptor::EMPTY; 8]);
    let mic = microphone::Microphone::new(resources.mic, microphone::DEFAULT_SAMPLE_RATE, descriptors);
    let buttons: ControlButtons = resources.buttons.into();
    let display: StatusDisplay<'static> = resources.display.into();
    let buzzer: Buzzer = resources.buzzer.into();

    let config = AlarmConfig::DEFAULT;
    let axis = ButtonAxis::new(buttons.up, buttons.down, config.sampler_full_scale);
    let sampler = BoardSampler::new(mic, axis);
    info!("quiet-alarm starting: {}", config);

    let monitor = mk_static!(
        BoardMonitor,
        Monitor::new(
            config,
            sampler,
            buttons.calibrate,
            buttons.confirm,
            display,
            buzzer,
            now_ms(),
        )
        .unwrap()
    );
    spawner.must_spawn(monitor_task(monitor));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
