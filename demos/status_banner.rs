//! Startup banner, connectivity status and save acknowledgement on the Pico 8-segment board.
//!
//! Three independent tasks share one display handle; their requests queue up and render in
//! the order they were made.
#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use led_8seg::{Result, SegDisplay, SegDisplayPins, SegDisplayStatic};
use panic_probe as _;

const BANNER_STEP: Duration = Duration::from_millis(250);
const STATUS_HOLD: Duration = Duration::from_secs(2);

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<core::convert::Infallible> {
    let p = embassy_rp::init(Default::default());

    static SEG_DISPLAY_STATIC: SegDisplayStatic = SegDisplay::new_static();
    let pins = SegDisplayPins {
        spi: p.SPI0,
        sck: p.PIN_18,
        mosi: p.PIN_19,
        latch: p.PIN_20,
        power: p.PIN_21,
    };
    let display = SegDisplay::new_pico(&SEG_DISPLAY_STATIC, pins, spawner)?;

    info!("Startup banner");
    display.display_rolling_text("HELLO", BANNER_STEP, 2, true);

    spawner.spawn(connectivity_status(display))?;
    spawner.spawn(save_acknowledgement(display))?;

    loop {
        Timer::after_secs(60).await;
        info!("display busy: {}", display.is_busy());
    }
}

#[embassy_executor::task]
async fn connectivity_status(display: SegDisplay<'static>) -> ! {
    let mut connected = false;
    loop {
        Timer::after_secs(10).await;
        connected = !connected;
        if connected {
            info!("Connected");
            display.display_text("Con.", STATUS_HOLD);
        } else {
            info!("Fallback access point");
            display.scroll_text("AP 192.168.4.1", BANNER_STEP);
        }
    }
}

#[embassy_executor::task]
async fn save_acknowledgement(display: SegDisplay<'static>) -> ! {
    loop {
        Timer::after_secs(25).await;
        info!("Settings saved");
        display.display_text("donE", STATUS_HOLD);
    }
}
