//! Wiring for the Raspberry Pi Pico 8-segment board: two shift registers on SPI0.

use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{PIN_18, PIN_19, PIN_20, PIN_21, SPI0};
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_time::Delay;

use super::{Processor, SegDisplay, SegDisplayStatic};
use crate::Result;
use crate::digit_bus::ShiftRegisterBus;

/// SPI clock for the shift registers.
const SPI_FREQUENCY_HZ: u32 = 10_000_000;

/// The concrete bus type the background task owns.
pub type PicoBus = ShiftRegisterBus<Spi<'static, SPI0, Blocking>, Output<'static>, Delay>;

/// Peripherals the board uses: SCK on GPIO18, MOSI on GPIO19, latch (RCLK) on GPIO20 and the
/// power enable on GPIO21.
pub struct SegDisplayPins {
    pub spi: SPI0,
    pub sck: PIN_18,
    pub mosi: PIN_19,
    pub latch: PIN_20,
    pub power: PIN_21,
}

impl SegDisplay<'static> {
    /// Creates the display device and spawns its background task.
    ///
    /// # Errors
    ///
    /// Returns an error if the latch can't be driven or the task cannot be spawned.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # #![no_std]
    /// # #![no_main]
    /// use embassy_time::Duration;
    /// use led_8seg::{SegDisplay, SegDisplayPins, SegDisplayStatic};
    /// # #[panic_handler]
    /// # fn panic(_info: &core::panic::PanicInfo) -> ! { loop {} }
    ///
    /// async fn example(p: embassy_rp::Peripherals, spawner: embassy_executor::Spawner) -> led_8seg::Result<()> {
    ///     static SEG_DISPLAY_STATIC: SegDisplayStatic = SegDisplay::new_static();
    ///     let pins = SegDisplayPins {
    ///         spi: p.SPI0,
    ///         sck: p.PIN_18,
    ///         mosi: p.PIN_19,
    ///         latch: p.PIN_20,
    ///         power: p.PIN_21,
    ///     };
    ///     let display = SegDisplay::new_pico(&SEG_DISPLAY_STATIC, pins, spawner)?;
    ///     display.display_text("1234", Duration::from_secs(1));
    ///     Ok(())
    /// }
    /// ```
    pub fn new_pico(
        seg_display_static: &'static SegDisplayStatic,
        pins: SegDisplayPins,
        spawner: Spawner,
    ) -> Result<Self> {
        let mut config = spi::Config::default();
        config.frequency = SPI_FREQUENCY_HZ;
        let spi = Spi::new_blocking_txonly(pins.spi, pins.sck, pins.mosi, config);
        let latch = Output::new(pins.latch, Level::High);
        let power = Output::new(pins.power, Level::High);
        let bus = ShiftRegisterBus::new(spi, latch, Delay)?;
        spawner.spawn(device_loop(seg_display_static, bus, power))?;
        Ok(Self::new(seg_display_static))
    }
}

#[embassy_executor::task]
async fn device_loop(
    seg_display_static: &'static SegDisplayStatic,
    bus: PicoBus,
    // Held so the board stays powered.
    _power: Output<'static>,
) -> ! {
    let mut processor = Processor::new(seg_display_static, bus);
    let err = processor.run().await.unwrap_err();
    panic!("{err}");
}
