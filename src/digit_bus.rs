//! The shift-register bus that selects a digit and latches its segment pattern.
//!
//! See [`ShiftRegisterBus`] for the write protocol.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::Result;
use crate::error::Error::{BusWrite, CannotSetOutputState};

/// The number of cells (digits) in the display.
pub const CELL_COUNT: usize = 4;

/// How long the latch is held low while the registers take the new bytes.
pub const LATCH_HOLD_MS: u32 = 1;

/// One of the four physical digits.
///
/// The discriminant is the select byte shifted out ahead of the pattern. Selects are
/// active-low: the cleared bit picks the digit.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DigitPosition {
    Thousands = 0xFE,
    Hundreds = 0xFD,
    Tens = 0xFB,
    Units = 0xF7,
}

impl DigitPosition {
    /// All positions, left to right.
    pub const ALL: [Self; CELL_COUNT] = [Self::Thousands, Self::Hundreds, Self::Tens, Self::Units];

    /// The byte that selects this digit.
    #[must_use]
    pub const fn select(self) -> u8 {
        self as u8
    }

    /// Index of this digit counted from the left.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Thousands => 0,
            Self::Hundreds => 1,
            Self::Tens => 2,
            Self::Units => 3,
        }
    }
}

/// Something that can show a segment pattern on one digit.
///
/// Multiplexing relies on the caller rewriting every lit digit once per refresh; a write
/// only holds until the next one.
pub trait DigitBus {
    /// Shows `bits` on `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    fn write(&mut self, position: DigitPosition, bits: u8) -> Result<()>;
}

impl<T: DigitBus + ?Sized> DigitBus for &mut T {
    fn write(&mut self, position: DigitPosition, bits: u8) -> Result<()> {
        (**self).write(position, bits)
    }
}

/// A pair of daisy-chained shift registers behind an SPI bus and a latch pin.
///
/// Each [`DigitBus::write`] is one blocking transaction: latch high, select byte, pattern
/// byte, latch low, hold [`LATCH_HOLD_MS`], latch high.
///
/// # Example
///
/// ```
/// use embedded_hal_mock::eh1::delay::NoopDelay;
/// use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
/// use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
/// use led_8seg::{DigitBus, DigitPosition, ShiftRegisterBus, encode};
///
/// let mut spi = SpiMock::new(&[
///     SpiTransaction::write_vec(vec![0xF7]),
///     SpiTransaction::write_vec(vec![encode('7')]),
///     SpiTransaction::flush(),
/// ]);
/// let mut latch = PinMock::new(&[
///     PinTransaction::set(State::High),
///     PinTransaction::set(State::High),
///     PinTransaction::set(State::Low),
///     PinTransaction::set(State::High),
/// ]);
///
/// let mut bus = ShiftRegisterBus::new(spi.clone(), latch.clone(), NoopDelay)?;
/// bus.write(DigitPosition::Units, encode('7'))?;
///
/// spi.done();
/// latch.done();
/// # Ok::<(), led_8seg::Error>(())
/// ```
pub struct ShiftRegisterBus<S, L, D> {
    spi: S,
    latch: L,
    delay: D,
}

impl<S, L, D> ShiftRegisterBus<S, L, D>
where
    S: SpiBus<u8>,
    L: OutputPin,
    D: DelayNs,
{
    /// Creates the bus and parks the latch high.
    ///
    /// # Errors
    ///
    /// Returns an error if the latch pin cannot be driven.
    pub fn new(spi: S, mut latch: L, delay: D) -> Result<Self> {
        latch.set_high().map_err(|_| CannotSetOutputState)?;
        Ok(Self { spi, latch, delay })
    }

    /// Gives back the SPI bus, latch pin and delay.
    pub fn release(self) -> (S, L, D) {
        (self.spi, self.latch, self.delay)
    }

    #[inline]
    fn set_latch(&mut self, high: bool) -> Result<()> {
        if high {
            self.latch.set_high()
        } else {
            self.latch.set_low()
        }
        .map_err(|_| CannotSetOutputState)
    }
}

impl<S, L, D> DigitBus for ShiftRegisterBus<S, L, D>
where
    S: SpiBus<u8>,
    L: OutputPin,
    D: DelayNs,
{
    fn write(&mut self, position: DigitPosition, bits: u8) -> Result<()> {
        self.set_latch(true)?;
        // A failed shift never gets latched, so nothing half-written reaches the digits.
        self.spi.write(&[position.select()]).map_err(|_| BusWrite)?;
        self.spi.write(&[bits]).map_err(|_| BusWrite)?;
        self.spi.flush().map_err(|_| BusWrite)?;
        self.set_latch(false)?;
        self.delay.delay_ms(LATCH_HOLD_MS);
        self.set_latch(true)
    }
}
