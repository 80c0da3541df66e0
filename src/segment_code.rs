//! Character to segment-pattern lookup for 7-segment digits.
//!
//! [`encode`] maps one character to its bit pattern. [`to_cells`] turns a whole text into
//! per-digit patterns, folding each `.` into the digit before it.

use heapless::Vec;

use crate::render_job::TEXT_CAPACITY;

/// Segment patterns for a text, one entry per digit cell.
pub type Cells = Vec<u8, TEXT_CAPACITY>;

// ============================================================================
// LED Constants
// ============================================================================

/// Constants for 7-segment LED displays.
pub struct Leds;

impl Leds {
    /// Segment A of the 7-segment display.
    pub const SEG_A: u8 = 0b_0000_0001;
    /// Segment B of the 7-segment display.
    pub const SEG_B: u8 = 0b_0000_0010;
    /// Segment C of the 7-segment display.
    pub const SEG_C: u8 = 0b_0000_0100;
    /// Segment D of the 7-segment display.
    pub const SEG_D: u8 = 0b_0000_1000;
    /// Segment E of the 7-segment display.
    pub const SEG_E: u8 = 0b_0001_0000;
    /// Segment F of the 7-segment display.
    pub const SEG_F: u8 = 0b_0010_0000;
    /// Segment G of the 7-segment display.
    pub const SEG_G: u8 = 0b_0100_0000;
    /// Decimal point of the 7-segment display.
    pub const DECIMAL: u8 = 0b_1000_0000;
    /// Representation of a blank space on a 7-segment display.
    pub const SPACE: u8 = 0b_0000_0000;
}

/// Returns the segment pattern for `char`.
///
/// Lookup is case-insensitive. Characters outside the supported set (digits, the letters
/// `A`-`J`, `L`, `N`, `O`, `P`, `R`, `S`, `T`, `U`, `Y`, space and `.`) come back as
/// [`Leds::SPACE`].
#[must_use]
pub const fn encode(char: char) -> u8 {
    match char.to_ascii_uppercase() {
        '0' => 0b_0011_1111,
        '1' | 'I' => 0b_0000_0110,
        '2' => 0b_0101_1011,
        '3' => 0b_0100_1111,
        '4' => 0b_0110_0110,
        '5' | 'S' => 0b_0110_1101,
        '6' => 0b_0111_1101,
        '7' => 0b_0000_0111,
        '8' => 0b_0111_1111,
        '9' => 0b_0110_1111,
        'A' => 0b_0111_0111,
        'B' => 0b_0111_1100,
        'C' => 0b_0011_1001,
        'D' => 0b_0101_1110,
        'E' => 0b_0111_1001,
        'F' => 0b_0111_0001,
        'G' => 0b_0011_1101,
        'H' => 0b_0111_0110,
        'J' => 0b_0001_1110,
        'L' => 0b_0011_1000,
        'N' => 0b_0101_0100,
        // Lowercase-style 'o' so it can't be mistaken for zero.
        'O' => 0b_0101_1100,
        'P' => 0b_0111_0011,
        'R' => 0b_0101_0000,
        'T' => 0b_0111_1000,
        'U' => 0b_0011_1110,
        'Y' => 0b_0110_1110,
        '.' => Leds::DECIMAL,
        _ => Leds::SPACE,
    }
}

/// Converts text into one segment pattern per digit cell.
///
/// A `.` directly after any other character lights that character's decimal point and takes
/// no cell of its own. A leading `.`, or one following another `.`, gets a cell showing only
/// the decimal point. Text beyond [`TEXT_CAPACITY`] cells is dropped.
#[must_use]
pub fn to_cells(text: &[char]) -> Cells {
    let mut cells = Cells::new();
    let mut chars = text.iter().copied().peekable();
    while let Some(char) = chars.next() {
        let mut bits = encode(char);
        if char != '.' && chars.next_if_eq(&'.').is_some() {
            bits |= Leds::DECIMAL;
        }
        if cells.push(bits).is_err() {
            break;
        }
    }
    cells
}
