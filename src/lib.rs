//! Queue-driven text rendering for a 4-digit, 7-segment LED display on a shift-register bus.
#![cfg_attr(not(test), no_std)]
#![allow(clippy::future_not_send, reason = "Single-threaded")]

mod digit_bus;
mod error;
mod render_job;
pub mod seg_display;
mod segment_code;

// Re-export commonly used items
pub use digit_bus::{CELL_COUNT, DigitBus, DigitPosition, LATCH_HOLD_MS, ShiftRegisterBus};
pub use error::{Error, Result};
pub use render_job::{JobQueue, QUEUE_CAPACITY, RenderJob, TEXT_CAPACITY, Text};
pub use seg_display::{MULTIPLEX_SLEEP, Processor, SegDisplay, SegDisplayStatic};
#[cfg(feature = "pico1")]
pub use seg_display::{PicoBus, SegDisplayPins};
pub use segment_code::{Cells, Leds, encode, to_cells};
