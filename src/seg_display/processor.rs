use core::convert::Infallible;

use embassy_time::{Duration, Instant, Timer};

use super::SegDisplayStatic;
use crate::Result;
use crate::digit_bus::{CELL_COUNT, DigitBus, DigitPosition};
use crate::render_job::{QUEUE_CAPACITY, RenderJob};
use crate::segment_code::{Leds, to_cells};

#[cfg(feature = "display-trace")]
use defmt::info;

/// Pause after every digit write. Multiplexes the digits into a steady image and lets other
/// tasks run.
pub const MULTIPLEX_SLEEP: Duration = Duration::from_millis(5);

/// The one loop that owns the bus and renders queued jobs.
///
/// Only one processor can be rendering from a given [`SegDisplayStatic`] at a time; a second
/// one finds the display busy and returns at once.
pub struct Processor<'a, B, const K: usize = QUEUE_CAPACITY> {
    seg_display_static: &'a SegDisplayStatic<K>,
    bus: B,
}

impl<'a, B: DigitBus, const K: usize> Processor<'a, B, K> {
    #[must_use]
    pub const fn new(seg_display_static: &'a SegDisplayStatic<K>, bus: B) -> Self {
        Self {
            seg_display_static,
            bus,
        }
    }

    /// Waits for work and drains the queue, forever.
    ///
    /// # Errors
    ///
    /// Returns the first transport fault.
    pub async fn run(&mut self) -> Result<Infallible> {
        loop {
            self.seg_display_static.wait().await;
            self.process_queue().await?;
        }
    }

    /// Renders queued jobs in order until the queue is empty.
    ///
    /// Returns `Ok(false)` without touching the bus when the queue is empty or another loop is
    /// already rendering; jobs enqueued meanwhile are picked up by that loop.
    ///
    /// # Errors
    ///
    /// Returns a transport fault. The display goes back to idle, keeping the remaining jobs.
    pub async fn process_queue(&mut self) -> Result<bool> {
        if !self.seg_display_static.begin() {
            return Ok(false);
        }
        while let Some(job) = self.seg_display_static.next_job() {
            #[cfg(feature = "display-trace")]
            info!("rendering: {:?}", job);
            if let Err(err) = self.render(&job).await {
                #[cfg(feature = "defmt")]
                defmt::error!("display bus fault: {}", err);
                self.seg_display_static.abort();
                return Err(err);
            }
        }
        Ok(true)
    }

    async fn render(&mut self, job: &RenderJob) -> Result<()> {
        let cells = to_cells(job.text());
        if job.is_scrolling() {
            if cells.is_empty() {
                return Ok(());
            }
            return self.scroll(&cells, job.duration()).await;
        }
        // Static jobs always end blank, even with nothing to hold.
        if !cells.is_empty() {
            let window = cells.get(..CELL_COUNT).unwrap_or(cells.as_slice());
            self.show_for(window, job.duration()).await?;
        }
        self.blank()
    }

    /// Shows every four-cell window of `cells` once, left to right.
    ///
    /// Fewer than four cells still get one (blank-filled) window.
    async fn scroll(&mut self, cells: &[u8], step: Duration) -> Result<()> {
        if cells.len() < CELL_COUNT {
            let mut window = [Leds::SPACE; CELL_COUNT];
            for (slot, &bits) in window.iter_mut().zip(cells) {
                *slot = bits;
            }
            return self.show_for(&window, step).await;
        }
        for window in cells.windows(CELL_COUNT) {
            self.show_for(window, step).await?;
        }
        Ok(())
    }

    /// Multiplexes `window` onto the digits until `duration` has passed.
    async fn show_for(&mut self, window: &[u8], duration: Duration) -> Result<()> {
        let end = Instant::now()
            .checked_add(duration)
            .unwrap_or(Instant::MAX);
        while Instant::now() < end {
            for (&position, &bits) in DigitPosition::ALL.iter().zip(window) {
                self.write(position, bits)?;
                Timer::after(MULTIPLEX_SLEEP).await;
            }
        }
        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        for position in DigitPosition::ALL {
            self.write(position, Leds::SPACE)?;
        }
        Ok(())
    }

    /// One bus write. On failure, tries once to blank that digit, then reports the original
    /// fault. The failed pattern is never resent.
    fn write(&mut self, position: DigitPosition, bits: u8) -> Result<()> {
        let result = self.bus.write(position, bits);
        if result.is_err() && bits != Leds::SPACE {
            let blanked = self.bus.write(position, Leds::SPACE);
            #[cfg(feature = "defmt")]
            if let Err(blank_err) = blanked {
                defmt::warn!("blanking {:?} after a fault failed: {}", position, blank_err);
            }
            #[cfg(not(feature = "defmt"))]
            let _ = blanked;
        }
        result
    }
}
