//! A queue-driven renderer for a 4-digit, 7-segment LED display.
//!
//! Collaborators hold a [`SegDisplay`] handle and enqueue text; one [`Processor`] drains the
//! queue, rendering each job to completion before the next and yielding after every digit
//! write so other tasks keep running.
//!
//! See [`SegDisplay`] for usage.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;

use crate::render_job::{JobQueue, QUEUE_CAPACITY, RenderJob};

#[cfg(feature = "display-trace")]
use defmt::info;

// ============================================================================
// Submodules
// ============================================================================

mod processor;
pub use processor::{MULTIPLEX_SLEEP, Processor};

#[cfg(feature = "pico1")]
mod pico;
#[cfg(feature = "pico1")]
pub use pico::{PicoBus, SegDisplayPins};

// ============================================================================
// Shared state
// ============================================================================

struct QueueState<const K: usize> {
    jobs: JobQueue<K>,
    active: bool,
}

/// Static for the [`SegDisplay`] device: the job queue, the "active" flag and the trigger
/// that wakes the processor.
pub struct SegDisplayStatic<const K: usize = QUEUE_CAPACITY> {
    state: Mutex<CriticalSectionRawMutex, RefCell<QueueState<K>>>,
    trigger: Signal<CriticalSectionRawMutex, ()>,
}

impl<const K: usize> SegDisplayStatic<K> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(QueueState {
                jobs: JobQueue::new(),
                active: false,
            })),
            trigger: Signal::new(),
        }
    }

    /// Appends `count` copies of `job` in one critical section and wakes the processor if idle.
    fn enqueue(&self, job: RenderJob, count: u8) {
        let idle = self.state.lock(|state| {
            let mut state = state.borrow_mut();
            for _ in 0..count {
                let evicted = state.jobs.push(job.clone());
                #[cfg(feature = "defmt")]
                if let Some(evicted) = evicted {
                    defmt::warn!("display queue full, dropped oldest job: {:?}", evicted);
                }
                #[cfg(not(feature = "defmt"))]
                let _ = evicted;
            }
            !state.active
        });
        if idle {
            self.trigger.signal(());
        }
    }

    /// Idle -> Rendering. Returns `false` if a processor loop is already active or there is
    /// nothing to render.
    fn begin(&self) -> bool {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            if state.active || state.jobs.is_empty() {
                false
            } else {
                state.active = true;
                true
            }
        })
    }

    /// Takes the next job, or goes back to Idle when there is none.
    ///
    /// Both happen under one lock so a concurrent enqueue either sees the flag cleared (and
    /// triggers) or its job gets picked up here.
    fn next_job(&self) -> Option<RenderJob> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let job = state.jobs.pop();
            if job.is_none() {
                state.active = false;
            }
            job
        })
    }

    /// Back to Idle without draining; used when a transport fault aborts rendering.
    fn abort(&self) {
        self.state.lock(|state| state.borrow_mut().active = false);
    }

    async fn wait(&self) {
        self.trigger.wait().await;
    }

    fn is_active(&self) -> bool {
        self.state.lock(|state| state.borrow().active)
    }

    fn pending(&self) -> usize {
        self.state.lock(|state| state.borrow().jobs.len())
    }
}

impl<const K: usize> Default for SegDisplayStatic<K> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SegDisplay handle
// ============================================================================

/// A handle for queueing text on a 4-digit, 7-segment LED display.
///
/// Handles are `Copy`; give one to every part of the firmware that wants to show something.
/// Requests render strictly in the order they were made. The queue holds `K` jobs; when it
/// is full the oldest pending job is dropped.
///
/// # Example
///
/// ```
/// use embassy_time::Duration;
/// use led_8seg::{SegDisplay, SegDisplayStatic};
///
/// static SEG_DISPLAY_STATIC: SegDisplayStatic = SegDisplay::new_static();
/// let display = SegDisplay::new(&SEG_DISPLAY_STATIC);
///
/// // Startup banner, scrolled in and out once.
/// display.scroll_text("HELLO", Duration::from_millis(300));
/// // Status, held for two seconds.
/// display.display_text("Con.", Duration::from_secs(2));
///
/// assert_eq!(display.pending(), 2);
/// assert!(display.is_busy());
/// ```
pub struct SegDisplay<'a, const K: usize = QUEUE_CAPACITY>(&'a SegDisplayStatic<K>);

impl<const K: usize> Clone for SegDisplay<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<const K: usize> Copy for SegDisplay<'_, K> {}

impl<'a, const K: usize> SegDisplay<'a, K> {
    /// Creates static resources for the display.
    #[must_use]
    pub const fn new_static() -> SegDisplayStatic<K> {
        SegDisplayStatic::new()
    }

    /// Creates a handle. Something must also run a [`Processor`] on the same static.
    #[must_use]
    pub const fn new(seg_display_static: &'a SegDisplayStatic<K>) -> Self {
        Self(seg_display_static)
    }

    /// Holds the first four characters of `text` for `duration`, then blanks the display.
    ///
    /// A `.` lights the decimal point of the character before it.
    pub fn display_text(&self, text: &str, duration: Duration) {
        #[cfg(feature = "display-trace")]
        info!("display_text: {=str} for {:?}", text, duration);
        self.0.enqueue(RenderJob::hold(text, duration), 1);
    }

    /// Scrolls `text` across the display `repeat` times, showing each window position for
    /// `duration_per_char`.
    ///
    /// With `padding`, the text scrolls in from the right and fully out to the left. A
    /// `repeat` of 0 counts as 1. The last window stays lit once the scroll ends.
    pub fn display_rolling_text(
        &self,
        text: &str,
        duration_per_char: Duration,
        repeat: u8,
        padding: bool,
    ) {
        #[cfg(feature = "display-trace")]
        info!(
            "display_rolling_text: {=str} x{} (padding: {})",
            text, repeat, padding
        );
        self.0.enqueue(
            RenderJob::scroll(text, duration_per_char, padding),
            repeat.max(1),
        );
    }

    /// Scrolls `text` once, padded.
    pub fn scroll_text(&self, text: &str, duration_per_char: Duration) {
        self.display_rolling_text(text, duration_per_char, 1, true);
    }

    /// `true` while a job is rendering or waiting.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.is_active() || self.0.pending() > 0
    }

    /// Number of jobs waiting behind the one being rendered.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.0.pending()
    }
}
