//! Queued display requests and the bounded FIFO that holds them.

use embassy_time::Duration;
use heapless::{Deque, Vec};

use crate::digit_bus::CELL_COUNT;

/// Maximum characters kept per job, padding included.
pub const TEXT_CAPACITY: usize = 48;

/// Number of jobs the queue holds before it starts dropping the oldest.
pub const QUEUE_CAPACITY: usize = 10;

/// Characters of one job.
pub type Text = Vec<char, TEXT_CAPACITY>;

/// One queued display request: a static hold or a scrolling marquee.
///
/// For a hold, `duration` is the total time on screen. For a scroll it is the time each
/// window position is shown.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    text: Text,
    duration: Duration,
    scrolling: bool,
    padded: bool,
}

impl RenderJob {
    /// A job that holds the first four cells of `text` for `duration`, then blanks the display.
    #[must_use]
    pub fn hold(text: &str, duration: Duration) -> Self {
        Self {
            text: text_from(text, false),
            duration,
            scrolling: false,
            padded: false,
        }
    }

    /// A job that slides a four-digit window across `text`, one step per `duration_per_step`.
    ///
    /// With `padded`, four blanks go on each side so the text scrolls fully in and out.
    #[must_use]
    pub fn scroll(text: &str, duration_per_step: Duration, padded: bool) -> Self {
        Self {
            text: text_from(text, padded),
            duration: duration_per_step,
            scrolling: true,
            padded,
        }
    }

    #[must_use]
    pub fn text(&self) -> &[char] {
        &self.text
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    #[must_use]
    pub const fn is_padded(&self) -> bool {
        self.padded
    }
}

/// Copies `text` into a [`Text`], truncating to fit. Padding always survives truncation.
#[expect(
    clippy::arithmetic_side_effects,
    reason = "Padding is far smaller than TEXT_CAPACITY"
)]
fn text_from(text: &str, padded: bool) -> Text {
    let padding = if padded { CELL_COUNT } else { 0 };
    let room = TEXT_CAPACITY - 2 * padding;
    let mut result = Text::new();
    let blanks = core::iter::repeat_n(' ', padding);
    let body = text.chars().take(room);
    for char in blanks.clone().chain(body).chain(blanks) {
        if result.push(char).is_err() {
            break;
        }
    }
    #[cfg(feature = "defmt")]
    if text.chars().count() > room {
        defmt::warn!("display text truncated to {} characters", room);
    }
    result
}

/// Bounded FIFO of pending [`RenderJob`]s.
///
/// When full, [`JobQueue::push`] drops the oldest job to make room for the new one.
pub struct JobQueue<const K: usize = QUEUE_CAPACITY>(Deque<RenderJob, K>);

impl<const K: usize> JobQueue<K> {
    #[must_use]
    pub const fn new() -> Self {
        Self(Deque::new())
    }

    /// Appends `job`, returning the job that was evicted to make room, if any.
    pub fn push(&mut self, job: RenderJob) -> Option<RenderJob> {
        let evicted = if self.0.is_full() {
            self.0.pop_front()
        } else {
            None
        };
        // Only a zero-capacity queue can still refuse; then the new job is the one dropped.
        match self.0.push_back(job) {
            Ok(()) => evicted,
            Err(job) => Some(job),
        }
    }

    /// Removes the oldest job.
    pub fn pop(&mut self) -> Option<RenderJob> {
        self.0.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        K
    }
}

impl<const K: usize> Default for JobQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
