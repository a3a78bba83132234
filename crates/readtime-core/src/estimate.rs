//! Reading time estimation.
//!
//! Formula: `total_seconds = ceil(words / words_per_minute * 60)`
//!
//! The estimate always rounds up to the next whole second, so a reader is
//! never told less time than the text takes. The division is done in integer
//! arithmetic to keep `ceil` exact.

use serde::{Deserialize, Serialize};

use crate::markup;

/// Reading speed used when none (or a non-positive one) is configured.
pub const DEFAULT_READING_SPEED: u32 = 200;

/// Estimated reading time of a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    /// Number of words counted after markup stripping.
    pub words: usize,
    /// Whole reading time in seconds, rounded up.
    pub total_seconds: u64,
    /// Whole minutes (`total_seconds / 60`).
    pub minutes: u64,
    /// Remaining seconds (`total_seconds % 60`).
    pub seconds: u64,
}

impl Duration {
    /// Build a duration from a word count and a reading speed.
    ///
    /// A zero speed is replaced by [`DEFAULT_READING_SPEED`].
    pub fn from_words(words: usize, words_per_minute: u32) -> Self {
        let wpm = if words_per_minute == 0 {
            DEFAULT_READING_SPEED
        } else {
            words_per_minute
        };
        let total_seconds = (words as u64 * 60).div_ceil(u64::from(wpm));
        Self {
            words,
            total_seconds,
            minutes: total_seconds / 60,
            seconds: total_seconds % 60,
        }
    }

    /// Returns `true` if there is nothing to read.
    pub const fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }
}

/// Estimate the reading time of `text` at `words_per_minute`.
///
/// Markup is stripped before counting, then words are counted by whitespace
/// splitting. Empty text yields a zero duration.
///
/// # Arguments
///
/// * `text`: Raw article text; may contain HTML.
/// * `words_per_minute`: Reading speed. Callers substitute the default for
///   invalid configured values; `0` is also mapped to the default here.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn compute_duration(text: &str, words_per_minute: u32) -> Duration {
    let prose = markup::strip_all_tags(text);
    let words = markup::count_words(&prose);
    let duration = Duration::from_words(words, words_per_minute);
    tracing::debug!(
        words,
        total_seconds = duration.total_seconds,
        "estimated reading time"
    );
    duration
}
