//! Incremental answer reveal
//!
//! A [`Reveal`] turns a completed answer into a lazy, finite stream of
//! [`RevealFrame`]s, each holding a longer prefix of the answer, spaced by a
//! fixed delay. The stream is consumed by value so it cannot be restarted,
//! and it stops early once its cancellation token fires (the answer screen
//! cancels it when the user navigates away).
//!
//! When no answer is available the stream yields [`FALLBACK_MESSAGE`] once.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::config::RevealConfig;

/// Shown instead of an answer when none is available
pub const FALLBACK_MESSAGE: &str = "No response available. Please try asking your question again.";

/// One step of a reveal: the first `end` bytes of the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    text: Arc<str>,
    end: usize,
}

impl RevealFrame {
    /// The revealed prefix
    pub fn prefix(&self) -> &str {
        &self.text[..self.end]
    }

    /// Text revealed since a previous frame ended at byte `previous_end`
    pub fn delta_since(&self, previous_end: usize) -> &str {
        &self.text[previous_end.min(self.end)..self.end]
    }

    /// Byte offset where this prefix ends
    pub fn end(&self) -> usize {
        self.end
    }

    /// Whether the whole text is revealed
    pub fn is_complete(&self) -> bool {
        self.end == self.text.len()
    }
}

/// A pending reveal of one answer
///
/// Not `Clone`: each reveal plays at most once.
///
/// ```compile_fail
/// use quicknote::config::RevealConfig;
/// use quicknote::reveal::Reveal;
/// use tokio_util::sync::CancellationToken;
///
/// let reveal = Reveal::new(Some("abc"), &RevealConfig::default(), CancellationToken::new());
/// let again = reveal.clone();
/// ```
#[derive(Debug)]
pub struct Reveal {
    text: Arc<str>,
    fallback: bool,
    step_delay: Duration,
    chars_per_step: usize,
    cancel: CancellationToken,
}

impl Reveal {
    /// Prepare a reveal for `answer`
    ///
    /// An absent or empty answer reveals [`FALLBACK_MESSAGE`] instead. With
    /// reveal disabled (or a zero delay) the text arrives as one frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use quicknote::config::RevealConfig;
    /// use quicknote::reveal::{Reveal, FALLBACK_MESSAGE};
    /// use tokio_util::sync::CancellationToken;
    ///
    /// let reveal = Reveal::new(None, &RevealConfig::default(), CancellationToken::new());
    /// assert!(reveal.is_fallback());
    /// assert_eq!(reveal.text(), FALLBACK_MESSAGE);
    /// ```
    pub fn new(answer: Option<&str>, config: &RevealConfig, cancel: CancellationToken) -> Self {
        let (text, fallback) = match answer {
            Some(a) if !a.is_empty() => (Arc::from(a), false),
            _ => (Arc::from(FALLBACK_MESSAGE), true),
        };
        let step_delay = if config.enabled {
            config.step_delay()
        } else {
            Duration::ZERO
        };
        Self {
            text,
            fallback,
            step_delay,
            chars_per_step: config.chars_per_step.max(1),
            cancel,
        }
    }

    /// Whether the fallback message is shown instead of an answer
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Full text that will be revealed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text arrives in a single frame
    fn is_instant(&self) -> bool {
        self.fallback || self.step_delay.is_zero()
    }

    /// Byte offset after advancing `chars_per_step` characters from `from`
    fn next_end(&self, from: usize) -> usize {
        self.text[from..]
            .char_indices()
            .nth(self.chars_per_step)
            .map(|(i, _)| from + i)
            .unwrap_or(self.text.len())
    }

    /// Consume the reveal as a stream of frames
    ///
    /// The first frame arrives immediately; each later frame waits one step
    /// delay. Cancelling the token ends the stream before the next frame.
    pub fn into_stream(self) -> BoxStream<'static, RevealFrame> {
        if self.is_instant() {
            if self.cancel.is_cancelled() {
                return stream::empty().boxed();
            }
            let frame = RevealFrame {
                end: self.text.len(),
                text: self.text,
            };
            return stream::once(async move { frame }).boxed();
        }

        stream::unfold((self, 0usize), |(reveal, end)| async move {
            if end == reveal.text.len() || reveal.cancel.is_cancelled() {
                return None;
            }
            if end > 0 {
                tokio::select! {
                    _ = reveal.cancel.cancelled() => return None,
                    _ = tokio::time::sleep(reveal.step_delay) => {}
                }
            }
            let next = reveal.next_end(end);
            let frame = RevealFrame {
                text: Arc::clone(&reveal.text),
                end: next,
            };
            Some((frame, (reveal, next)))
        })
        .boxed()
    }
}
