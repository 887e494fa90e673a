//! Transient on-screen message slot

use std::time::{Duration, Instant};

/// How long a feedback message stays on screen
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(1500);

/// Message currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Holds at most one message. A newer `show` replaces the current one and
/// restarts the countdown instead of queueing.
#[derive(Debug, Clone)]
pub struct FeedbackTimer {
    current: Option<FeedbackMessage>,
    duration: Duration,
}

impl FeedbackTimer {
    pub fn new() -> Self {
        Self::with_duration(FEEDBACK_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            current: None,
            duration,
        }
    }

    pub fn show(&mut self, text: impl Into<String>, now: Instant) -> &FeedbackMessage {
        self.current.insert(FeedbackMessage {
            text: text.into(),
            expires_at: now + self.duration,
        })
    }

    /// Clear the message if its time is up. Returns true when something was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(message) if now >= message.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// The live message, if it has not expired yet
    pub fn current(&self, now: Instant) -> Option<&FeedbackMessage> {
        self.current.as_ref().filter(|m| now < m.expires_at)
    }

    /// When the pending message will expire
    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|m| m.expires_at)
    }
}

impl Default for FeedbackTimer {
    fn default() -> Self {
        Self::new()
    }
}
