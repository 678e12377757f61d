//! Failure classification and the backoff schedule used by `call_structured`.

use std::time::Duration;

use crate::llm_client::ChatError;

/// Whether a failed model call is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Transient,
    Fatal,
}

/// The only place model errors are classified.
///
/// Status codes and transport kinds are checked first. The message substrings
/// are a provider-specific approximation and may misclassify other
/// providers' error text.
pub fn classify_failure(err: &ChatError) -> FailureClass {
    let transient = match err {
        ChatError::EmptyContent | ChatError::Timeout => true,
        ChatError::Api { status, message } => {
            matches!(status, 429 | 502 | 503 | 504) || is_transient_message(message)
        }
        ChatError::Http(e) => e.is_timeout() || e.is_connect() || is_transient_message(&e.to_string()),
        ChatError::Malformed(message) => is_transient_message(message),
    };

    if transient {
        FailureClass::Transient
    } else {
        FailureClass::Fatal
    }
}

const TRANSIENT_MARKERS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "ratelimit",
    "too many requests",
    "timeout",
    "timed out",
    "temporarily",
    "fetch failed",
    "connection reset",
    "econnreset",
];

fn is_transient_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lower.contains(m))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(8000),
        }
    }
}

/// Explicit `{attempt, delay}` state advanced once per failed attempt.
#[derive(Debug, Clone)]
pub struct Backoff {
    attempt: u32,
    max_attempts: u32,
    delay: Duration,
    max_delay: Duration,
}

impl Backoff {
    pub fn new(policy: &RetryPolicy, max_attempts: u32) -> Self {
        Self {
            attempt: 1,
            max_attempts: max_attempts.max(1),
            delay: policy.initial_delay.min(policy.max_delay),
            max_delay: policy.max_delay,
        }
    }

    /// The 1-based number of the attempt currently in flight.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Moves to the next attempt and returns how long to wait first, or
    /// `None` once the attempt budget is spent.
    pub fn advance(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        let wait = self.delay;
        self.attempt += 1;
        self.delay = (self.delay * 2).min(self.max_delay);
        Some(wait)
    }
}
