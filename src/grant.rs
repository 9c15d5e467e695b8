//! In-memory session grant.
//!
//! A successful login (scanned or typed) grants a timed session. The grant
//! is purely ephemeral: nothing is persisted, and a process restart drops
//! all sessions.

use std::time::{Duration, Instant};

/// Default session length: 8 hours.
const DEFAULT_SESSION_SECS: u64 = 8 * 3600;

/// A granted kiosk session for one card.
#[derive(Clone, Debug)]
pub struct SessionGrant {
    card: String,
    duration: Duration,
    started: Instant,
}

impl SessionGrant {
    /// Grants a session of the default duration.
    pub fn new(card: String) -> Self {
        Self::with_duration(card, Duration::from_secs(DEFAULT_SESSION_SECS))
    }

    pub fn with_duration(card: String, duration: Duration) -> Self {
        Self {
            card,
            duration,
            started: Instant::now(),
        }
    }

    pub fn card(&self) -> &str {
        &self.card
    }

    /// Time left on the session, saturating at zero once expired.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.started.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() == Duration::ZERO
    }

    /// Remaining time as `HH:MM:SS` for the kiosk countdown display.
    pub fn format_remaining(&self) -> String {
        format_hms(self.remaining().as_secs())
    }
}

fn format_hms(total: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
