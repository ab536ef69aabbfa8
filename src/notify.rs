//! Transient on-screen notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const MSG_INVALID_INPUT: &str = "Please type values correctly.";
pub const MSG_ADDED: &str = "Successfully added!";
pub const MSG_UPDATED: &str = "Successfully updated!";
pub const MSG_DELETED: &str = "Successfully deleted!";

/// How long a notification stays visible.
const DEFAULT_TTL: Duration = Duration::from_secs(4);

/// Oldest notifications are dropped past this many.
const MAX_QUEUED: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub raised_at: Instant,
}

/// Queue of recent notifications, newest last.
#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Notification>,
    ttl: Duration,
}

impl Toasts {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        if self.items.len() == MAX_QUEUED {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            severity,
            message: message.into(),
            raised_at: Instant::now(),
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    /// Drop notifications older than the TTL.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|n| now.saturating_duration_since(n.raised_at) < ttl);
    }

    /// Newest notification still alive at `now`.
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        self.items
            .iter()
            .rev()
            .find(|n| now.saturating_duration_since(n.raised_at) < self.ttl)
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}
