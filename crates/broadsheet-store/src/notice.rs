#![forbid(unsafe_code)]

//! User-visible notices.
//!
//! Notices are non-blocking, dismissible messages surfaced by data-layer
//! handlers — a failed like rolls back silently and pushes one `is-error`
//! notice here. The queue provides:
//!
//! - content-based deduplication within a configurable time window
//! - explicit dismissal by id
//! - counters for pushed / deduplicated / dismissed notices
//!
//! Nothing here blocks or escalates; an error notice is advisory only.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use web_time::{Duration, Instant};

/// Severity of a notice, rendered as a status class by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoticeStatus {
    /// Confirmation of a completed action.
    Success,
    /// Neutral information (default).
    #[default]
    Info,
    /// Something worth attention but not failed.
    Warning,
    /// A recoverable failure.
    Error,
}

impl NoticeStatus {
    /// Status class string, e.g. `is-error`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "is-success",
            Self::Info => "is-info",
            Self::Warning => "is-warning",
            Self::Error => "is-error",
        }
    }
}

impl fmt::Display for NoticeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a queued notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(u64);

/// A single user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Queue-assigned identifier.
    pub id: NoticeId,
    /// Severity tag.
    pub status: NoticeStatus,
    /// Human-readable message.
    pub text: String,
    /// Whether the user may dismiss this notice.
    pub dismissible: bool,
}

/// Configuration for the notice queue.
#[derive(Debug, Clone)]
pub struct NoticeQueueConfig {
    /// Time window for content deduplication.
    pub dedup_window: Duration,
    /// Maximum number of notices kept; the oldest is dropped past this.
    pub max_visible: usize,
}

impl Default for NoticeQueueConfig {
    fn default() -> Self {
        Self {
            dedup_window: Duration::from_secs(1),
            max_visible: 3,
        }
    }
}

impl NoticeQueueConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deduplication window.
    #[must_use]
    pub fn dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Set the maximum number of visible notices.
    #[must_use]
    pub fn max_visible(mut self, max: usize) -> Self {
        self.max_visible = max;
        self
    }
}

/// Queue counters for monitoring and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoticeStats {
    /// Notices accepted into the queue.
    pub total_pushed: u64,
    /// Notices rejected as duplicates within the dedup window.
    pub dedup_count: u64,
    /// Notices explicitly dismissed.
    pub dismissed: u64,
    /// Notices evicted to respect `max_visible`.
    pub evicted: u64,
}

/// Queue of user-visible notices with deduplication.
#[derive(Debug)]
pub struct NoticeQueue {
    config: NoticeQueueConfig,
    visible: Vec<Notice>,
    /// Content hash -> last time a notice with that content was accepted.
    recent: HashMap<u64, Instant>,
    next_id: u64,
    stats: NoticeStats,
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new(NoticeQueueConfig::default())
    }
}

impl NoticeQueue {
    /// Create a queue with the given configuration.
    #[must_use]
    pub fn new(config: NoticeQueueConfig) -> Self {
        Self {
            config,
            visible: Vec::new(),
            recent: HashMap::new(),
            next_id: 0,
            stats: NoticeStats::default(),
        }
    }

    /// Push a dismissible notice. Returns the assigned id, or `None` when an
    /// identical notice was accepted within the dedup window.
    pub fn push(&mut self, status: NoticeStatus, text: impl Into<String>) -> Option<NoticeId> {
        let text = text.into();
        let hash = Self::content_hash(status, &text);
        let now = Instant::now();

        // Drop expired entries so the dedup map stays bounded by the window.
        let window = self.config.dedup_window;
        self.recent
            .retain(|_, t| now.duration_since(*t) < window);

        if let Some(last) = self.recent.get(&hash)
            && now.duration_since(*last) < window
        {
            self.stats.dedup_count += 1;
            return None;
        }
        self.recent.insert(hash, now);

        self.next_id += 1;
        let id = NoticeId(self.next_id);
        self.visible.push(Notice {
            id,
            status,
            text,
            dismissible: true,
        });
        self.stats.total_pushed += 1;

        while self.visible.len() > self.config.max_visible {
            self.visible.remove(0);
            self.stats.evicted += 1;
        }
        Some(id)
    }

    /// Dismiss a notice by id. Returns `true` if it was present.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let before = self.visible.len();
        self.visible.retain(|n| n.id != id);
        let removed = self.visible.len() != before;
        if removed {
            self.stats.dismissed += 1;
        }
        removed
    }

    /// Currently visible notices, oldest first.
    #[must_use]
    pub fn visible(&self) -> &[Notice] {
        &self.visible
    }

    /// Queue counters.
    #[must_use]
    pub fn stats(&self) -> NoticeStats {
        self.stats
    }

    fn content_hash(status: NoticeStatus, text: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        status.hash(&mut hasher);
        text.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings() {
        assert_eq!(NoticeStatus::Error.to_string(), "is-error");
        assert_eq!(NoticeStatus::Success.to_string(), "is-success");
        assert_eq!(NoticeStatus::Info.to_string(), "is-info");
        assert_eq!(NoticeStatus::Warning.to_string(), "is-warning");
    }

    #[test]
    fn push_and_dismiss() {
        let mut queue = NoticeQueue::default();
        let id = queue
            .push(NoticeStatus::Error, "Could not unlike this comment")
            .unwrap();
        assert_eq!(queue.visible().len(), 1);
        assert_eq!(queue.visible()[0].status, NoticeStatus::Error);
        assert!(queue.visible()[0].dismissible);

        assert!(queue.dismiss(id));
        assert!(queue.visible().is_empty());
        assert!(!queue.dismiss(id));
        assert_eq!(queue.stats().dismissed, 1);
    }

    #[test]
    fn identical_content_deduplicated_within_window() {
        let mut queue = NoticeQueue::default();
        assert!(queue.push(NoticeStatus::Error, "boom").is_some());
        assert!(queue.push(NoticeStatus::Error, "boom").is_none());
        assert_eq!(queue.visible().len(), 1);
        assert_eq!(queue.stats().dedup_count, 1);
    }

    #[test]
    fn different_status_is_not_a_duplicate() {
        let mut queue = NoticeQueue::default();
        assert!(queue.push(NoticeStatus::Error, "saved").is_some());
        assert!(queue.push(NoticeStatus::Success, "saved").is_some());
        assert_eq!(queue.visible().len(), 2);
    }

    #[test]
    fn dedup_window_expires() {
        let mut queue = NoticeQueue::new(NoticeQueueConfig::new().dedup_window(Duration::ZERO));
        assert!(queue.push(NoticeStatus::Info, "tick").is_some());
        assert!(queue.push(NoticeStatus::Info, "tick").is_some());
    }

    #[test]
    fn expired_dedup_entries_are_pruned() {
        let mut queue = NoticeQueue::new(
            NoticeQueueConfig::new()
                .dedup_window(Duration::ZERO)
                .max_visible(100),
        );
        for i in 0..50 {
            assert!(queue.push(NoticeStatus::Info, format!("notice {i}")).is_some());
        }
        // With an elapsed window every prior hash is expired; only the entry
        // from the latest push may remain.
        assert!(queue.recent.len() <= 1);
    }

    #[test]
    fn live_dedup_entries_survive_pruning() {
        let mut queue = NoticeQueue::default();
        assert!(queue.push(NoticeStatus::Info, "one").is_some());
        assert!(queue.push(NoticeStatus::Info, "two").is_some());
        assert_eq!(queue.recent.len(), 2);
        // Still within the window: the duplicate is rejected, not re-admitted
        // by pruning.
        assert!(queue.push(NoticeStatus::Info, "one").is_none());
    }

    #[test]
    fn oldest_evicted_past_max_visible() {
        let mut queue = NoticeQueue::new(NoticeQueueConfig::new().max_visible(2));
        queue.push(NoticeStatus::Info, "one");
        queue.push(NoticeStatus::Info, "two");
        queue.push(NoticeStatus::Info, "three");
        let texts: Vec<_> = queue.visible().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert_eq!(queue.stats().evicted, 1);
    }
}
