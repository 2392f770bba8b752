//! Transient user-visible notifications

use std::time::Duration;

use tokio::time::Instant;

/// How long a notice stays visible before auto-dismissing
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient notification
#[derive(Debug, Clone)]
pub struct Notice {
    /// Human-readable message
    pub message: String,
    /// Severity for presentation
    pub kind: NoticeKind,
    posted_at: Instant,
}

impl Notice {
    fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            message: message.into(),
            kind,
            posted_at: Instant::now(),
        }
    }

    /// Whether this notice has passed its display window
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.posted_at.elapsed() >= NOTICE_TTL
    }
}

/// Single-slot notification channel
///
/// A newly posted notice replaces the current one; an unreplaced notice
/// expires [`NOTICE_TTL`] after posting.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    /// Post a notice, replacing any currently visible one
    pub fn post(&mut self, message: impl Into<String>, kind: NoticeKind) {
        self.current = Some(Notice::new(message, kind));
    }

    /// The visible notice, if one has not yet expired
    #[must_use]
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref().filter(|notice| !notice.is_expired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_after_ttl() {
        let mut board = NoticeBoard::default();
        board.post("Note saved", NoticeKind::Success);
        assert!(board.current().is_some());

        tokio::time::advance(NOTICE_TTL).await;
        assert!(board.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_notice_replaces_current() {
        let mut board = NoticeBoard::default();
        board.post("first", NoticeKind::Success);

        tokio::time::advance(Duration::from_secs(2)).await;
        board.post("second", NoticeKind::Error);

        // The replacement restarts the display window.
        tokio::time::advance(Duration::from_secs(2)).await;
        let notice = board.current().unwrap();
        assert_eq!(notice.message, "second");
        assert_eq!(notice.kind, NoticeKind::Error);
    }
}
