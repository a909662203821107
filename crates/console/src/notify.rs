//! Transient status messages.
//!
//! Single-slot: at most one notice exists at a time, and posting a new one
//! replaces whatever was there. The event loop renders and clears the slot
//! after every handled event; a notice that sat unrendered past its
//! time-to-live is dropped instead of shown stale.

use std::time::{Duration, Instant};

/// How long an unrendered notice stays valid.
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    /// Prefix used when rendering.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Error => "error",
            Self::Info => "note",
        }
    }
}

/// A single transient message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    posted_at: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, text: String) -> Self {
        Self {
            kind,
            text,
            posted_at: Instant::now(),
        }
    }

    /// Render as a one-line status message.
    #[must_use]
    pub fn render(&self) -> String {
        format!("[{}] {}", self.kind.prefix(), self.text)
    }

    fn expired(&self) -> bool {
        self.posted_at.elapsed() >= NOTICE_TTL
    }
}

/// Holder of the single visible notice.
#[derive(Debug, Default)]
pub struct NoticeSlot {
    current: Option<Notice>,
}

impl NoticeSlot {
    pub fn success(&mut self, text: impl Into<String>) {
        self.post(NoticeKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.post(NoticeKind::Error, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.post(NoticeKind::Info, text);
    }

    /// Replace the current notice.
    pub fn post(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.current = Some(Notice::new(kind, text.into()));
    }

    /// Take the pending notice for rendering, discarding it if it expired
    /// before anyone looked at it.
    pub fn take(&mut self) -> Option<Notice> {
        self.current.take().filter(|notice| !notice.expired())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posting_replaces_the_previous_notice() {
        let mut slot = NoticeSlot::default();
        slot.info("first");
        slot.error("second");

        let notice = slot.take().expect("notice present");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "second");
        assert!(slot.is_empty());
    }

    #[test]
    fn take_clears_the_slot() {
        let mut slot = NoticeSlot::default();
        slot.success("done");
        assert!(slot.take().is_some());
        assert!(slot.take().is_none());
    }

    #[test]
    fn expired_notices_are_dropped_unrendered() {
        let mut slot = NoticeSlot::default();
        slot.info("old news");
        if let Some(notice) = slot.current.as_mut() {
            notice.posted_at = Instant::now() - NOTICE_TTL;
        }
        assert!(slot.take().is_none());
    }

    #[test]
    fn rendering_is_prefixed_by_kind() {
        let mut slot = NoticeSlot::default();
        slot.success("order #9 placed");
        let rendered = slot.take().expect("notice present").render();
        assert_eq!(rendered, "[ok] order #9 placed");
    }
}
