//! Transient user-facing notices.
//!
//! The UI renders these as toast notifications. The core only decides
//! what to say and at which level; presentation is the caller's.

use tokio::sync::mpsc;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational, e.g. "item already in cart".
    Info,
    /// A mutation succeeded.
    Success,
    /// A mutation failed.
    Error,
}

/// A transient message for the shopper.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Human-readable message.
    pub message: String,
}

/// Create a connected sink/stream pair.
pub fn channel() -> (NoticeSink, NoticeStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NoticeSink { tx }, NoticeStream { rx })
}

/// Producer half; clone freely into components.
#[derive(Debug, Clone)]
pub struct NoticeSink {
    tx: mpsc::UnboundedSender<Notice>,
}

impl NoticeSink {
    /// Push an informational notice.
    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    /// Push a success notice.
    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    /// Push an error notice.
    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        // A detached UI just means nobody is listening anymore.
        let _ = self.tx.send(Notice {
            level,
            message: message.into(),
        });
    }
}

/// Consumer half; the UI drains it.
#[derive(Debug)]
pub struct NoticeStream {
    rx: mpsc::UnboundedReceiver<Notice>,
}

impl NoticeStream {
    /// Wait for the next notice. `None` once every sink is dropped.
    pub async fn next(&mut self) -> Option<Notice> {
        self.rx.recv().await
    }

    /// Take a notice if one is already queued.
    pub fn try_next(&mut self) -> Option<Notice> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notice_levels() {
        let (sink, mut stream) = channel();
        sink.success("Item added to cart successfully");
        sink.info("Item already exists in cart");
        sink.error("Failed to add item to cart");

        assert_eq!(stream.next().await.unwrap().level, NoticeLevel::Success);
        assert_eq!(stream.next().await.unwrap().level, NoticeLevel::Info);
        assert_eq!(stream.next().await.unwrap().level, NoticeLevel::Error);
        assert!(stream.try_next().is_none());
    }

    #[test]
    fn test_push_after_stream_dropped_is_silent() {
        let (sink, stream) = channel();
        drop(stream);
        sink.info("nobody home");
    }
}
