use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::gallery::{Notice, NoticeLevel, Notifier};

const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone)]
struct Toast {
    notice: Notice,
    shown_at: Instant,
}

/// Notifier that keeps the latest notices on screen for a fixed time.
#[derive(Debug, Clone)]
pub struct Toasts {
    ttl: Duration,
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            queue: VecDeque::new(),
        }
    }

    pub fn push_at(&mut self, notice: Notice, now: Instant) {
        match notice.level {
            NoticeLevel::Error | NoticeLevel::Warning => {
                tracing::warn!(level = notice.level.label(), message = %notice.message, "notice")
            }
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(level = notice.level.label(), message = %notice.message, "notice")
            }
        }
        self.queue.push_back(Toast {
            notice,
            shown_at: now,
        });
        while self.queue.len() > MAX_VISIBLE {
            self.queue.pop_front();
        }
    }

    /// Drops expired toasts; true when something disappeared.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.queue.len();
        let ttl = self.ttl;
        self.queue
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
        self.queue.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter().map(|toast| &toast.notice)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Notifier for Toasts {
    fn notify(&mut self, notice: Notice) {
        self.push_at(notice, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::gallery::{Notice, Notifier};

    use super::{MAX_VISIBLE, Toasts};

    #[test]
    fn toasts_expire_after_ttl() {
        let start = Instant::now();
        let mut toasts = Toasts::new(Duration::from_millis(100));
        toasts.push_at(Notice::found(5), start);
        toasts.push_at(Notice::end_of_results(), start + Duration::from_millis(60));

        assert!(!toasts.expire(start + Duration::from_millis(99)));
        assert!(toasts.expire(start + Duration::from_millis(100)));
        assert_eq!(toasts.iter().collect::<Vec<_>>(), vec![&Notice::end_of_results()]);
        assert!(toasts.expire(start + Duration::from_millis(200)));
        assert!(toasts.is_empty());
    }

    #[test]
    fn toasts_keep_only_latest_entries() {
        let mut toasts = Toasts::new(Duration::from_secs(5));
        for total in 0..(MAX_VISIBLE + 2) {
            toasts.notify(Notice::found(total));
        }
        assert_eq!(toasts.len(), MAX_VISIBLE);
        assert_eq!(toasts.iter().next(), Some(&Notice::found(2)));
    }
}
