use crossterm::event::KeyCode;

use crate::api::ImageRecord;
use crate::input::{KeyListeners, KeySubscription, ListenerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTarget {
    pub full_size_url: String,
    pub tags: String,
}

impl From<&ImageRecord> for OverlayTarget {
    fn from(record: &ImageRecord) -> Self {
        Self {
            full_size_url: record.full_size_url.clone(),
            tags: record.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerChange {
    Opened,
    Switched,
    Closed,
}

#[derive(Debug)]
struct OverlaySession {
    target: OverlayTarget,
    // Held for the session's lifetime; dropping the session unsubscribes.
    escape: KeySubscription,
}

#[derive(Debug, Default)]
pub struct OverlayViewer {
    session: Option<OverlaySession>,
}

impl OverlayViewer {
    /// Opens when closed, closes when `target` is already shown, otherwise
    /// switches to `target` without closing.
    pub fn select_image(&mut self, listeners: &KeyListeners, target: OverlayTarget) -> ViewerChange {
        let same = self
            .session
            .as_ref()
            .map(|session| session.target.full_size_url == target.full_size_url);

        match same {
            Some(true) => {
                self.session = None;
                tracing::debug!(url = %target.full_size_url, "overlay toggled closed");
                ViewerChange::Closed
            }
            Some(false) => {
                tracing::debug!(url = %target.full_size_url, "overlay switched");
                if let Some(session) = self.session.as_mut() {
                    session.target = target;
                }
                ViewerChange::Switched
            }
            None => {
                tracing::debug!(url = %target.full_size_url, "overlay opened");
                self.session = Some(OverlaySession {
                    target,
                    escape: listeners.subscribe(KeyCode::Esc),
                });
                ViewerChange::Opened
            }
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        let closed = self.session.take().is_some();
        if closed {
            tracing::debug!("overlay dismissed");
        }
        closed
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn target(&self) -> Option<&OverlayTarget> {
        self.session.as_ref().map(|session| &session.target)
    }

    pub fn owns_listener(&self, id: ListenerId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.escape.id() == id)
    }
}
