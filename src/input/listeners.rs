//! The document-wide key channel.
//!
//! Components that need a key regardless of focus (the overlay's `Esc`)
//! take a [`KeySubscription`]. The subscription is released when the guard
//! drops, so every exit path of its owner unsubscribes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(ListenerId, KeyCode)>,
}

#[derive(Debug, Clone, Default)]
pub struct KeyListeners {
    table: Rc<RefCell<ListenerTable>>,
}

impl KeyListeners {
    pub fn subscribe(&self, code: KeyCode) -> KeySubscription {
        let mut table = self.table.borrow_mut();
        table.next_id = table.next_id.saturating_add(1);
        let id = ListenerId(table.next_id);
        table.entries.push((id, code));
        tracing::trace!(?code, listener = id.0, "key listener subscribed");
        KeySubscription {
            id,
            table: Rc::downgrade(&self.table),
        }
    }

    /// The most recent subscriber for the key wins.
    pub fn dispatch(&self, key: &KeyEvent) -> Option<ListenerId> {
        self.table
            .borrow()
            .entries
            .iter()
            .rev()
            .find(|(_, code)| *code == key.code)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[must_use = "dropping the subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct KeySubscription {
    id: ListenerId,
    table: Weak<RefCell<ListenerTable>>,
}

impl KeySubscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
            tracing::trace!(listener = self.id.0, "key listener released");
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::KeyListeners;

    fn esc() -> KeyEvent {
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
    }

    #[test]
    fn dispatch_matches_subscribed_key_only() {
        let listeners = KeyListeners::default();
        let sub = listeners.subscribe(KeyCode::Esc);

        assert_eq!(listeners.dispatch(&esc()), Some(sub.id()));
        assert_eq!(
            listeners.dispatch(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let listeners = KeyListeners::default();
        let sub = listeners.subscribe(KeyCode::Esc);
        assert_eq!(listeners.len(), 1);

        drop(sub);
        assert!(listeners.is_empty());
        assert_eq!(listeners.dispatch(&esc()), None);
    }

    #[test]
    fn latest_subscriber_wins_and_older_one_resumes() {
        let listeners = KeyListeners::default();
        let outer = listeners.subscribe(KeyCode::Esc);
        let inner = listeners.subscribe(KeyCode::Esc);
        assert_eq!(listeners.dispatch(&esc()), Some(inner.id()));

        drop(inner);
        assert_eq!(listeners.dispatch(&esc()), Some(outer.id()));
    }

    #[test]
    fn subscription_outliving_channel_drops_cleanly() {
        let listeners = KeyListeners::default();
        let sub = listeners.subscribe(KeyCode::Esc);
        drop(listeners);
        drop(sub);
    }
}
