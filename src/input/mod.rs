pub mod keymap;
pub mod listeners;
pub mod search_bar;

pub use keymap::map_key_to_action;
pub use listeners::{KeyListeners, KeySubscription, ListenerId};
pub use search_bar::{SearchBar, SearchBarOutcome};
