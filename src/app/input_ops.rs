use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use crate::action::{Action, ActionOutcome};
use crate::gallery::{FetchCompletion, Query};
use crate::input::{SearchBar, SearchBarOutcome};
use crate::input::keymap::map_key_to_action;
use crate::viewer::{OverlayTarget, PreviewEvent, PreviewKind, PreviewSlot, ViewerChange};

use super::core::App;
use super::state::Focus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InputOutcome {
    pub redraw: bool,
    /// Graphics protocols may leave image cells behind when the overlay closes.
    pub clear_terminal: bool,
    pub quit_requested: bool,
}

impl InputOutcome {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn overlay_closed() -> Self {
        Self {
            redraw: true,
            clear_terminal: true,
            quit_requested: false,
        }
    }
}

impl App {
    pub(crate) fn handle_input_event(&mut self, event: Event) -> InputOutcome {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Resize(_, _) => InputOutcome {
                redraw: true,
                clear_terminal: true,
                quit_requested: false,
            },
            _ => InputOutcome::default(),
        }
    }

    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) -> InputOutcome {
        if let Some(id) = self.listeners.dispatch(&key)
            && self.viewer.owns_listener(id)
        {
            tracing::debug!("overlay closed by escape");
            self.viewer.clear_selection();
            return InputOutcome::overlay_closed();
        }

        let overlay_open = self.viewer.is_open();
        let action = map_key_to_action(key, self.state.focus, overlay_open);
        if action.is_none() && self.state.focus == Focus::Search && !overlay_open {
            return match self.search_bar.handle_key(key, &mut self.toasts) {
                SearchBarOutcome::Submitted(query) => {
                    self.submit_query(query);
                    InputOutcome::redraw()
                }
                SearchBarOutcome::Edited | SearchBarOutcome::Rejected => InputOutcome::redraw(),
                SearchBarOutcome::Ignored => InputOutcome::default(),
            };
        }

        let Some(action) = action else {
            return InputOutcome::default();
        };
        let was_open = self.viewer.is_open();
        match self.apply_action(action) {
            ActionOutcome::QuitRequested => InputOutcome {
                quit_requested: true,
                ..InputOutcome::default()
            },
            ActionOutcome::Applied if was_open && !self.viewer.is_open() => {
                InputOutcome::overlay_closed()
            }
            ActionOutcome::Applied => InputOutcome::redraw(),
            ActionOutcome::Noop => InputOutcome::default(),
        }
    }

    pub(crate) fn handle_mouse_event(&mut self, mouse: MouseEvent) -> InputOutcome {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {}
            MouseEventKind::ScrollDown if !self.viewer.is_open() => {
                return self.action_redraw(Action::MoveSelection { dx: 0, dy: 1 });
            }
            MouseEventKind::ScrollUp if !self.viewer.is_open() => {
                return self.action_redraw(Action::MoveSelection { dx: 0, dy: -1 });
            }
            _ => return InputOutcome::default(),
        }

        if self.viewer.is_open() {
            if self.mount.is_backdrop_hit(mouse.column, mouse.row) && self.viewer.clear_selection()
            {
                tracing::debug!("overlay closed by backdrop click");
                return InputOutcome::overlay_closed();
            }
            return InputOutcome::default();
        }

        let Some(index) = self.state.geometry.hit_test(mouse.column, mouse.row) else {
            return InputOutcome::default();
        };
        self.state.focus = Focus::Gallery;
        self.state.selected = index;
        self.action_redraw(Action::OpenSelected)
    }

    fn action_redraw(&mut self, action: Action) -> InputOutcome {
        match self.apply_action(action) {
            ActionOutcome::Applied => InputOutcome::redraw(),
            _ => InputOutcome::default(),
        }
    }

    pub fn apply_action(&mut self, action: Action) -> ActionOutcome {
        self.state.last_action = Some(action);
        tracing::debug!(action = action.as_str(), "apply action");

        match action {
            Action::FocusSearch => {
                self.state.focus = Focus::Search;
                ActionOutcome::Applied
            }
            Action::FocusGallery => {
                self.state.focus = Focus::Gallery;
                ActionOutcome::Applied
            }
            Action::MoveSelection { dx, dy } => {
                let step = i64::from(dx) + i64::from(dy) * self.state.grid_columns() as i64;
                if self.move_selection(step) {
                    ActionOutcome::Applied
                } else {
                    ActionOutcome::Noop
                }
            }
            Action::OpenSelected => {
                let Some(record) = self.gallery.images().get(self.state.selected) else {
                    return ActionOutcome::Noop;
                };
                let target = OverlayTarget::from(record);
                let url = target.full_size_url.clone();
                if self.viewer.select_image(&self.listeners, target) != ViewerChange::Closed {
                    self.ensure_preview(&url);
                }
                ActionOutcome::Applied
            }
            Action::Step { delta } => {
                if !self.viewer.is_open() || !self.move_selection(i64::from(delta)) {
                    return ActionOutcome::Noop;
                }
                let Some(record) = self.gallery.images().get(self.state.selected) else {
                    return ActionOutcome::Noop;
                };
                let target = OverlayTarget::from(record);
                if self.viewer.target() == Some(&target) {
                    return ActionOutcome::Applied;
                }
                let url = target.full_size_url.clone();
                self.viewer.select_image(&self.listeners, target);
                self.ensure_preview(&url);
                ActionOutcome::Applied
            }
            Action::LoadMore => {
                if !self.gallery.can_load_more() {
                    return ActionOutcome::Noop;
                }
                match self.gallery.request_next_page() {
                    Some(ticket) => {
                        self.fetcher.submit(ticket);
                        ActionOutcome::Applied
                    }
                    None => ActionOutcome::Noop,
                }
            }
            Action::CloseOverlay => {
                if self.viewer.clear_selection() {
                    ActionOutcome::Applied
                } else {
                    ActionOutcome::Noop
                }
            }
            Action::Quit => ActionOutcome::QuitRequested,
        }
    }

    /// Submits `raw` as if it had been typed into the search field.
    pub fn submit_initial_query(&mut self, raw: &str) {
        self.search_bar = SearchBar::with_value(raw);
        if let Some(query) = self.search_bar.submit(&mut self.toasts) {
            self.submit_query(query);
        }
    }

    pub(crate) fn submit_query(&mut self, query: Query) {
        self.state.focus = Focus::Gallery;
        if let Some(ticket) = self.gallery.submit_query(query) {
            self.state.selected = 0;
            self.fetcher.submit(ticket);
        }
    }

    pub(crate) fn handle_fetch_completion(&mut self, completion: FetchCompletion) -> bool {
        let applied = self.gallery.apply(completion, &mut self.toasts);
        if applied {
            self.state.clamp_selection(self.gallery.images().len());
        }
        applied
    }

    /// Caches decoded images regardless of age; failures only count for the
    /// latest request. True when the open overlay shows the affected URL.
    pub(crate) fn handle_preview_event(&mut self, event: PreviewEvent) -> bool {
        if event.kind == PreviewKind::Thumbnail {
            self.pending_thumbnails.remove(&event.url);
            match event.result {
                Ok(image) => self.mount.insert_thumbnail(&event.url, image),
                Err(err) => {
                    tracing::debug!(url = %event.url, error = %err, "thumbnail failed");
                    self.mount.insert_thumbnail_failure(&event.url, err.to_string());
                }
            }
            return true;
        }

        let current = self.previews.is_current(&event);
        match event.result {
            Ok(image) => self.mount.insert_image(&event.url, image),
            Err(err) if current => {
                tracing::warn!(url = %event.url, error = %err, "preview failed");
                self.mount.insert_failure(&event.url, err.to_string());
            }
            Err(err) => {
                tracing::debug!(url = %event.url, error = %err, "stale preview failure dropped");
            }
        }
        self.viewer
            .target()
            .is_some_and(|target| target.full_size_url == event.url)
    }

    /// Failed previews are retried when the image is opened again.
    fn ensure_preview(&mut self, url: &str) {
        if !matches!(self.mount.slot_mut(url), Some(PreviewSlot::Ready(_))) {
            self.previews.request(url);
        }
    }

    fn move_selection(&mut self, step: i64) -> bool {
        let len = self.gallery.images().len();
        if len == 0 {
            return false;
        }
        let max = (len - 1) as i64;
        let next = (self.state.selected as i64 + step).clamp(0, max) as usize;
        if next == self.state.selected {
            return false;
        }
        self.state.selected = next;
        true
    }
}
