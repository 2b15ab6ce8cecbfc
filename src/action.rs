#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FocusSearch,
    FocusGallery,
    MoveSelection { dx: i32, dy: i32 },
    /// Open (or toggle) the overlay for the selected tile.
    OpenSelected,
    /// Switch the open overlay to a neighbouring image.
    Step { delta: i32 },
    LoadMore,
    CloseOverlay,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Noop,
    QuitRequested,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FocusSearch => "focus-search",
            Self::FocusGallery => "focus-gallery",
            Self::MoveSelection { .. } => "move-selection",
            Self::OpenSelected => "open-selected",
            Self::Step { .. } => "step",
            Self::LoadMore => "load-more",
            Self::CloseOverlay => "close-overlay",
            Self::Quit => "quit",
        }
    }
}
