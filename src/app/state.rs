use crate::action::Action;
use crate::ui::GalleryGeometry;

/// Which widget receives plain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Gallery,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub focus: Focus,
    /// 0-based index into the loaded images.
    pub selected: usize,
    /// Tile rects from the last drawn frame.
    pub geometry: GalleryGeometry,
    pub last_action: Option<Action>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            focus: Focus::Search,
            selected: 0,
            geometry: GalleryGeometry::default(),
            last_action: None,
        }
    }
}

impl AppState {
    pub fn grid_columns(&self) -> usize {
        self.geometry.columns.max(1)
    }

    /// Keeps the selection inside `0..len`.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
