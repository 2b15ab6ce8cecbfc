use crate::error::AppResult;
use crate::ui::{self, FrameView};

use super::core::App;
use super::state::Focus;
use super::terminal_session::TerminalSurface;

impl App {
    /// Draws one frame and keeps the tile geometry for mouse hit testing.
    pub(crate) fn render_frame<S: TerminalSurface>(&mut self, session: &mut S) -> AppResult<()> {
        let view = FrameView {
            gallery: &self.gallery,
            search_value: self.search_bar.value(),
            search_cursor: self.search_bar.cursor(),
            search_focused: self.state.focus == Focus::Search && !self.viewer.is_open(),
            selected: self.state.selected,
            tile_size: self.tile_size(),
            toasts: &self.toasts,
            overlay: self.viewer.target(),
        };
        let mount = &mut self.mount;
        let mut geometry = None;
        session.draw(|frame| {
            geometry = Some(ui::draw_frame(frame, &view, mount));
        })?;

        if let Some(geometry) = geometry {
            self.state.geometry = geometry;
        }
        self.request_visible_thumbnails();
        Ok(())
    }

    /// Starts downloads for tiles drawn without a cached thumbnail.
    fn request_visible_thumbnails(&mut self) {
        let visible = self.state.geometry.visible();
        let images = self.gallery.images();
        for record in images.get(visible).unwrap_or_default() {
            let url = &record.thumbnail_url;
            if self.mount.has_thumbnail(url) || self.pending_thumbnails.contains(url) {
                continue;
            }
            self.pending_thumbnails.insert(url.clone());
            self.previews.request_thumbnail(url);
        }
    }
}
