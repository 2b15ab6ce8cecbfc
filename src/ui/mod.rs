mod chrome;
mod gallery;
mod layout;
mod overlay;

use ratatui::Frame;

use crate::gallery::GalleryState;
use crate::notify::Toasts;
use crate::viewer::{OverlayMount, OverlayTarget};

pub use chrome::{draw_search_bar, draw_status, draw_toasts, status_text};
pub use gallery::{GalleryGeometry, GridWindow, draw_empty_gallery, draw_gallery, grid_window};
pub use layout::{UiLayout, split_layout};
pub use overlay::{draw_loading_overlay, draw_viewer_overlay};

/// Everything one frame needs, borrowed from the app.
pub struct FrameView<'a> {
    pub gallery: &'a GalleryState,
    pub search_value: &'a str,
    pub search_cursor: usize,
    pub search_focused: bool,
    pub selected: usize,
    pub tile_size: (u16, u16),
    pub toasts: &'a Toasts,
    pub overlay: Option<&'a OverlayTarget>,
}

/// Draws the whole screen and returns where the gallery tiles landed.
pub fn draw_frame(
    frame: &mut Frame<'_>,
    view: &FrameView<'_>,
    mount: &mut OverlayMount,
) -> GalleryGeometry {
    let area = frame.area();
    let layout = split_layout(area);

    draw_search_bar(
        frame,
        layout.search,
        view.search_value,
        view.search_cursor,
        view.search_focused,
    );

    let geometry = if view.gallery.has_results() {
        draw_gallery(
            frame,
            layout.gallery,
            view.gallery.images(),
            view.selected,
            !view.search_focused && view.overlay.is_none(),
            view.tile_size,
            mount,
        )
    } else {
        if !view.gallery.is_loading() {
            let message = if view.gallery.query().is_none() {
                "Nothing here yet. Press / and search."
            } else {
                "No images"
            };
            draw_empty_gallery(frame, layout.gallery, message);
        }
        GalleryGeometry::default()
    };
    draw_status(frame, layout.status, view.gallery, mount.protocol_label());

    if view.gallery.is_loading() {
        draw_loading_overlay(frame, layout.gallery, view.gallery.page());
    }

    match view.overlay {
        Some(target) => draw_viewer_overlay(frame, area, target, mount),
        None => mount.clear_geometry(),
    }

    draw_toasts(frame, layout.gallery, view.toasts);
    geometry
}
