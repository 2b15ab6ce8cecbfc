use std::num::NonZeroUsize;

use image::DynamicImage;
use lru::LruCache;
use ratatui::layout::{Position, Rect};
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;

pub enum PreviewSlot {
    Ready(Box<StatefulProtocol>),
    Failed(String),
}

/// Longest side kept for tile thumbnails before terminal encoding.
const THUMBNAIL_MAX_PX: u32 = 320;

/// The single overlay layer of the application. Created once when the app
/// starts and handed by reference to whoever draws images; it keeps the
/// terminal graphics picker, encoded full-size images and tile thumbnails,
/// and the geometry of the last drawn overlay for hit testing.
pub struct OverlayMount {
    picker: Picker,
    protocol_label: &'static str,
    terminal_initialized: bool,
    previews: LruCache<String, PreviewSlot>,
    thumbnails: LruCache<String, PreviewSlot>,
    layer: Rect,
    content: Rect,
}

impl OverlayMount {
    pub fn new(preview_entries: usize, thumbnail_entries: usize) -> Self {
        Self {
            picker: Picker::halfblocks(),
            protocol_label: "halfblocks",
            terminal_initialized: false,
            previews: LruCache::new(capacity(preview_entries)),
            thumbnails: LruCache::new(capacity(thumbnail_entries)),
            layer: Rect::default(),
            content: Rect::default(),
        }
    }

    /// Must run after the terminal entered raw mode; falls back to
    /// halfblocks when the terminal does not answer the graphics query.
    pub fn initialize_terminal(&mut self) {
        if self.terminal_initialized {
            return;
        }

        if let Ok(picker) = Picker::from_query_stdio() {
            let protocol_type = picker.protocol_type();
            self.protocol_label = protocol_type_label(protocol_type);
            self.picker = picker;
            self.previews.clear();
            self.thumbnails.clear();
        }
        tracing::info!(protocol = self.protocol_label, "overlay graphics initialized");
        self.terminal_initialized = true;
    }

    pub fn protocol_label(&self) -> &'static str {
        self.protocol_label
    }

    pub fn insert_image(&mut self, url: &str, image: DynamicImage) {
        let protocol = self.picker.new_resize_protocol(image);
        self.previews
            .put(url.to_string(), PreviewSlot::Ready(Box::new(protocol)));
    }

    pub fn insert_failure(&mut self, url: &str, message: impl Into<String>) {
        self.previews
            .put(url.to_string(), PreviewSlot::Failed(message.into()));
    }

    pub fn contains(&self, url: &str) -> bool {
        self.previews.contains(url)
    }

    pub fn slot_mut(&mut self, url: &str) -> Option<&mut PreviewSlot> {
        self.previews.get_mut(url)
    }

    pub fn insert_thumbnail(&mut self, url: &str, image: DynamicImage) {
        let image = image.thumbnail(THUMBNAIL_MAX_PX, THUMBNAIL_MAX_PX);
        let protocol = self.picker.new_resize_protocol(image);
        self.thumbnails
            .put(url.to_string(), PreviewSlot::Ready(Box::new(protocol)));
    }

    pub fn insert_thumbnail_failure(&mut self, url: &str, message: impl Into<String>) {
        self.thumbnails
            .put(url.to_string(), PreviewSlot::Failed(message.into()));
    }

    pub fn has_thumbnail(&self, url: &str) -> bool {
        self.thumbnails.contains(url)
    }

    pub fn thumbnail_slot_mut(&mut self, url: &str) -> Option<&mut PreviewSlot> {
        self.thumbnails.get_mut(url)
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    pub fn set_geometry(&mut self, layer: Rect, content: Rect) {
        self.layer = layer;
        self.content = content;
    }

    pub fn clear_geometry(&mut self) {
        self.set_geometry(Rect::default(), Rect::default());
    }

    /// True only for a click on the backdrop itself, not on the content.
    pub fn is_backdrop_hit(&self, column: u16, row: u16) -> bool {
        let position = Position::new(column, row);
        self.layer.contains(position) && !self.content.contains(position)
    }
}

fn capacity(entries: usize) -> NonZeroUsize {
    NonZeroUsize::new(entries.max(1)).expect("cache entries is non-zero")
}

pub(crate) fn protocol_type_label(protocol: ProtocolType) -> &'static str {
    match protocol {
        ProtocolType::Halfblocks => "halfblocks",
        ProtocolType::Sixel => "sixel",
        ProtocolType::Kitty => "kitty",
        ProtocolType::Iterm2 => "iterm2",
    }
}
