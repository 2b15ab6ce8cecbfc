use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ImageSource, open_default_source};
use crate::config::{API_KEY_ENV, Config};
use crate::error::AppResult;
use crate::gallery::{FetchWorker, GalleryState, Notice, NoticeLevel, Notifier};
use crate::input::{KeyListeners, SearchBar};
use crate::notify::Toasts;
use crate::viewer::{OverlayMount, OverlayViewer, PreviewLoader};

use super::state::AppState;

pub struct App {
    pub state: AppState,
    pub gallery: GalleryState,
    pub search_bar: SearchBar,
    pub viewer: OverlayViewer,
    pub listeners: KeyListeners,
    pub toasts: Toasts,
    pub mount: OverlayMount,
    pub config: Config,
    pub(super) fetcher: FetchWorker,
    pub(super) previews: PreviewLoader,
    /// Thumbnail URLs requested but not yet landed in the mount.
    pub(super) pending_thumbnails: HashSet<String>,
}

impl App {
    pub fn new(config: Config) -> AppResult<Self> {
        let source = open_default_source(&config.api)?;
        Ok(Self::with_source(config, source))
    }

    pub fn with_source(config: Config, source: Arc<dyn ImageSource>) -> Self {
        let mut toasts = Toasts::new(Duration::from_millis(config.ui.notice_ttl_ms));
        if config.api.key.trim().is_empty() {
            toasts.notify(Notice::new(
                NoticeLevel::Warning,
                format!("No API key configured; set {API_KEY_ENV} or [api].key"),
            ));
        }

        Self {
            state: AppState::default(),
            gallery: GalleryState::default(),
            search_bar: SearchBar::default(),
            viewer: OverlayViewer::default(),
            listeners: KeyListeners::default(),
            toasts,
            mount: OverlayMount::new(
                config.viewer.preview_cache_entries,
                config.viewer.thumbnail_cache_entries,
            ),
            fetcher: FetchWorker::new(Arc::clone(&source)),
            previews: PreviewLoader::new(source),
            pending_thumbnails: HashSet::new(),
            config,
        }
    }

    pub fn tile_size(&self) -> (u16, u16) {
        (self.config.ui.tile_width, self.config.ui.tile_height)
    }
}
