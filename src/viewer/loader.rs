use std::sync::Arc;

use image::DynamicImage;
use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel,
};
use tokio::task::JoinHandle;

use crate::api::ImageSource;
use crate::error::{AppError, AppResult};
use crate::runtime::WorkerRuntime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Gallery tile image; never fenced.
    Thumbnail,
    /// Overlay image; only the latest request is current.
    FullSize,
}

#[derive(Debug)]
pub struct PreviewEvent {
    pub kind: PreviewKind,
    pub generation: u64,
    pub url: String,
    pub result: AppResult<DynamicImage>,
}

/// Downloads and decodes gallery thumbnails and full-size overlay images.
pub struct PreviewLoader {
    source: Arc<dyn ImageSource>,
    result_tx: UnboundedSender<PreviewEvent>,
    result_rx: UnboundedReceiver<PreviewEvent>,
    generation: u64,
    tasks: Vec<JoinHandle<()>>,
    runtime: WorkerRuntime,
}

impl PreviewLoader {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        let (result_tx, result_rx) = unbounded_channel();
        Self {
            source,
            result_tx,
            result_rx,
            generation: 0,
            tasks: Vec::new(),
            runtime: WorkerRuntime::new("imf-preview"),
        }
    }

    pub fn request(&mut self, url: &str) -> u64 {
        self.generation = self.generation.saturating_add(1);
        let generation = self.generation;
        self.spawn_download(PreviewKind::FullSize, generation, url);
        tracing::debug!(generation, "preview requested");
        generation
    }

    /// Thumbnails load side by side and leave the full-size generation alone.
    pub fn request_thumbnail(&mut self, url: &str) {
        self.spawn_download(PreviewKind::Thumbnail, self.generation, url);
    }

    fn spawn_download(&mut self, kind: PreviewKind, generation: u64, url: &str) {
        self.tasks.retain(|task| !task.is_finished());

        let url = url.to_string();
        let source = Arc::clone(&self.source);
        let result_tx = self.result_tx.clone();
        let task = self.runtime.spawn(async move {
            let result = match source.download(&url).await {
                Ok(bytes) => decode_image(url.clone(), bytes).await,
                Err(err) => Err(err),
            };
            let _ = result_tx.send(PreviewEvent {
                kind,
                generation,
                url,
                result,
            });
        });
        self.tasks.push(task);
    }

    /// Whether the event answers the latest request.
    pub fn is_current(&self, event: &PreviewEvent) -> bool {
        match event.kind {
            PreviewKind::Thumbnail => true,
            PreviewKind::FullSize => event.generation == self.generation,
        }
    }

    pub async fn recv(&mut self) -> Option<PreviewEvent> {
        self.result_rx.recv().await
    }

    pub fn drain_events(&mut self) -> Vec<PreviewEvent> {
        let mut drained = Vec::new();

        loop {
            match self.result_rx.try_recv() {
                Ok(event) => drained.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }

        drained
    }
}

impl Drop for PreviewLoader {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

async fn decode_image(url: String, bytes: Vec<u8>) -> AppResult<DynamicImage> {
    tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes).map_err(|source| AppError::image(url, source))
    })
    .await
    .map_err(|_| AppError::unsupported("preview decode task did not finish"))?
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use image::{DynamicImage, ImageFormat, RgbaImage};

    use crate::api::{ImagePage, ImageSource, PageRequest, SourceFuture};
    use crate::error::AppError;

    use super::{PreviewEvent, PreviewKind, PreviewLoader};

    struct PngSource;

    impl ImageSource for PngSource {
        fn search(&self, _request: PageRequest) -> SourceFuture<ImagePage> {
            Box::pin(async { Ok(ImagePage::default()) })
        }

        fn download(&self, url: &str) -> SourceFuture<Vec<u8>> {
            let url = url.to_string();
            Box::pin(async move {
                match url.as_str() {
                    "png" => {
                        let mut bytes = Cursor::new(Vec::new());
                        DynamicImage::ImageRgba8(RgbaImage::new(3, 2))
                            .write_to(&mut bytes, ImageFormat::Png)
                            .map_err(|source| AppError::image("png", source))?;
                        Ok(bytes.into_inner())
                    }
                    "garbage" => Ok(b"not an image".to_vec()),
                    _ => Err(AppError::status(404, url)),
                }
            })
        }
    }

    fn wait_for(loader: &mut PreviewLoader, count: usize) -> Vec<PreviewEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut collected = Vec::new();
        while collected.len() < count && Instant::now() < deadline {
            collected.extend(loader.drain_events());
            std::thread::sleep(Duration::from_millis(5));
        }
        collected
    }

    #[test]
    fn request_downloads_and_decodes() {
        let mut loader = PreviewLoader::new(Arc::new(PngSource));
        let generation = loader.request("png");

        let events = wait_for(&mut loader, 1);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].generation, generation);
        assert!(loader.is_current(&events[0]));
        let image = events[0].result.as_ref().expect("png should decode");
        assert_eq!((image.width(), image.height()), (3, 2));
    }

    #[test]
    fn undecodable_bytes_surface_image_error() {
        let mut loader = PreviewLoader::new(Arc::new(PngSource));
        loader.request("garbage");

        let events = wait_for(&mut loader, 1);
        assert!(matches!(events[0].result, Err(AppError::Image { .. })));
    }

    #[test]
    fn newer_request_makes_older_event_stale() {
        let mut loader = PreviewLoader::new(Arc::new(PngSource));
        loader.request("missing");
        loader.request("png");

        let events = wait_for(&mut loader, 2);
        assert_eq!(events.len(), 2);
        let stale = events
            .iter()
            .find(|event| event.url == "missing")
            .expect("stale event should arrive");
        assert!(!loader.is_current(stale));
    }

    #[test]
    fn thumbnails_do_not_fence_full_size_requests() {
        let mut loader = PreviewLoader::new(Arc::new(PngSource));
        let generation = loader.request("png");
        loader.request_thumbnail("missing");
        loader.request_thumbnail("png");

        let events = wait_for(&mut loader, 3);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|event| loader.is_current(event)));

        let full = events
            .iter()
            .find(|event| event.kind == PreviewKind::FullSize)
            .expect("full-size event should arrive");
        assert_eq!(full.generation, generation);
        assert_eq!(
            events
                .iter()
                .filter(|event| event.kind == PreviewKind::Thumbnail)
                .count(),
            2
        );
    }
}
