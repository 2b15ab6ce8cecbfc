use std::sync::Arc;

use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel,
};
use tokio::task::JoinHandle;

use crate::api::ImageSource;
use crate::runtime::WorkerRuntime;

use super::state::{FetchCompletion, FetchTicket};

/// Runs page fetches in the background and hands completions back to the
/// UI loop. In-flight requests are never canceled; stale answers are fenced
/// out by [`super::GalleryState::apply`].
pub struct FetchWorker {
    source: Arc<dyn ImageSource>,
    result_tx: UnboundedSender<FetchCompletion>,
    result_rx: UnboundedReceiver<FetchCompletion>,
    tasks: Vec<JoinHandle<()>>,
    runtime: WorkerRuntime,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        let (result_tx, result_rx) = unbounded_channel();
        Self {
            source,
            result_tx,
            result_rx,
            tasks: Vec::new(),
            runtime: WorkerRuntime::new("imf-fetch"),
        }
    }

    pub fn submit(&mut self, ticket: FetchTicket) {
        self.tasks.retain(|task| !task.is_finished());

        let source = Arc::clone(&self.source);
        let result_tx = self.result_tx.clone();
        let task = self.runtime.spawn(async move {
            let result = source.search(ticket.request()).await;
            let _ = result_tx.send(FetchCompletion { ticket, result });
        });
        self.tasks.push(task);
    }

    pub fn in_flight_len(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    pub async fn recv(&mut self) -> Option<FetchCompletion> {
        self.result_rx.recv().await
    }

    pub fn drain_completions(&mut self) -> Vec<FetchCompletion> {
        let mut drained = Vec::new();

        loop {
            match self.result_rx.try_recv() {
                Ok(completion) => drained.push(completion),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }

        drained
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use crate::api::{ImagePage, ImageRecord, ImageSource, PageRequest, SourceFuture};
    use crate::error::AppError;
    use crate::gallery::query::Query;
    use crate::gallery::state::{FetchCompletion, FetchTicket, PAGE_SIZE};

    use super::FetchWorker;

    struct EchoSource;

    impl ImageSource for EchoSource {
        fn search(&self, request: PageRequest) -> SourceFuture<ImagePage> {
            Box::pin(async move {
                if request.query == "broken" {
                    return Err(AppError::unsupported("backend down"));
                }
                Ok(ImagePage {
                    records: vec![ImageRecord {
                        id: u64::from(request.page),
                        thumbnail_url: "thumb".to_string(),
                        full_size_url: "full".to_string(),
                        tags: request.query,
                    }],
                    total_hits: 1,
                })
            })
        }

        fn download(&self, _url: &str) -> SourceFuture<Vec<u8>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    fn ticket(raw: &str, generation: u64, page: u32) -> FetchTicket {
        FetchTicket {
            generation,
            query: Query::parse(raw).expect("query should parse"),
            page,
            per_page: PAGE_SIZE,
        }
    }

    fn wait_for(worker: &mut FetchWorker, count: usize) -> Vec<FetchCompletion> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut collected = Vec::new();
        while collected.len() < count && Instant::now() < deadline {
            collected.extend(worker.drain_completions());
            std::thread::sleep(Duration::from_millis(5));
        }
        collected
    }

    #[test]
    fn submit_delivers_completion_with_original_ticket() {
        let mut worker = FetchWorker::new(Arc::new(EchoSource));
        worker.submit(ticket("cats", 4, 2));

        let done = wait_for(&mut worker, 1);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket.generation, 4);
        assert_eq!(done[0].ticket.page, 2);
        let page = done[0].result.as_ref().expect("fetch should succeed");
        assert_eq!(page.records[0].id, 2);
        assert_eq!(page.records[0].tags, "cats");
    }

    #[test]
    fn source_errors_are_delivered_not_swallowed() {
        let mut worker = FetchWorker::new(Arc::new(EchoSource));
        worker.submit(ticket("broken", 1, 1));

        let done = wait_for(&mut worker, 1);
        assert_eq!(done.len(), 1);
        let err = done[0].result.as_ref().expect_err("fetch should fail");
        assert_eq!(err.to_string(), "unsupported: backend down");
    }
}
