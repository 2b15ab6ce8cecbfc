use crate::api::{ImagePage, ImageRecord, PageRequest};
use crate::error::AppResult;

use super::notice::{Notice, Notifier};
use super::query::Query;

pub const PAGE_SIZE: u32 = 12;

/// A fetch the state machine wants executed. `generation` fences the answer:
/// only the most recently issued ticket may be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: Query,
    pub page: u32,
    pub per_page: u32,
}

impl FetchTicket {
    pub fn request(&self) -> PageRequest {
        PageRequest {
            query: self.query.as_str().to_string(),
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: AppResult<ImagePage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryPhase {
    Idle,
    Fetching { query: Query, page: u32 },
    Settled { query: Query, page: u32 },
    Failed { query: Query, page: u32 },
}

#[derive(Debug, Clone)]
pub struct GalleryState {
    query: Option<Query>,
    page: u32,
    loaded_page: u32,
    images: Vec<ImageRecord>,
    total_hits: usize,
    loading: bool,
    error: Option<String>,
    phase: GalleryPhase,
    generation: u64,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self {
            query: None,
            page: 1,
            loaded_page: 0,
            images: Vec::new(),
            total_hits: 0,
            loading: false,
            error: None,
            phase: GalleryPhase::Idle,
            generation: 0,
        }
    }
}

impl GalleryState {
    pub fn submit_query(&mut self, query: Query) -> Option<FetchTicket> {
        if self.query.as_ref() == Some(&query) {
            tracing::debug!(query = %query, "query unchanged, skipping refetch");
            return None;
        }

        self.images.clear();
        self.error = None;
        self.total_hits = 0;
        self.page = 1;
        self.loaded_page = 0;
        self.query = Some(query.clone());
        Some(self.begin_fetch(query, 1))
    }

    pub fn request_next_page(&mut self) -> Option<FetchTicket> {
        if self.loading || self.images.len() >= self.total_hits {
            return None;
        }
        let query = self.query.clone()?;

        // Follows the last page that actually landed, so a failed page is
        // requested again rather than skipped.
        let page = self.loaded_page.saturating_add(1);
        self.page = page;
        self.error = None;
        Some(self.begin_fetch(query, page))
    }

    /// Returns `false` when the completion was dropped as stale.
    pub fn apply(&mut self, completion: FetchCompletion, notifier: &mut dyn Notifier) -> bool {
        let FetchCompletion { ticket, result } = completion;
        if ticket.generation != self.generation || !self.loading {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                query = %ticket.query,
                page = ticket.page,
                "dropping stale fetch result"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => self.apply_page(ticket, page, notifier),
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(query = %ticket.query, page = ticket.page, error = %message, "fetch failed");
                self.error = Some(message.clone());
                self.phase = GalleryPhase::Failed {
                    query: ticket.query,
                    page: ticket.page,
                };
                notifier.notify(Notice::fetch_failed(message));
            }
        }
        true
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> &GalleryPhase {
        &self.phase
    }

    pub fn has_results(&self) -> bool {
        !self.images.is_empty()
    }

    /// Only meaningful once a page has landed; before that the total is unknown.
    pub fn is_last_page(&self) -> bool {
        self.loaded_page > 0 && self.images.len() >= self.total_hits
    }

    pub fn can_load_more(&self) -> bool {
        self.has_results() && !self.loading && !self.is_last_page()
    }

    fn begin_fetch(&mut self, query: Query, page: u32) -> FetchTicket {
        self.generation = self.generation.saturating_add(1);
        self.loading = true;
        self.phase = GalleryPhase::Fetching {
            query: query.clone(),
            page,
        };
        tracing::info!(query = %query, page, generation = self.generation, "fetch issued");
        FetchTicket {
            generation: self.generation,
            query,
            page,
            per_page: PAGE_SIZE,
        }
    }

    fn apply_page(&mut self, ticket: FetchTicket, page: ImagePage, notifier: &mut dyn Notifier) {
        let ImagePage {
            records,
            total_hits,
        } = page;

        if records.is_empty() {
            if ticket.page == 1 {
                notifier.notify(Notice::no_results());
            } else {
                // The source ran dry before its reported total; stop offering more.
                self.total_hits = self.images.len();
                notifier.notify(Notice::end_of_results());
            }
            self.phase = GalleryPhase::Settled {
                query: ticket.query,
                page: ticket.page,
            };
            return;
        }

        let total_pages = total_pages(total_hits, ticket.per_page);
        if ticket.page == 1 {
            notifier.notify(Notice::found(total_hits));
        }
        if ticket.page as usize == total_pages {
            notifier.notify(Notice::end_of_results());
        }

        tracing::info!(
            query = %ticket.query,
            page = ticket.page,
            received = records.len(),
            total_hits,
            "fetch applied"
        );
        self.images.extend(records);
        self.total_hits = total_hits;
        self.loaded_page = ticket.page;
        self.phase = GalleryPhase::Settled {
            query: ticket.query,
            page: ticket.page,
        };
    }
}

pub fn total_pages(total_hits: usize, per_page: u32) -> usize {
    let per_page = (per_page as usize).max(1);
    total_hits.div_ceil(per_page)
}
