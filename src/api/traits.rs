use futures_util::future::BoxFuture;

use crate::error::AppResult;

pub type SourceFuture<T> = BoxFuture<'static, AppResult<T>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: u64,
    pub thumbnail_url: String,
    pub full_size_url: String,
    pub tags: String,
}

/// One page of hits plus the total reported for the query across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImagePage {
    pub records: Vec<ImageRecord>,
    pub total_hits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    /// 1-based.
    pub page: u32,
    pub per_page: u32,
}

pub trait ImageSource: Send + Sync {
    fn search(&self, request: PageRequest) -> SourceFuture<ImagePage>;
    fn download(&self, url: &str) -> SourceFuture<Vec<u8>>;
}
