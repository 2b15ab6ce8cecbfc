use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::AppResult;

mod pixabay;
mod traits;

pub use pixabay::{PixabayClient, parse_search_response};
pub use traits::{ImagePage, ImageRecord, ImageSource, PageRequest, SourceFuture};

pub fn open_default_source(config: &ApiConfig) -> AppResult<Arc<dyn ImageSource>> {
    PixabayClient::new(config).map(|client| Arc::new(client) as Arc<dyn ImageSource>)
}
