pub mod fetcher;
pub mod notice;
pub mod query;
pub mod state;

pub use fetcher::FetchWorker;
pub use notice::{Notice, NoticeLevel, Notifier};
pub use query::{EmptyQuery, Query};
pub use state::{FetchCompletion, FetchTicket, GalleryPhase, GalleryState, PAGE_SIZE};
