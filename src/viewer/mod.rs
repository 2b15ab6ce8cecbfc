pub mod loader;
pub mod mount;
pub mod state;

pub use loader::{PreviewEvent, PreviewKind, PreviewLoader};
pub use mount::{OverlayMount, PreviewSlot};
pub use state::{OverlayTarget, OverlayViewer, ViewerChange};
