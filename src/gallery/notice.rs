#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One-shot, user-facing outcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn no_results() -> Self {
        Self::new(
            NoticeLevel::Error,
            "Sorry, no images found. Please, try again!",
        )
    }

    pub fn found(total_hits: usize) -> Self {
        Self::new(
            NoticeLevel::Success,
            format!("Hooray! We found {total_hits} images."),
        )
    }

    pub fn end_of_results() -> Self {
        Self::new(
            NoticeLevel::Info,
            "You've reached the end of search results.",
        )
    }

    pub fn missing_query() -> Self {
        Self::new(NoticeLevel::Warning, "Please specify your query!")
    }

    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}
