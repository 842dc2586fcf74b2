use std::fmt;

use vacancy_core::PageIndex;

use crate::sources::SourceId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// Failure to load a page. A non-success status is the common case and is
/// fatal to the session that requested the page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "undecodable body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// The page was fetched but its markup is not what the source parser expects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDefect {
    #[error("listing container `{selector}` not found")]
    MissingListing { selector: &'static str },
}

/// Fatal outcome of one session.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("{source_id}: page {page} was not loaded: {error}")]
    PageLoad {
        source_id: SourceId,
        page: PageIndex,
        #[source]
        error: FetchError,
    },
    #[error("{source_id}: page {page} could not be parsed: {defect}")]
    Parse {
        source_id: SourceId,
        page: PageIndex,
        #[source]
        defect: ParseDefect,
    },
    #[error("{source_id}: cancelled before page {page}")]
    Cancelled { source_id: SourceId, page: PageIndex },
    #[error("{source_id}: pagination out of step: {error}")]
    Session {
        source_id: SourceId,
        #[source]
        error: vacancy_core::SessionError,
    },
}

impl ScrapeError {
    pub fn source_id(&self) -> SourceId {
        match self {
            ScrapeError::PageLoad { source_id, .. }
            | ScrapeError::Parse { source_id, .. }
            | ScrapeError::Cancelled { source_id, .. }
            | ScrapeError::Session { source_id, .. } => *source_id,
        }
    }

    /// Page the session stopped at, when the failure is tied to one.
    pub fn page(&self) -> Option<PageIndex> {
        match self {
            ScrapeError::PageLoad { page, .. }
            | ScrapeError::Parse { page, .. }
            | ScrapeError::Cancelled { page, .. } => Some(*page),
            ScrapeError::Session { .. } => None,
        }
    }
}

/// Progress reported by the pagination driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    SessionStarted {
        source_id: SourceId,
        main_url: String,
    },
    PageDone {
        source_id: SourceId,
        page: PageIndex,
        last_page: PageIndex,
        records: usize,
    },
    SessionFinished {
        source_id: SourceId,
        pages: u32,
        records: usize,
    },
    SessionFailed {
        source_id: SourceId,
        page: Option<PageIndex>,
        reason: String,
    },
}

/// Summary of a session that reached its last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub source_id: SourceId,
    pub pages: u32,
    pub records: usize,
}
