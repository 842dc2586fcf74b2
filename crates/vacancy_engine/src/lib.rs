//! Vacancy engine: page fetching, per-site parsing, pagination and export.
mod decode;
mod document;
mod driver;
mod engine;
mod export;
mod fetch;
mod filename;
mod persist;
pub mod sources;
mod types;

pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use document::ParsedDocument;
pub use driver::{DriverSettings, LogProgressSink, PaginationDriver, ProgressSink, MAX_CONCURRENCY};
pub use engine::{EngineConfig, OnError, RunReport, ScrapeEngine, SourceOutcome};
pub use export::{export_results, ExportError, ExportSummary};
pub use fetch::{load_page, FetchSettings, FetchedPage, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use filename::export_filename;
pub use persist::{ensure_output_dir, write_atomically, PersistError};
pub use sources::{AnySource, SourceBuildError, SourceConfig, SourceId, SourceParser};
pub use types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, ParseDefect, ScrapeError, ScrapeEvent,
    SessionReport,
};

// Re-exported so callers can build cancellation tokens without a direct dependency.
pub use tokio_util::sync::CancellationToken;
