use std::sync::Arc;

use scrape_logging::{scrape_info, scrape_warn};
use tokio_util::sync::CancellationToken;
use vacancy_core::ResultSink;

use crate::driver::{DriverSettings, PaginationDriver, ProgressSink};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::sources::{AnySource, SourceId, SourceParser};
use crate::{ScrapeError, SessionReport};

/// What to do with the remaining sources once one session fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Move on to the next source.
    #[default]
    Continue,
    /// Skip every remaining source.
    Abort,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub concurrency: usize,
    pub on_error: OnError,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            concurrency: 1,
            on_error: OnError::Continue,
        }
    }
}

#[derive(Debug)]
pub struct SourceOutcome {
    pub source_id: SourceId,
    pub result: Result<SessionReport, ScrapeError>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<SourceOutcome>,
    /// Sources not attempted because an earlier one failed under
    /// [`OnError::Abort`] or the run was cancelled.
    pub skipped: Vec<SourceId>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &ScrapeError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none() && self.skipped.is_empty()
    }
}

/// Runs one search across several sources, one session after another, into a
/// sink owned by the caller.
pub struct ScrapeEngine {
    fetcher: Arc<dyn Fetcher>,
    config: EngineConfig,
    cancel: CancellationToken,
}

impl ScrapeEngine {
    pub fn new(config: EngineConfig) -> Self {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        Self::with_fetcher(fetcher, config)
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, config: EngineConfig) -> Self {
        Self {
            fetcher,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the run before its next page fetch.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(
        &self,
        query: &str,
        sources: &[AnySource],
        sink: &mut ResultSink,
        progress: &dyn ProgressSink,
    ) -> RunReport {
        let settings = DriverSettings {
            concurrency: self.config.concurrency,
            cancel: self.cancel.clone(),
        };
        let driver = PaginationDriver::new(self.fetcher.as_ref(), settings, progress);
        let mut report = RunReport::default();

        for (index, source) in sources.iter().enumerate() {
            let source_id = source.config().id;
            let result = driver.run(source, query, sink).await;
            let stop = match &result {
                Ok(_) => false,
                Err(ScrapeError::Cancelled { .. }) => true,
                Err(err) => {
                    scrape_warn!("{err}");
                    self.config.on_error == OnError::Abort
                }
            };
            report.outcomes.push(SourceOutcome { source_id, result });
            if stop {
                report.skipped = sources[index + 1..]
                    .iter()
                    .map(|s| s.config().id)
                    .collect();
                break;
            }
        }

        scrape_info!(
            "Run for {:?} finished: {} records in sink, {} failed, {} skipped",
            query,
            sink.len(),
            report.failures().count(),
            report.skipped.len()
        );
        report
    }

    /// Drives [`ScrapeEngine::run`] on a fresh runtime. With `cancel_on_ctrl_c`
    /// an interrupt stops the run between pages instead of killing the process.
    pub fn run_blocking(
        &self,
        query: &str,
        sources: &[AnySource],
        sink: &mut ResultSink,
        progress: &dyn ProgressSink,
        cancel_on_ctrl_c: bool,
    ) -> std::io::Result<RunReport> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(async {
            if cancel_on_ctrl_c {
                let cancel = self.cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        scrape_warn!("Interrupted, stopping after the current page");
                        cancel.cancel();
                    }
                });
            }
            self.run(query, sources, sink, progress).await
        }))
    }
}
