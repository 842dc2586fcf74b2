use futures_util::{stream, StreamExt};
use scrape_logging::{scrape_debug, scrape_error, scrape_info};
use tokio_util::sync::CancellationToken;
use vacancy_core::{MaxPages, PageIndex, ResultSink, SearchSession, SessionError, VacancyRecord};

use crate::document::ParsedDocument;
use crate::fetch::{load_page, FetchedPage, Fetcher};
use crate::sources::{SourceId, SourceParser};
use crate::{FetchError, ParseDefect, ScrapeError, ScrapeEvent, SessionReport};

/// Upper bound on pages fetched at once within a session.
pub const MAX_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct DriverSettings {
    /// Pages fetched ahead after the first page; 1 is strictly sequential.
    pub concurrency: usize,
    /// Checked before each page fetch.
    pub cancel: CancellationToken,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            concurrency: 1,
            cancel: CancellationToken::new(),
        }
    }
}

impl DriverSettings {
    fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ScrapeEvent);
}

/// Reports progress through the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: ScrapeEvent) {
        match event {
            ScrapeEvent::SessionStarted {
                source_id,
                main_url,
            } => scrape_info!("Parse from {main_url} ({source_id})"),
            ScrapeEvent::PageDone {
                source_id,
                page,
                last_page,
                records,
            } => scrape_info!("{source_id}: page {page}/{last_page}, {records} records"),
            ScrapeEvent::SessionFinished {
                source_id,
                pages,
                records,
            } => scrape_info!("{source_id}: done, {pages} pages, {records} records"),
            ScrapeEvent::SessionFailed {
                source_id,
                page,
                reason,
            } => scrape_error!("{source_id}: failed at page {page:?}: {reason}"),
        }
    }
}

enum PageFailure {
    Fetch(FetchError),
    Cancelled,
}

/// Walks every result page of one search on one source.
pub struct PaginationDriver<'a> {
    fetcher: &'a dyn Fetcher,
    settings: DriverSettings,
    progress: &'a dyn ProgressSink,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        settings: DriverSettings,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            fetcher,
            settings,
            progress,
        }
    }

    /// Scrapes all pages for `query`, appending records to `sink` in page
    /// order. The first failing page ends the session; records of earlier
    /// pages stay in the sink.
    pub async fn run<P: SourceParser>(
        &self,
        parser: &P,
        query: &str,
        sink: &mut ResultSink,
    ) -> Result<SessionReport, ScrapeError> {
        let config = parser.config();
        let mut session = SearchSession::new(
            config.main_url.as_str(),
            config.request_template.as_str(),
            query,
            config.first_page_index,
        );
        self.progress.emit(ScrapeEvent::SessionStarted {
            source_id: config.id,
            main_url: config.main_url.clone(),
        });

        let result = self.drive(parser, &mut session, sink).await;
        match &result {
            Ok(report) => self.progress.emit(ScrapeEvent::SessionFinished {
                source_id: report.source_id,
                pages: report.pages,
                records: report.records,
            }),
            Err(err) => self.progress.emit(ScrapeEvent::SessionFailed {
                source_id: err.source_id(),
                page: err.page(),
                reason: err.to_string(),
            }),
        }
        result
    }

    async fn drive<P: SourceParser>(
        &self,
        parser: &P,
        session: &mut SearchSession,
        sink: &mut ResultSink,
    ) -> Result<SessionReport, ScrapeError> {
        let config = parser.config();
        let id = config.id;
        let mut report = SessionReport {
            source_id: id,
            pages: 0,
            records: 0,
        };

        // The first page runs alone: it fixes the page bound for the rest.
        let first = session.first_page_index();
        session.start_fetch(first).map_err(|e| session_error(id, e))?;
        let fetched = if self.settings.cancel.is_cancelled() {
            Err(PageFailure::Cancelled)
        } else {
            load_page(self.fetcher, &config.main_url, &session.page_path(first))
                .await
                .map_err(PageFailure::Fetch)
        };
        let fetched = fetched.map_err(|failure| {
            session.fail(first);
            page_failure(id, first, failure)
        })?;

        let resolve_max = session.max_pages() == MaxPages::Unbounded;
        let (records, max_pages) = self.parse(parser, session, first, &fetched, resolve_max)?;
        session.complete_page(first).map_err(|e| session_error(id, e))?;
        if let Some(max_pages) = max_pages {
            let max = session
                .resolve_max_pages(max_pages)
                .map_err(|e| session_error(id, e))?;
            scrape_debug!("{id}: {max} pages for {:?}", session.query());
        }
        self.append(session, sink, &mut report, first, records);

        // Paths are built lazily: the bound comes from remote markup.
        let paths = session.clone();
        let fetcher = self.fetcher;
        let cancel = &self.settings.cancel;
        let main_url = config.main_url.as_str();
        let mut pages = stream::iter(session.remaining_pages())
            .map(move |page| (page, paths.page_path(page)))
            .map(|(page, path)| async move {
                if cancel.is_cancelled() {
                    return (page, Err(PageFailure::Cancelled));
                }
                let result = load_page(fetcher, main_url, &path)
                    .await
                    .map_err(PageFailure::Fetch);
                (page, result)
            })
            .buffered(self.settings.effective_concurrency());

        // `buffered` yields in page order whatever the completion order.
        while let Some((page, fetched)) = pages.next().await {
            session.start_fetch(page).map_err(|e| session_error(id, e))?;
            let fetched = fetched.map_err(|failure| {
                session.fail(page);
                page_failure(id, page, failure)
            })?;
            let (records, _) = self.parse(parser, session, page, &fetched, false)?;
            session.complete_page(page).map_err(|e| session_error(id, e))?;
            self.append(session, sink, &mut report, page, records);
        }

        Ok(report)
    }

    /// Parses one fetched page. The document never outlives this call.
    fn parse<P: SourceParser>(
        &self,
        parser: &P,
        session: &mut SearchSession,
        page: PageIndex,
        fetched: &FetchedPage,
        resolve_max: bool,
    ) -> Result<(Vec<VacancyRecord>, Option<PageIndex>), ScrapeError> {
        let id = parser.config().id;
        session.start_parse(page).map_err(|e| session_error(id, e))?;
        let doc = ParsedDocument::parse(&fetched.html);
        let records = parser.parse_page(&doc).map_err(|defect| {
            session.fail(page);
            parse_error(id, page, defect)
        })?;
        let max_pages = resolve_max.then(|| parser.compute_max_pages(&doc));
        Ok((records, max_pages))
    }

    fn append(
        &self,
        session: &SearchSession,
        sink: &mut ResultSink,
        report: &mut SessionReport,
        page: PageIndex,
        records: Vec<VacancyRecord>,
    ) {
        let count = records.len();
        sink.extend(records);
        report.pages += 1;
        report.records += count;
        let progress = session.progress();
        self.progress.emit(ScrapeEvent::PageDone {
            source_id: report.source_id,
            page,
            last_page: progress.last_page.unwrap_or(page),
            records: count,
        });
    }
}

fn session_error(source_id: SourceId, error: SessionError) -> ScrapeError {
    ScrapeError::Session { source_id, error }
}

fn parse_error(source_id: SourceId, page: PageIndex, defect: ParseDefect) -> ScrapeError {
    ScrapeError::Parse {
        source_id,
        page,
        defect,
    }
}

fn page_failure(source_id: SourceId, page: PageIndex, failure: PageFailure) -> ScrapeError {
    match failure {
        PageFailure::Fetch(error) => ScrapeError::PageLoad {
            source_id,
            page,
            error,
        },
        PageFailure::Cancelled => ScrapeError::Cancelled { source_id, page },
    }
}
