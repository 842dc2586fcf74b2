mod common;

use common::{init_logging, InMemoryFetcher, TestSink};
use pretty_assertions::assert_eq;
use scraper::Selector;
use vacancy_core::{Employer, PageIndex, ResultSink, Salary, SalaryPattern, VacancyLink, VacancyRecord};
use vacancy_engine::{
    CancellationToken, DriverSettings, FailureKind, PaginationDriver, ParseDefect,
    ParsedDocument, ScrapeError, ScrapeEvent, SourceConfig, SourceId, SourceParser,
};

const MAIN_URL: &str = "https://jobs.test";

/// Lists `<li><a href>` items and reports a fixed page bound.
struct ListSource {
    config: SourceConfig,
    max_pages: PageIndex,
    items: Selector,
}

impl ListSource {
    fn new(first_page_index: PageIndex, max_pages: PageIndex) -> Self {
        let salary = SalaryPattern::new(&["от"], &["-"], &[]).unwrap();
        Self {
            config: SourceConfig::new(
                SourceId::HeadHunter,
                MAIN_URL,
                "/search?text={query}&page={page}",
                first_page_index,
                salary,
            )
            .unwrap(),
            max_pages,
            items: Selector::parse("ul.results li a").unwrap(),
        }
    }
}

impl SourceParser for ListSource {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn parse_page(&self, doc: &ParsedDocument) -> Result<Vec<VacancyRecord>, ParseDefect> {
        let list = Selector::parse("ul.results").unwrap();
        if doc.select_first(&list).is_none() {
            return Err(ParseDefect::MissingListing {
                selector: "ul.results",
            });
        }
        Ok(doc
            .select_all(&self.items)
            .map(|a| {
                VacancyRecord::new(
                    VacancyLink {
                        name: a.text().collect(),
                        link: self.config.resolve_link(a.value().attr("href").unwrap()).unwrap(),
                    },
                    Salary::undisclosed(),
                    Employer::default(),
                    self.config.main_url.clone(),
                )
            })
            .collect())
    }

    fn compute_max_pages(&self, _doc: &ParsedDocument) -> PageIndex {
        self.max_pages
    }
}

fn url(query: &str, page: PageIndex) -> String {
    format!("{MAIN_URL}/search?text={query}&page={page}")
}

fn list_page(page: PageIndex) -> String {
    format!(r#"<ul class="results"><li><a href="/v/{page}">job {page}</a></li></ul>"#)
}

fn fetcher_with_pages(pages: impl IntoIterator<Item = PageIndex>) -> InMemoryFetcher {
    pages
        .into_iter()
        .fold(InMemoryFetcher::new(), |f, page| f.page(url("rust", page), list_page(page)))
}

fn names(sink: &ResultSink) -> Vec<String> {
    sink.records().iter().map(|r| r.vacancy.name.clone()).collect()
}

#[tokio::test]
async fn visits_each_page_once_in_order_and_stops_at_bound() {
    init_logging();
    let fetcher = fetcher_with_pages(0..=5);
    let progress = TestSink::new();
    let driver = PaginationDriver::new(&fetcher, DriverSettings::default(), &progress);
    let mut sink = ResultSink::new();

    let report = driver
        .run(&ListSource::new(0, 5), "rust", &mut sink)
        .await
        .unwrap();

    let expected: Vec<_> = (0..5).map(|p| url("rust", p)).collect();
    assert_eq!(fetcher.requested(), expected);
    assert_eq!(names(&sink), vec!["job 0", "job 1", "job 2", "job 3", "job 4"]);
    assert_eq!(report.pages, 5);
    assert_eq!(report.records, 5);

    let pages: Vec<_> = progress
        .take()
        .into_iter()
        .filter_map(|event| match event {
            ScrapeEvent::PageDone {
                page, last_page, ..
            } => Some((page, last_page)),
            _ => None,
        })
        .collect();
    assert_eq!(pages, vec![(0, 4), (1, 4), (2, 4), (3, 4), (4, 4)]);
}

#[tokio::test]
async fn no_pagination_means_one_fetch() {
    init_logging();
    let fetcher = fetcher_with_pages(0..3);
    let progress = TestSink::new();
    let driver = PaginationDriver::new(&fetcher, DriverSettings::default(), &progress);
    let mut sink = ResultSink::new();

    // A parser that finds no pager reports the bare minimum bound.
    let report = driver
        .run(&ListSource::new(0, 0), "rust", &mut sink)
        .await
        .unwrap();

    assert_eq!(fetcher.requested(), vec![url("rust", 0)]);
    assert_eq!(report.pages, 1);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn one_based_source_starts_at_page_one() {
    init_logging();
    let fetcher = fetcher_with_pages(0..4);
    let progress = TestSink::new();
    let driver = PaginationDriver::new(&fetcher, DriverSettings::default(), &progress);
    let mut sink = ResultSink::new();

    driver
        .run(&ListSource::new(1, 3), "rust", &mut sink)
        .await
        .unwrap();

    assert_eq!(fetcher.requested(), vec![url("rust", 1), url("rust", 2)]);
}

#[tokio::test]
async fn concurrent_pages_are_appended_in_page_order() {
    init_logging();
    let fetcher = fetcher_with_pages(0..8);
    let progress = TestSink::new();
    let settings = DriverSettings {
        concurrency: 3,
        ..DriverSettings::default()
    };
    let driver = PaginationDriver::new(&fetcher, settings, &progress);
    let mut sink = ResultSink::new();

    driver
        .run(&ListSource::new(0, 8), "rust", &mut sink)
        .await
        .unwrap();

    let expected: Vec<_> = (0..8).map(|p| format!("job {p}")).collect();
    assert_eq!(names(&sink), expected);
    // The first page always goes out alone, before any other.
    assert_eq!(fetcher.requested()[0], url("rust", 0));
    let mut requested = fetcher.requested();
    requested.sort();
    let mut all: Vec<_> = (0..8).map(|p| url("rust", p)).collect();
    all.sort();
    assert_eq!(requested, all);
}

#[tokio::test]
async fn failed_page_aborts_session_and_keeps_earlier_records() {
    init_logging();
    let fetcher = fetcher_with_pages([0, 1, 3]).status(url("rust", 2), 503);
    let progress = TestSink::new();
    let driver = PaginationDriver::new(&fetcher, DriverSettings::default(), &progress);
    let mut sink = ResultSink::new();

    let err = driver
        .run(&ListSource::new(0, 4), "rust", &mut sink)
        .await
        .unwrap_err();

    match err {
        ScrapeError::PageLoad { page, error, .. } => {
            assert_eq!(page, 2);
            assert_eq!(error.kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(names(&sink), vec!["job 0", "job 1"]);
    assert!(!fetcher.requested().contains(&url("rust", 3)));

    let failed = progress.take().into_iter().any(|event| {
        matches!(
            event,
            ScrapeEvent::SessionFailed {
                page: Some(2),
                ..
            }
        )
    });
    assert!(failed);
}

#[tokio::test]
async fn failed_first_page_appends_nothing() {
    init_logging();
    let fetcher = InMemoryFetcher::new().status(url("rust", 0), 500);
    let progress = TestSink::new();
    let driver = PaginationDriver::new(&fetcher, DriverSettings::default(), &progress);
    let mut sink = ResultSink::new();

    let err = driver
        .run(&ListSource::new(0, 4), "rust", &mut sink)
        .await
        .unwrap_err();

    assert_eq!(err.page(), Some(0));
    assert!(sink.is_empty());
    assert_eq!(fetcher.requested().len(), 1);
}

#[tokio::test]
async fn missing_listing_on_later_page_is_fatal() {
    init_logging();
    let fetcher = fetcher_with_pages([0, 2]).page(url("rust", 1), "<p>blocked</p>");
    let progress = TestSink::new();
    let driver = PaginationDriver::new(&fetcher, DriverSettings::default(), &progress);
    let mut sink = ResultSink::new();

    let err = driver
        .run(&ListSource::new(0, 3), "rust", &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Parse { page: 1, .. }));
    assert_eq!(names(&sink), vec!["job 0"]);
}

#[tokio::test]
async fn cancelled_token_stops_before_fetching() {
    init_logging();
    let fetcher = fetcher_with_pages(0..3);
    let progress = TestSink::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let settings = DriverSettings {
        concurrency: 1,
        cancel,
    };
    let driver = PaginationDriver::new(&fetcher, settings, &progress);
    let mut sink = ResultSink::new();

    let err = driver
        .run(&ListSource::new(0, 3), "rust", &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Cancelled { page: 0, .. }));
    assert!(fetcher.requested().is_empty());
}

#[tokio::test]
async fn query_is_url_encoded() {
    init_logging();
    let fetcher = InMemoryFetcher::new().page(url("rust+developer", 0), list_page(0));
    let progress = TestSink::new();
    let driver = PaginationDriver::new(&fetcher, DriverSettings::default(), &progress);
    let mut sink = ResultSink::new();

    driver
        .run(&ListSource::new(0, 1), "rust developer", &mut sink)
        .await
        .unwrap();

    assert_eq!(fetcher.requested(), vec![url("rust+developer", 0)]);
}
