//! Per-site parsers.
//!
//! Every site implements [`SourceParser`]; [`SourceId`] names the known sites
//! and [`AnySource`] lets a caller pick one at runtime while the pagination
//! driver stays generic over the concrete parser.

mod headhunter;
mod superjob;

use std::fmt;
use std::str::FromStr;

use scrape_logging::scrape_warn;
use scraper::{ElementRef, Selector};
use url::Url;
use vacancy_core::{Employer, PageIndex, SalaryPattern, VacancyLink, VacancyRecord};

use crate::document::{collapsed_text, ParsedDocument};
use crate::ParseDefect;

pub use headhunter::HeadHunter;
pub use superjob::SuperJob;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    HeadHunter,
    SuperJob,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::HeadHunter, SourceId::SuperJob];

    pub fn build(self) -> Result<AnySource, SourceBuildError> {
        Ok(match self {
            SourceId::HeadHunter => AnySource::HeadHunter(HeadHunter::new()?),
            SourceId::SuperJob => AnySource::SuperJob(SuperJob::new()?),
        })
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::HeadHunter => write!(f, "headhunter"),
            SourceId::SuperJob => write!(f, "superjob"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source {0:?} (expected one of: hh, headhunter, sj, superjob)")]
pub struct UnknownSource(pub String);

impl FromStr for SourceId {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hh" | "headhunter" | "hh.ru" => Ok(SourceId::HeadHunter),
            "sj" | "superjob" | "superjob.ru" => Ok(SourceId::SuperJob),
            _ => Err(UnknownSource(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceBuildError {
    #[error("invalid selector {css:?}: {message}")]
    Selector { css: &'static str, message: String },
    #[error("invalid salary pattern: {0}")]
    SalaryPattern(#[from] regex::Error),
    #[error("invalid main url {url:?}: {error}")]
    MainUrl {
        url: String,
        #[source]
        error: url::ParseError,
    },
}

/// Static description of one site.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub id: SourceId,
    /// Base URL without a trailing slash; also the `source` of every record.
    pub main_url: String,
    /// Path and query with `{query}` and `{page}` placeholders.
    pub request_template: String,
    pub first_page_index: PageIndex,
    pub salary: SalaryPattern,
    base: Url,
}

impl SourceConfig {
    pub fn new(
        id: SourceId,
        main_url: &str,
        request_template: &str,
        first_page_index: PageIndex,
        salary: SalaryPattern,
    ) -> Result<Self, SourceBuildError> {
        let main_url = main_url.trim_end_matches('/').to_string();
        let base = Url::parse(&main_url).map_err(|error| SourceBuildError::MainUrl {
            url: main_url.clone(),
            error,
        })?;
        Ok(Self {
            id,
            main_url,
            request_template: request_template.to_string(),
            first_page_index,
            salary,
            base,
        })
    }

    /// Absolute form of a link found in the page.
    pub fn resolve_link(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        self.base.join(href).ok().map(String::from)
    }

    /// Smallest exclusive page bound: the first page alone.
    pub fn single_page_bound(&self) -> PageIndex {
        self.first_page_index + 1
    }
}

/// Extraction logic of one site.
pub trait SourceParser: Send + Sync {
    fn config(&self) -> &SourceConfig;

    /// Records of every listing item on the page, in page order. Items without
    /// a title or link are skipped; a missing listing container fails the page.
    fn parse_page(&self, doc: &ParsedDocument) -> Result<Vec<VacancyRecord>, ParseDefect>;

    /// Exclusive upper bound of page indices for the current search, read from
    /// the pagination control. Never below `first_page_index + 1`.
    fn compute_max_pages(&self, doc: &ParsedDocument) -> PageIndex;
}

/// Runtime choice among the known sites.
pub enum AnySource {
    HeadHunter(HeadHunter),
    SuperJob(SuperJob),
}

impl SourceParser for AnySource {
    fn config(&self) -> &SourceConfig {
        match self {
            AnySource::HeadHunter(source) => source.config(),
            AnySource::SuperJob(source) => source.config(),
        }
    }

    fn parse_page(&self, doc: &ParsedDocument) -> Result<Vec<VacancyRecord>, ParseDefect> {
        match self {
            AnySource::HeadHunter(source) => source.parse_page(doc),
            AnySource::SuperJob(source) => source.parse_page(doc),
        }
    }

    fn compute_max_pages(&self, doc: &ParsedDocument) -> PageIndex {
        match self {
            AnySource::HeadHunter(source) => source.compute_max_pages(doc),
            AnySource::SuperJob(source) => source.compute_max_pages(doc),
        }
    }
}

pub(crate) fn compile(css: &'static str) -> Result<Selector, SourceBuildError> {
    Selector::parse(css).map_err(|err| SourceBuildError::Selector {
        css,
        message: err.to_string(),
    })
}

/// Selectors for the fields of one listing item.
pub(crate) struct ItemSelectors {
    title: Selector,
    employer: Selector,
    salary: Selector,
}

impl ItemSelectors {
    pub(crate) fn new(
        title: &'static str,
        employer: &'static str,
        salary: &'static str,
    ) -> Result<Self, SourceBuildError> {
        Ok(Self {
            title: compile(title)?,
            employer: compile(employer)?,
            salary: compile(salary)?,
        })
    }

    /// Record for one item, or `None` when the markup lacks a title or link.
    /// Employer and salary are optional.
    pub(crate) fn record(&self, config: &SourceConfig, item: ElementRef<'_>) -> Option<VacancyRecord> {
        let anchor = item.select(&self.title).next()?;
        let name = collapsed_text(anchor);
        let link = anchor
            .value()
            .attr("href")
            .and_then(|href| config.resolve_link(href))?;
        if name.is_empty() {
            return None;
        }

        let employer = item
            .select(&self.employer)
            .next()
            .map(|anchor| Employer {
                name: Some(collapsed_text(anchor)).filter(|n| !n.is_empty()),
                link: anchor
                    .value()
                    .attr("href")
                    .and_then(|href| config.resolve_link(href)),
            })
            .unwrap_or_default();

        let salary = item
            .select(&self.salary)
            .next()
            .map(|node| config.salary.extract(&collapsed_text(node)))
            .unwrap_or_default();

        Some(VacancyRecord::new(
            VacancyLink { name, link },
            salary,
            employer,
            config.main_url.clone(),
        ))
    }
}

pub(crate) fn warn_skipped_item(config: &SourceConfig, position: usize) {
    scrape_warn!(
        "{}: listing item #{} has no title link, skipped",
        config.id,
        position
    );
}
