use scraper::Selector;
use vacancy_core::{PageIndex, SalaryPattern, VacancyRecord};

use super::{
    compile, warn_skipped_item, ItemSelectors, SourceBuildError, SourceConfig, SourceId,
    SourceParser,
};
use crate::document::{collapsed_text, ParsedDocument};
use crate::ParseDefect;

pub const MAIN_URL: &str = "https://nn.superjob.ru";
const REQUEST_TEMPLATE: &str = "/vacancy/search/?keywords={query}&geo%5Bc%5D%5B0%5D=1&page={page}";

const LISTING: &str = "div._1ID8B";
const ITEM: &str = "div.f-test-vacancy-item";
const TITLE: &str = "a._1QIBo";
const EMPLOYER: &str = r#"a.icMQ_[target="_self"], a._205Zx[target="_self"], a._25-u7[target="_self"]"#;
const SALARY: &str = "span.f-test-text-company-item-salary";
const PAGER: &str = "div.L1p51 span._3IDf-";

/// superjob.ru: one-based `page` parameter; the pager shows one-based page
/// labels followed by a "next" button.
pub struct SuperJob {
    config: SourceConfig,
    listing: Selector,
    item: Selector,
    fields: ItemSelectors,
    pager: Selector,
}

impl SuperJob {
    pub fn new() -> Result<Self, SourceBuildError> {
        Self::with_main_url(MAIN_URL)
    }

    /// Same markup rules against another host, e.g. a mirror or a test server.
    pub fn with_main_url(main_url: &str) -> Result<Self, SourceBuildError> {
        let salary = SalaryPattern::new(
            &["от"],
            &["-", "—", "до"],
            &["По договорённости", "По договоренности"],
        )?;
        Ok(Self {
            config: SourceConfig::new(SourceId::SuperJob, main_url, REQUEST_TEMPLATE, 1, salary)?,
            listing: compile(LISTING)?,
            item: compile(ITEM)?,
            fields: ItemSelectors::new(TITLE, EMPLOYER, SALARY)?,
            pager: compile(PAGER)?,
        })
    }
}

impl SourceParser for SuperJob {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn parse_page(&self, doc: &ParsedDocument) -> Result<Vec<VacancyRecord>, ParseDefect> {
        let block = doc
            .select_first(&self.listing)
            .ok_or(ParseDefect::MissingListing { selector: LISTING })?;

        let mut records = Vec::new();
        for (position, item) in block.select(&self.item).enumerate() {
            match self.fields.record(&self.config, item) {
                Some(record) => records.push(record),
                None => warn_skipped_item(&self.config, position),
            }
        }
        Ok(records)
    }

    fn compute_max_pages(&self, doc: &ParsedDocument) -> PageIndex {
        // Labels are one-based like the query parameter; non-numeric labels
        // ("Дальше", "...") are ignored.
        doc.select_all(&self.pager)
            .filter_map(|label| collapsed_text(label).parse::<PageIndex>().ok())
            .max()
            .map(|last| last.saturating_add(1))
            .unwrap_or(0)
            .max(self.config.single_page_bound())
    }
}
