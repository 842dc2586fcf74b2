use scraper::{ElementRef, Selector};
use vacancy_core::{PageIndex, SalaryPattern, VacancyRecord};

use super::{
    compile, warn_skipped_item, ItemSelectors, SourceBuildError, SourceConfig, SourceId,
    SourceParser,
};
use crate::document::ParsedDocument;
use crate::ParseDefect;

pub const MAIN_URL: &str = "https://nn.hh.ru";
const REQUEST_TEMPLATE: &str =
    "/search/vacancy?L_is_autosearch=false&area=113&clusters=true&enable_snippets=true&text={query}&page={page}";

const LISTING: &str = "div.vacancy-serp";
const ITEM: &str = "div.vacancy-serp-item";
const TITLE: &str = r#"a[data-qa="vacancy-serp__vacancy-title"]"#;
const EMPLOYER: &str = "div.vacancy-serp-item__meta-info a";
const SALARY: &str = r#"div[data-qa="vacancy-serp__vacancy-compensation"]"#;
const PAGER: &str = r#"a.bloko-button[data-qa="pager-page"], a.HH-Pager-Control[data-qa="pager-page"]"#;

/// hh.ru: zero-based `page` parameter; the pager links carry the zero-based
/// index in `data-page`.
pub struct HeadHunter {
    config: SourceConfig,
    listing: Selector,
    item: Selector,
    fields: ItemSelectors,
    pager: Selector,
}

impl HeadHunter {
    pub fn new() -> Result<Self, SourceBuildError> {
        Self::with_main_url(MAIN_URL)
    }

    /// Same markup rules against another host, e.g. a mirror or a test server.
    pub fn with_main_url(main_url: &str) -> Result<Self, SourceBuildError> {
        let salary = SalaryPattern::new(&["от"], &["-", "–", "до"], &[])?;
        Ok(Self {
            config: SourceConfig::new(SourceId::HeadHunter, main_url, REQUEST_TEMPLATE, 0, salary)?,
            listing: compile(LISTING)?,
            item: compile(ITEM)?,
            fields: ItemSelectors::new(TITLE, EMPLOYER, SALARY)?,
            pager: compile(PAGER)?,
        })
    }
}

impl SourceParser for HeadHunter {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn parse_page(&self, doc: &ParsedDocument) -> Result<Vec<VacancyRecord>, ParseDefect> {
        let block = doc
            .select_first(&self.listing)
            .ok_or(ParseDefect::MissingListing { selector: LISTING })?;

        // Only direct children: nested blocks hold promoted duplicates.
        let items = block
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| self.item.matches(child));

        let mut records = Vec::new();
        for (position, item) in items.enumerate() {
            match self.fields.record(&self.config, item) {
                Some(record) => records.push(record),
                None => warn_skipped_item(&self.config, position),
            }
        }
        Ok(records)
    }

    fn compute_max_pages(&self, doc: &ParsedDocument) -> PageIndex {
        doc.select_all(&self.pager)
            .filter_map(|link| link.value().attr("data-page"))
            .filter_map(|index| index.trim().parse::<PageIndex>().ok())
            .max()
            .map(|last| last.saturating_add(1))
            .unwrap_or(0)
            .max(self.config.single_page_bound())
    }
}
