use scraper::{ElementRef, Html, Selector};

/// Parsed HTML of one search-result page. Built from a fetched page, handed to
/// exactly one parser call and dropped afterwards.
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub fn select_all<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }
}

/// Element text with runs of whitespace collapsed to one space.
pub(crate) fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
