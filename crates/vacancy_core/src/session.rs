use std::ops::Range;

use url::form_urlencoded;

/// Page index as used in a source's query string.
pub type PageIndex = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxPages {
    /// Not known until the first page has been parsed.
    Unbounded,
    /// Exclusive upper bound of page indices.
    Known(PageIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Start,
    Fetching(PageIndex),
    Parsing(PageIndex),
    /// Page processed, waiting for the next fetch.
    Parsed(PageIndex),
    Done,
    Failed(PageIndex),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("max pages already resolved to {0}")]
    MaxPagesAlreadyResolved(PageIndex),
    #[error("page {got} visited out of order, expected {expected:?}")]
    OutOfOrder {
        expected: Option<PageIndex>,
        got: PageIndex,
    },
    #[error("session is not parsing page {0}")]
    NotParsing(PageIndex),
}

/// Progress snapshot reported after each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub page: PageIndex,
    /// Highest page index that will be visited, if known.
    pub last_page: Option<PageIndex>,
}

/// State of one paginated scrape of one source for one search term.
#[derive(Debug, Clone)]
pub struct SearchSession {
    main_url: String,
    request_template: String,
    query: String,
    first_page_index: PageIndex,
    current_page: Option<PageIndex>,
    max_pages: MaxPages,
    state: SessionState,
}

impl SearchSession {
    /// `request_template` uses `{query}` and `{page}` placeholders.
    pub fn new(
        main_url: impl Into<String>,
        request_template: impl Into<String>,
        query: impl Into<String>,
        first_page_index: PageIndex,
    ) -> Self {
        Self {
            main_url: main_url.into(),
            request_template: request_template.into(),
            query: query.into(),
            first_page_index,
            current_page: None,
            max_pages: MaxPages::Unbounded,
            state: SessionState::Start,
        }
    }

    pub fn main_url(&self) -> &str {
        &self.main_url
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn first_page_index(&self) -> PageIndex {
        self.first_page_index
    }

    pub fn current_page(&self) -> Option<PageIndex> {
        self.current_page
    }

    pub fn max_pages(&self) -> MaxPages {
        self.max_pages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Request path for `page`, with the query form-urlencoded.
    pub fn page_path(&self, page: PageIndex) -> String {
        let encoded: String = form_urlencoded::byte_serialize(self.query.as_bytes()).collect();
        self.request_template
            .replace("{query}", &encoded)
            .replace("{page}", &page.to_string())
    }

    /// Next page the session expects to fetch, or `None` once the last known
    /// page has been processed.
    pub fn next_page(&self) -> Option<PageIndex> {
        let candidate = match self.current_page {
            None => self.first_page_index,
            Some(page) => page + 1,
        };
        match self.max_pages {
            MaxPages::Unbounded if self.current_page.is_none() => Some(candidate),
            // Only the first page may be fetched before the bound is known.
            MaxPages::Unbounded => None,
            MaxPages::Known(max) if candidate < max => Some(candidate),
            MaxPages::Known(_) => None,
        }
    }

    /// Pages still to visit after the first one. Empty until max pages is known.
    pub fn remaining_pages(&self) -> Range<PageIndex> {
        match (self.max_pages, self.current_page) {
            (MaxPages::Known(max), Some(page)) => (page + 1)..max.max(page + 1),
            _ => 0..0,
        }
    }

    pub fn start_fetch(&mut self, page: PageIndex) -> Result<(), SessionError> {
        let expected = self.next_page();
        if expected != Some(page) {
            return Err(SessionError::OutOfOrder {
                expected,
                got: page,
            });
        }
        self.state = SessionState::Fetching(page);
        Ok(())
    }

    pub fn start_parse(&mut self, page: PageIndex) -> Result<(), SessionError> {
        match self.state {
            SessionState::Fetching(p) if p == page => {
                self.state = SessionState::Parsing(page);
                Ok(())
            }
            _ => Err(SessionError::NotParsing(page)),
        }
    }

    /// Marks `page` as fully processed and returns the progress to report.
    pub fn complete_page(&mut self, page: PageIndex) -> Result<SessionProgress, SessionError> {
        if self.state != SessionState::Parsing(page) {
            return Err(SessionError::NotParsing(page));
        }
        self.current_page = Some(page);
        self.state = if self.next_page().is_none() && self.max_pages != MaxPages::Unbounded {
            SessionState::Done
        } else {
            SessionState::Parsed(page)
        };
        Ok(self.progress())
    }

    /// Write-once resolution of the page bound. The result is clamped so at
    /// least the first page is covered.
    pub fn resolve_max_pages(&mut self, max_pages: PageIndex) -> Result<PageIndex, SessionError> {
        if let MaxPages::Known(existing) = self.max_pages {
            return Err(SessionError::MaxPagesAlreadyResolved(existing));
        }
        let max = max_pages.max(self.first_page_index + 1);
        self.max_pages = MaxPages::Known(max);
        if self.next_page().is_none() {
            self.state = SessionState::Done;
        }
        Ok(max)
    }

    pub fn fail(&mut self, page: PageIndex) {
        self.state = SessionState::Failed(page);
    }

    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    pub fn progress(&self) -> SessionProgress {
        let last_page = match self.max_pages {
            MaxPages::Known(max) => Some(max - 1),
            MaxPages::Unbounded => None,
        };
        SessionProgress {
            page: self.current_page.unwrap_or(self.first_page_index),
            last_page,
        }
    }
}
