#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vacancy_engine::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, ProgressSink, ScrapeEvent,
};

pub fn init_logging() {
    scrape_logging::initialize_for_tests();
}

/// Serves canned pages by absolute URL and records every request.
#[derive(Default)]
pub struct InMemoryFetcher {
    pages: HashMap<String, Result<String, u16>>,
    requested: Mutex<Vec<String>>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Ok(html.into()));
        self
    }

    pub fn status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.pages.insert(url.into(), Err(status));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for InMemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(html)) => Ok(FetchOutput {
                bytes: html.as_bytes().to_vec(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    redirect_count: 0,
                    content_type: Some("text/html; charset=utf-8".to_string()),
                    byte_len: html.len() as u64,
                },
            }),
            Some(Err(status)) => Err(FetchError {
                kind: FailureKind::HttpStatus(*status),
                message: format!("status {status}"),
            }),
            None => Err(FetchError {
                kind: FailureKind::HttpStatus(404),
                message: "not found".to_string(),
            }),
        }
    }
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<ScrapeEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ScrapeEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ScrapeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub const HH_PAGE: &str = r#"<html><body>
<div class="vacancy-serp">
  <div class="vacancy-serp-item">
    <a data-qa="vacancy-serp__vacancy-title" href="https://nn.hh.ru/vacancy/1">Rust   developer</a>
    <div data-qa="vacancy-serp__vacancy-compensation">от 150&nbsp;000 руб.</div>
    <div class="vacancy-serp-item__meta-info"><a href="/employer/10">ООО Ромашка</a></div>
  </div>
  <div class="vacancy-serp-item">
    <a data-qa="vacancy-serp__vacancy-title" href="/vacancy/2">Backend engineer</a>
  </div>
  <div class="vacancy-serp-item"><span>no title here</span></div>
  <div class="wrapper">
    <div class="vacancy-serp-item">
      <a data-qa="vacancy-serp__vacancy-title" href="/vacancy/3">Nested promo</a>
    </div>
  </div>
</div>
<div class="pager">
  <a class="bloko-button HH-Pager-Control" data-qa="pager-page" data-page="0">1</a>
  <a class="bloko-button HH-Pager-Control" data-qa="pager-page" data-page="1">2</a>
  <a class="bloko-button HH-Pager-Control" data-qa="pager-page" data-page="4">5</a>
</div>
</body></html>"#;

pub const SJ_PAGE: &str = r#"<html><body>
<div class="_1ID8B">
  <div class="f-test-vacancy-item">
    <a class="_1QIBo" href="/vakansii/rust-1.html">Rust-разработчик</a>
    <span class="f-test-text-company-item-salary">50&nbsp;000&nbsp;—&nbsp;70&nbsp;000&nbsp;₽</span>
    <a class="icMQ_ _205Zx" target="_self" href="/clients/acme-1.html">ACME</a>
  </div>
  <div class="f-test-vacancy-item">
    <a class="_1QIBo" href="/vakansii/go-2.html">Go-разработчик</a>
    <span class="f-test-text-company-item-salary">По договорённости</span>
  </div>
</div>
<div class="L1p51">
  <span class="_3IDf-">1</span><span class="_3IDf-">2</span><span class="_3IDf-">3</span><span class="_3IDf-">Дальше</span>
</div>
</body></html>"#;

/// A results page without any pagination control.
pub fn hh_single_item_page(title: &str) -> String {
    format!(
        r#"<html><body><div class="vacancy-serp">
  <div class="vacancy-serp-item">
    <a data-qa="vacancy-serp__vacancy-title" href="/vacancy/{title}">{title}</a>
  </div>
</div></body></html>"#
    )
}

pub const NO_LISTING_PAGE: &str = "<html><body><p>Please solve the captcha</p></body></html>";
