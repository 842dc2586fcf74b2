use std::io::{self, Write};

use vacancy_engine::{LogProgressSink, ProgressSink, ScrapeEvent};

/// Keeps a one-line page counter on stderr and forwards every event to the log.
#[derive(Debug, Default)]
pub struct TerminalProgress {
    log: LogProgressSink,
}

impl ProgressSink for TerminalProgress {
    fn emit(&self, event: ScrapeEvent) {
        let mut stderr = io::stderr().lock();
        match &event {
            ScrapeEvent::PageDone {
                source_id,
                page,
                last_page,
                ..
            } => {
                let _ = write!(stderr, "\r{source_id}: page {page}/{last_page}");
                let _ = stderr.flush();
            }
            ScrapeEvent::SessionFinished { .. } | ScrapeEvent::SessionFailed { .. } => {
                let _ = writeln!(stderr);
            }
            ScrapeEvent::SessionStarted { .. } => {}
        }
        drop(stderr);
        self.log.emit(event);
    }
}
