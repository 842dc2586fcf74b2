use std::path::PathBuf;

use clap::Parser;
use vacancy_engine::SourceId;

use crate::config::ErrorPolicy;
use crate::logging::LogDestination;

/// Collects job vacancies from hh.ru and superjob.ru into a JSON file
#[derive(Debug, Parser)]
#[command(name = "vacancy_scout", version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: SubCommand,
    /// Where log lines go
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal, global = true)]
    pub log: LogDestination,
    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    Scrape(ScrapeArgs),
    Find(FindArgs),
}

/// Search every selected board and export all results
#[derive(Debug, clap::Args)]
pub struct ScrapeArgs {
    /// Search term, e.g. "rust developer"
    pub term: String,
    /// Boards to search (hh, sj); all of them when omitted
    #[arg(long = "source", short, value_delimiter = ',')]
    pub sources: Vec<SourceId>,
    /// Optional RON configuration file; defaults to ./vacancy_scout.ron when present
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the export directory
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,
    /// Override how many pages of one board are fetched at once
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Override the per-request timeout
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Override the user agent sent to the boards
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Override what happens to the remaining boards after one fails
    #[arg(long, value_enum)]
    pub on_error: Option<ErrorPolicy>,
}

impl ScrapeArgs {
    /// Requested sources in command-line order without repeats.
    pub fn source_ids(&self) -> Vec<SourceId> {
        if self.sources.is_empty() {
            return SourceId::ALL.to_vec();
        }
        let mut ids = Vec::new();
        for id in &self.sources {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }
}

/// List vacancies of an exported file paying more than a threshold
#[derive(Debug, clap::Args)]
pub struct FindArgs {
    /// File written by `scrape`
    #[arg(long, short)]
    pub input: PathBuf,
    /// Minimum salary, exclusive
    #[arg(long)]
    pub min_salary: u64,
}
