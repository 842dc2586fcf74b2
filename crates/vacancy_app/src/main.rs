mod cli;
mod config;
mod logging;
mod progress;

use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use scrape_logging::{scrape_info, scrape_warn};
use vacancy_core::{load_export, salary_above, ResultSink};
use vacancy_engine::{export_results, ScrapeEngine, SourceParser};

use cli::{Args, FindArgs, ScrapeArgs, SubCommand};
use config::AppConfig;
use progress::TerminalProgress;

fn scrape(args: ScrapeArgs) -> anyhow::Result<ExitCode> {
    let term = args.term.trim().to_string();
    if term.is_empty() {
        anyhow::bail!("search term is empty");
    }

    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply(&args);

    let sources = args
        .source_ids()
        .into_iter()
        .map(|id| id.build().with_context(|| format!("building parser for {id}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let engine = ScrapeEngine::new(config.engine_config());
    let mut sink = ResultSink::new();
    let report = engine
        .run_blocking(&term, &sources, &mut sink, &TerminalProgress::default(), true)
        .context("starting async runtime")?;

    for outcome in &report.outcomes {
        if let Ok(session) = &outcome.result {
            scrape_info!(
                "{}: {} pages, {} records",
                session.source_id,
                session.pages,
                session.records
            );
        }
    }
    for skipped in &report.skipped {
        let main_url = sources
            .iter()
            .find(|source| source.config().id == *skipped)
            .map(|source| source.config().main_url.as_str())
            .unwrap_or_default();
        scrape_warn!("{skipped}: skipped ({main_url})");
    }

    // Partial results are exported as well.
    let summary = export_results(&sink, &config.output_dir, &term)
        .with_context(|| format!("exporting results to {:?}", config.output_dir))?;
    println!(
        "Saved {} vacancies to {}",
        summary.record_count,
        summary.output_path.display()
    );

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn find(args: FindArgs) -> anyhow::Result<ExitCode> {
    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {:?}", args.input))?;
    let records =
        load_export(&json).with_context(|| format!("parsing {:?}", args.input))?;
    let matches = salary_above(&records, args.min_salary);

    println!(
        "{} of {} vacancies pay more than {}",
        matches.len(),
        records.len(),
        args.min_salary
    );
    for summary in &matches {
        println!(
            "{:>10}  {}  [{}]  {}",
            summary.salary_min,
            summary.name,
            summary.employer.as_deref().unwrap_or("-"),
            summary.link
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::initialize(args.log, args.verbose);

    match args.cmd {
        SubCommand::Scrape(args) => scrape(args),
        SubCommand::Find(args) => find(args),
    }
}
