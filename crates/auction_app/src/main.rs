mod cli;
mod config;

use std::process::ExitCode;

use anyhow::{Context, Result};
use auction_core::current_ids_line;
use auction_engine::{
    build_notifiers, ListingExtractor, Pipeline, ReqwestFetcher, RunOptions, SeenStore,
    SeenStoreError,
};
use auction_logging::{auction_error, auction_info, LogDestination};
use clap::Parser;
use log::LevelFilter;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            auction_error!("{:#}", err);
            eprintln!("auction_watch: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env().context("configuration stage failed")?;
    config.apply_cli(&cli);

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    auction_logging::initialize(
        LogDestination::terminal_with_optional_file(config.log_file.as_deref()),
        level,
    );
    config.report_warnings();

    let store = SeenStore::new(&config.seen_file);
    if cli.show_seen {
        return show_seen(&store);
    }

    let notifiers = build_notifiers(&config.notify_settings());
    auction_info!("{} notification channel(s) configured", notifiers.len());

    let pipeline = Pipeline::new(
        Box::new(ReqwestFetcher::new(config.fetch_settings())),
        ListingExtractor::new(config.base_url.clone()),
        store,
        notifiers,
    );
    let report = pipeline
        .run(&config.listings_url, RunOptions { dry_run: cli.dry_run })
        .await?;

    for listing in &report.new_listings {
        println!("NEW: {listing}");
    }
    println!("{}", current_ids_line(&report.current));
    Ok(())
}

fn show_seen(store: &SeenStore) -> Result<()> {
    for line in seen_lines(store)? {
        println!("{line}");
    }
    Ok(())
}

/// One `id<TAB>title<TAB>url` line per record. A store that was never
/// written has no lines.
fn seen_lines(store: &SeenStore) -> Result<Vec<String>> {
    let records = match store.load_records() {
        Ok(records) => records,
        Err(SeenStoreError::Missing(path)) => {
            auction_info!("No seen store at {:?}; nothing has been seen yet", path);
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading seen store {:?}", store.path()));
        }
    };
    Ok(records
        .iter()
        .map(|record| {
            format!(
                "{}\t{}\t{}",
                record.id,
                record.title.as_deref().unwrap_or("-"),
                record.url.as_deref().unwrap_or("-")
            )
        })
        .collect())
}
