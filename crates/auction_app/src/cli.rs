use std::path::PathBuf;

use clap::Parser;

/// Check the forced-auction listings page and notify about new entries.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "auction_watch", version, about)]
pub struct Cli {
    /// Listings page to check (overrides LISTINGS_URL).
    #[arg(long)]
    pub url: Option<String>,

    /// Seen-set file (overrides SEEN_FILE).
    #[arg(long)]
    pub seen_file: Option<PathBuf>,

    /// Report new listings without notifying or updating the seen set.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the persisted seen set and exit.
    #[arg(long)]
    pub show_seen: bool,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write logs to this file (overrides LOG_FILE).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
