//! Run configuration.
//!
//! [`Settings`] is the single struct every component reads its parameters
//! from.  The command line ([`Cli`]) is only a way of producing one; the
//! pipeline never sees `clap` types.

use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use clap::Parser;

/// Default registry file name, looked up relative to the working directory.
pub const DEFAULT_REGISTRY_PATH: &str = "fetch.cfg";
/// Default digest file name.
pub const DEFAULT_OUTPUT_PATH: &str = "fetch.out";

const DEFAULT_WINDOW_HOURS: u64 = 24;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONCURRENCY: usize = 4;

/// Everything a single run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Line-oriented `[name] [address]` registry.
    pub registry_path: PathBuf,
    /// Digest file, fully replaced on every run that has sources.
    pub output_path: PathBuf,
    /// Length of the trailing window entries must fall into.
    pub window: TimeDelta,
    /// Upper bound on a single feed fetch.
    pub fetch_timeout: Duration,
    /// Maximum number of fetches in flight at once (at least 1).
    pub concurrency: usize,
    /// Echo entry descriptions to the interactive stream.
    pub show_descriptions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            window: hours(DEFAULT_WINDOW_HOURS),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            show_descriptions: false,
        }
    }
}

fn hours(h: u64) -> TimeDelta {
    i64::try_from(h)
        .ok()
        .and_then(TimeDelta::try_hours)
        .unwrap_or(TimeDelta::MAX)
}

#[derive(Parser, Debug)]
#[command(name = "feed-digest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Write a digest of the last day's entries from a list of feeds", long_about = None)]
pub struct Cli {
    /// Registry of sources, one `[name] [address]` per line
    #[arg(short, long, env = "FEED_DIGEST_REGISTRY", default_value = DEFAULT_REGISTRY_PATH)]
    pub registry: PathBuf,

    /// Digest file to write (replaced on every run)
    #[arg(short, long, env = "FEED_DIGEST_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Trailing window, in hours
    #[arg(long, env = "FEED_DIGEST_WINDOW_HOURS", default_value_t = DEFAULT_WINDOW_HOURS)]
    pub window_hours: u64,

    /// Per-feed fetch timeout, in seconds
    #[arg(long, env = "FEED_DIGEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Maximum number of feeds fetched at the same time
    #[arg(long, env = "FEED_DIGEST_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Also print entry descriptions to the terminal (never written to the digest)
    #[arg(short = 'd', long, env = "FEED_DIGEST_DESCRIPTIONS")]
    pub descriptions: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    pub json: bool,
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Self {
            registry_path: cli.registry.clone(),
            output_path: cli.output.clone(),
            window: hours(cli.window_hours),
            fetch_timeout: Duration::from_secs(cli.timeout_secs),
            concurrency: cli.concurrency.max(1),
            show_descriptions: cli.descriptions,
        }
    }
}
