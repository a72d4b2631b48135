//! feed-digest: a digest of the last day's entries from a list of feeds.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌─────────────┐  Source   ┌──────────────┐  Feed   ┌────────────┐
//! │ registry.rs │ ────────► │  source/     │ ──────► │ window.rs  │
//! │ (fetch.cfg) │           │ (HTTP + XML) │         │ (24h, incl)│
//! └─────────────┘           └──────────────┘         └────────────┘
//!                                                          │
//!                     ┌──────────────┬─────────────────────┘
//!                     ▼              ▼
//!              ┌──────────────┐ ┌─────────┐   Section   ┌───────────┐
//!              │ normalize.rs │ │ link.rs │ ──────────► │ digest.rs │
//!              └──────────────┘ └─────────┘             └───────────┘
//! ```
//!
//! * **`registry`** — parses `[name] [address]` lines into sources.
//! * **`source/`** — the `FeedRetriever` trait and the HTTP implementation
//!   (RSS 2.0 and Atom).
//! * **`window`** — keeps entries from the trailing window.
//! * **`normalize`** — repairs mis-decoded titles and composes them to NFC.
//! * **`link`** — strips query strings from entry links.
//! * **`digest`** — writes sections to the digest file and the terminal.
//! * **`pipeline`** — wires the above together for one run.
//! * **`main`** — parses arguments, sets up logging, and runs the pipeline.

mod config;
mod digest;
mod error;
mod link;
mod normalize;
mod pipeline;
mod registry;
mod source;
mod telemetry;
mod window;

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use config::{Cli, Settings};
use source::HttpRetriever;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    telemetry::init_tracing(cli.json, level);

    let settings = Settings::from(&cli);
    let retriever =
        HttpRetriever::new(settings.fetch_timeout).context("failed to build HTTP client")?;

    let mut stdout = io::stdout();
    let styled = stdout.is_terminal();
    pipeline::run(&settings, &retriever, &mut stdout, styled).await?;

    Ok(())
}
