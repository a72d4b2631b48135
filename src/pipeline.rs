//! The per-run pipeline.
//!
//! ```text
//! registry ──► fetch (bounded concurrency, per-fetch timeout)
//!                 │   results consumed in registry order
//!                 ▼
//!              window filter ──► normalize title + strip query ──► dedupe
//!                 │
//!                 ▼
//!              digest emitter ──► digest file + interactive stream
//! ```
//!
//! Sources are independent: a failed or timed-out fetch becomes that
//! source's "no feed content" sentinel and nothing else.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::digest::{DigestEmitter, NormalizedEntry, Section};
use crate::error::FetchError;
use crate::link::strip_query;
use crate::normalize::normalize_text;
use crate::registry::{Source, SourceRegistry};
use crate::source::{Feed, FeedRetriever, RawEntry};
use crate::window::Window;

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Sources in the registry.
    pub sources: usize,
    /// Sources whose fetch failed or timed out.
    pub failed: usize,
    /// Entry lines written to the digest.
    pub entries: usize,
}

/// Run the pipeline with the current time as the window end.
///
/// `out` receives the human-readable progress; `styled` colours it.
pub async fn run<R, S>(
    settings: &Settings,
    retriever: &R,
    out: &mut S,
    styled: bool,
) -> Result<RunSummary>
where
    R: FeedRetriever + ?Sized,
    S: Write,
{
    run_at(settings, retriever, out, styled, Utc::now()).await
}

/// Run the pipeline with `now` as the single clock sample for the run.
pub async fn run_at<R, S>(
    settings: &Settings,
    retriever: &R,
    out: &mut S,
    styled: bool,
    now: DateTime<Utc>,
) -> Result<RunSummary>
where
    R: FeedRetriever + ?Sized,
    S: Write,
{
    let registry = SourceRegistry::load(&settings.registry_path)?;
    if registry.is_empty() {
        info!("registry has no sources, nothing to do");
        writeln!(out, "No feeds to process.").context("failed to write to stdout")?;
        return Ok(RunSummary::default());
    }

    let window = Window::ending_at(now, settings.window);
    debug!(start = %window.start(), sources = registry.len(), "window computed");

    let file = File::create(&settings.output_path).with_context(|| {
        format!("failed to create digest {}", settings.output_path.display())
    })?;
    let mut emitter = DigestEmitter::new(BufWriter::new(file), &settings.output_path, out)
        .styled(styled)
        .show_descriptions(settings.show_descriptions);

    let mut summary = RunSummary {
        sources: registry.len(),
        ..RunSummary::default()
    };

    // `buffered` runs up to `concurrency` fetches at once but yields them in
    // registry order, so sections never reorder.
    let mut fetches = stream::iter(registry.iter())
        .map(|source| fetch_source(retriever, source, settings.fetch_timeout))
        .buffered(settings.concurrency.max(1));

    while let Some((source, outcome)) = fetches.next().await {
        emitter.announce(source)?;

        let section = match outcome {
            Ok(feed) => {
                debug!(name = %source.name, title = %feed.title, entries = feed.entries.len(), "feed parsed");
                build_section(feed, &window)
            }
            Err(e) => {
                warn!(name = %source.name, address = %source.address, error = %e, "fetch failed");
                summary.failed += 1;
                Section::FetchFailed
            }
        };

        summary.entries += emitter.emit(&source.name, &section)?;
    }

    emitter.finish()?;

    info!(
        sources = summary.sources,
        failed = summary.failed,
        entries = summary.entries,
        path = %settings.output_path.display(),
        "digest written"
    );
    Ok(summary)
}

async fn fetch_source<'a, R>(
    retriever: &R,
    source: &'a Source,
    timeout: Duration,
) -> (&'a Source, Result<Feed, FetchError>)
where
    R: FeedRetriever + ?Sized,
{
    let outcome = match tokio::time::timeout(timeout, retriever.retrieve(&source.address)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    };
    (source, outcome)
}

/// Filter, normalize and deduplicate one feed's entries.
pub fn build_section(feed: Feed, window: &Window) -> Section {
    let mut seen = HashSet::new();

    let entries = window
        .filter(feed.entries)
        .into_iter()
        .map(normalize_entry)
        .filter(|e| e.link.is_empty() || seen.insert(e.link.clone()))
        .collect();

    Section::from_entries(entries)
}

fn normalize_entry(entry: RawEntry) -> NormalizedEntry {
    NormalizedEntry {
        title: normalize_text(&entry.title),
        link: strip_query(&entry.link),
        description: entry.description,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
