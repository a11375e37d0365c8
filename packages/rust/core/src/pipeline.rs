//! End-to-end sweep: archive → fetch → detect → record.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, instrument};

use pastewatch_crawler::PasteFetcher;
use pastewatch_discovery::ArchiveScraper;
use pastewatch_shared::{MatchRecord, PasteId, Result, SweepConfig};
use pastewatch_storage::MatchStore;

use crate::keywords::KeywordSet;

/// Counters for one completed sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Paste IDs taken from the archive.
    pub pastes_discovered: usize,
    /// Pastes whose non-empty body was fetched and scanned.
    pub pastes_fetched: usize,
    /// Pastes skipped because the fetch failed.
    pub fetch_failures: usize,
    /// Pastes that came back with an empty body and were not scanned.
    pub empty_pastes: usize,
    /// Pastes with at least one keyword hit.
    pub pastes_matched: usize,
    /// Records appended to the match file.
    pub records_written: usize,
    /// Matches whose append failed; these are not retried.
    pub records_lost: usize,
    /// Wall-clock duration of the sweep.
    pub elapsed: Duration,
}

/// Progress callback for reporting sweep status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each paste is fetched.
    fn paste_started(&self, id: &PasteId, current: usize, total: usize);
    /// Called when the sweep completes.
    fn done(&self, summary: &SweepSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn paste_started(&self, _id: &PasteId, _current: usize, _total: usize) {}
    fn done(&self, _summary: &SweepSummary) {}
}

/// What happened to a single paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasteOutcome {
    FetchFailed,
    Empty,
    NoMatch,
    Recorded,
    RecordLost,
}

/// Run one full sweep.
///
/// 1. Truncate the match file (fatal on failure)
/// 2. Discover paste IDs from the archive
/// 3. For each ID: fetch, detect, record, then pause
///
/// An empty archive result ends the sweep early with a zeroed summary.
/// The completion line is logged on every path, including fatal ones.
#[instrument(skip_all, fields(archive_url = %config.archive_url, max_pastes = config.max_pastes))]
pub async fn run_sweep(
    config: &SweepConfig,
    progress: &dyn ProgressReporter,
) -> Result<SweepSummary> {
    info!("Starting Pastebin Keyword Crawler");

    let result = sweep(config, progress).await;
    match &result {
        Ok(summary) => info!(
            pastes_discovered = summary.pastes_discovered,
            pastes_fetched = summary.pastes_fetched,
            fetch_failures = summary.fetch_failures,
            empty_pastes = summary.empty_pastes,
            pastes_matched = summary.pastes_matched,
            records_written = summary.records_written,
            records_lost = summary.records_lost,
            elapsed_ms = summary.elapsed.as_millis(),
            "Crawling completed"
        ),
        Err(e) => info!(error = %e, "Crawling completed"),
    }

    result
}

async fn sweep(config: &SweepConfig, progress: &dyn ProgressReporter) -> Result<SweepSummary> {
    let start = Instant::now();
    let mut summary = SweepSummary::default();

    // --- Phase 1: Output ---
    progress.phase("Preparing match file");
    let store = MatchStore::new(&config.matches_file);
    if let Err(e) = store.truncate() {
        error!(error = %e, "Failed to clear output file");
        return Err(e);
    }

    // --- Phase 2: Discovery ---
    progress.phase("Scraping Pastebin archive");
    let scraper = ArchiveScraper::new(&config.http)?;
    let fetcher = PasteFetcher::new(&config.http, config.raw_url_template.as_str())?;

    let ids = scraper.discover(&config.archive_url, config.max_pastes).await;
    summary.pastes_discovered = ids.len();

    if ids.is_empty() {
        error!("No paste IDs retrieved. Exiting.");
        summary.elapsed = start.elapsed();
        progress.done(&summary);
        return Ok(summary);
    }

    // --- Phase 3: Fetch / detect / record ---
    let keywords = KeywordSet::builtin();
    let total = ids.len();
    let pause = config.rate_limit();

    for (i, id) in ids.iter().enumerate() {
        let current = i + 1;
        info!(paste_id = %id, "Processing paste {current}/{total}: {id}");
        progress.paste_started(id, current, total);

        match process_paste(id, &fetcher, keywords, &store).await {
            PasteOutcome::FetchFailed => summary.fetch_failures += 1,
            PasteOutcome::Empty => summary.empty_pastes += 1,
            PasteOutcome::NoMatch => summary.pastes_fetched += 1,
            PasteOutcome::Recorded => {
                summary.pastes_fetched += 1;
                summary.pastes_matched += 1;
                summary.records_written += 1;
            }
            PasteOutcome::RecordLost => {
                summary.pastes_fetched += 1;
                summary.pastes_matched += 1;
                summary.records_lost += 1;
            }
        }

        // Courtesy delay, applied after every paste whatever the outcome.
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    summary.elapsed = start.elapsed();
    progress.done(&summary);

    Ok(summary)
}

/// Fetch one paste, scan it, and record a match if any keyword hit.
///
/// An empty body is treated like absent content: it is not scanned and gets
/// no "No keywords found" line.
async fn process_paste(
    id: &PasteId,
    fetcher: &PasteFetcher,
    keywords: &KeywordSet,
    store: &MatchStore,
) -> PasteOutcome {
    let Some(body) = fetcher.fetch(id).await else {
        return PasteOutcome::FetchFailed;
    };
    if body.is_empty() {
        debug!(paste_id = %id, "Paste {id} is empty, skipping scan");
        return PasteOutcome::Empty;
    }

    let found = keywords.detect(&body);
    if found.is_empty() {
        info!(paste_id = %id, "No keywords found in paste {id}");
        return PasteOutcome::NoMatch;
    }

    info!(paste_id = %id, keywords = ?found, "Found keywords {found:?} in paste {id}");

    let record = MatchRecord::new(id.clone(), fetcher.raw_url(id), found, Utc::now());
    match store.append(&record) {
        Ok(()) => PasteOutcome::Recorded,
        Err(e) => {
            // Not retried; the match is dropped from this sweep's output.
            error!(paste_id = %id, error = %e, "Failed to write to {}", store.path().display());
            PasteOutcome::RecordLost
        }
    }
}
