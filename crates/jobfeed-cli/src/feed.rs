//! Feed and saved-search run commands.
//!
//! Postings come from a JSON file standing in for an ingestion batch; the
//! engine lives only for the duration of the command.

use std::path::Path;

use anyhow::Context;
use jobfeed_core::{AppConfig, FeedFilter, IngestReport, JobFeedEngine, JobPosting, RawPosting};

use crate::searches::{describe, load_registry};

/// Read a JSON array of raw postings.
pub(crate) fn read_postings(path: &Path) -> anyhow::Result<Vec<RawPosting>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading postings from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing postings JSON in {}", path.display()))
}

pub(crate) fn run_feed(
    config: &AppConfig,
    postings_path: &Path,
    filter: &FeedFilter,
    seen: &[String],
    page: usize,
) -> anyhow::Result<()> {
    let postings = read_postings(postings_path)?;
    let engine = JobFeedEngine::new(config.missing_identity_policy);

    let report = engine.ingest(postings);
    println!("{}", summarize(&report));

    for uid in seen {
        if !engine.mark_seen(uid) {
            tracing::warn!(uid = %uid, "not marked seen: unknown uid or already seen");
        }
    }

    let view = engine.filter_page(filter, page, config.feed_page_size);
    if view.is_empty() {
        println!("no postings match");
    }
    for posting in &view {
        println!("{}", format_posting(posting));
    }
    Ok(())
}

pub(crate) fn run_saved_searches(
    config: &AppConfig,
    postings_path: &Path,
    searches_path: &Path,
) -> anyhow::Result<()> {
    let registry = load_registry(config, searches_path)?;
    let postings = read_postings(postings_path)?;
    let engine = JobFeedEngine::new(config.missing_identity_policy);

    let report = engine.ingest(postings);
    println!("{}", summarize(&report));

    for definition in registry.list() {
        let fresh = engine.take_new_for_search(&definition);
        println!();
        println!("{} ({} new)", describe(&definition), fresh.len());
        for posting in &fresh {
            println!("  {}", format_posting(posting));
        }
    }
    Ok(())
}

pub(crate) fn summarize(report: &IngestReport) -> String {
    format!(
        "ingested: {} accepted, {} duplicate, {} rejected",
        report.accepted.len(),
        report.duplicates.len(),
        report.rejected.len()
    )
}

/// `uid | title | company | location | posted | seen-marker`.
pub(crate) fn format_posting(posting: &JobPosting) -> String {
    let posted = posting
        .posted_at
        .map_or_else(|| "undated".to_string(), |at| at.format("%Y-%m-%d").to_string());
    let marker = if posting.seen { "seen" } else { "new" };
    format!(
        "{} | {} | {} | {} | {} | {}",
        posting.uid,
        posting.title,
        posting.company.as_deref().unwrap_or("Unknown"),
        posting.location.as_deref().unwrap_or(""),
        posted,
        marker
    )
}
