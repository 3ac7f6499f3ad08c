//! End-to-end scenarios across the saved-search registry and the job feed.
//!
//! These drive only the public API, the way a UI or ingestion job would:
//! save searches, ingest provider batches, mark postings seen and read back
//! filtered views.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use jobfeed_core::{
    FeedFilter, JobFeedEngine, MissingIdentityPolicy, NameCheckMode, ProviderId, RawPosting,
    SavedSearchRegistry, SearchDraft, SourceFilter, ValidationError,
};

fn reed(id: &str, title: &str, location: &str, day: u32) -> RawPosting {
    RawPosting::new("reed", id, title)
        .with_location(location)
        .with_posted_at(Utc.with_ymd_and_hms(2026, 9, day, 7, 0, 0).unwrap())
}

fn adzuna(id: &str, title: &str, location: &str, day: u32) -> RawPosting {
    RawPosting::new("adzuna", id, title)
        .with_location(location)
        .with_posted_at(Utc.with_ymd_and_hms(2026, 9, day, 7, 0, 0).unwrap())
}

#[test]
fn saving_twice_under_one_normalized_name_keeps_latest() {
    let registry = SavedSearchRegistry::new();
    assert_eq!(
        SavedSearchRegistry::normalize(" Frontend  London! "),
        "frontend-london"
    );

    registry
        .upsert(&SearchDraft::new("Frontend London", "react", "London", 50.0))
        .expect("first save should validate");

    // the dialog would warn here, but the save still goes through
    assert!(registry.check_name_collision("frontend-london", NameCheckMode::Create));
    registry
        .upsert(&SearchDraft::new("frontend-london", "vue", "London", 20.0))
        .expect("second save should validate");

    let all = registry.list();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "frontend-london");
    assert_eq!(all[0].query, "vue");
    assert_eq!(all[0].limit, 20);
}

#[test]
fn rejected_save_exposes_per_field_faults() {
    let registry = SavedSearchRegistry::new();
    let errors = registry
        .upsert(&SearchDraft::new("", "", "Leeds", f64::NAN))
        .unwrap_err();

    let fields: Vec<&str> = errors.iter().map(ValidationError::field).collect();
    assert_eq!(fields, vec!["name", "query", "limit"]);
    assert!(registry.is_empty());
}

#[test]
fn feed_dedups_tracks_seen_and_filters() {
    let feed = JobFeedEngine::new(MissingIdentityPolicy::default());

    let report = feed.ingest([
        reed("123", "Rust Engineer", "London", 3),
        reed("123", "Rust Engineer", "London", 3),
    ]);
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.duplicates, vec!["reed:123".to_string()]);

    feed.mark_seen("reed:123");
    assert!(feed.filter(&FeedFilter::all().unseen_only(true)).is_empty());

    let everything = feed.filter(&FeedFilter::all());
    assert_eq!(everything.len(), 1);
    assert!(everything[0].seen);
}

#[test]
fn dashboard_views_over_mixed_sources() {
    let feed = JobFeedEngine::new(MissingIdentityPolicy::Reject);
    feed.ingest([
        reed("1", "Frontend Developer", "London", 1),
        adzuna("1", "Frontend Engineer", "Greater London", 4),
        adzuna("2", "Data Engineer", "Leeds", 2),
        reed("2", "Platform Engineer", "Remote", 4),
    ]);
    feed.mark_seen("adzuna:1");

    let london_unseen: Vec<String> = feed
        .filter(&FeedFilter::all().with_location("london").unseen_only(true))
        .into_iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(london_unseen, vec!["reed:1"]);

    let adzuna_only: Vec<String> = feed
        .filter(&FeedFilter::all().with_source(SourceFilter::Only(ProviderId::adzuna())))
        .into_iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(adzuna_only, vec!["adzuna:1", "adzuna:2"]);

    // same posted_at on day 4: uid ascending breaks the tie
    let newest: Vec<String> = feed
        .filter_page(&FeedFilter::all(), 0, 2)
        .into_iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(newest, vec!["adzuna:1", "reed:2"]);

    let stats = feed.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.unseen, 3);
}

#[test]
fn saved_search_run_delivers_each_posting_once() {
    let registry = SavedSearchRegistry::new();
    let feed = JobFeedEngine::new(MissingIdentityPolicy::Reject);

    let search = registry
        .upsert(&SearchDraft::new("Frontend London", "frontend", "london", 10.0))
        .unwrap();

    feed.ingest([
        reed("1", "Frontend Developer", "London", 1),
        adzuna("7", "Backend Developer", "London", 2),
    ]);
    let first: Vec<String> = feed
        .take_new_for_search(&search)
        .into_iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(first, vec!["reed:1"]);

    feed.ingest([
        reed("1", "Frontend Developer", "London", 1),
        adzuna("8", "Senior Frontend Engineer", "London", 5),
    ]);
    let second: Vec<String> = feed
        .take_new_for_search(&search)
        .into_iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(second, vec!["adzuna:8"]);

    let removed = registry.remove("Frontend London").unwrap();
    feed.forget_search(&removed.name);
    assert!(registry.get("frontend-london").is_none());
}

#[test]
fn engine_is_shareable_across_threads() {
    let feed = Arc::new(JobFeedEngine::new(MissingIdentityPolicy::Reject));

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let feed = Arc::clone(&feed);
            scope.spawn(move || {
                let batch = (0..25)
                    .map(|i| RawPosting::new("reed", &(worker * 10 + i).to_string(), "Engineer"));
                feed.ingest(batch);
            });
        }
        for _ in 0..4 {
            let feed = Arc::clone(&feed);
            scope.spawn(move || {
                let view = feed.filter(&FeedFilter::all());
                let mut uids: Vec<&str> = view.iter().map(|p| p.uid.as_str()).collect();
                uids.dedup();
                assert_eq!(uids.len(), view.len());
            });
        }
    });

    // worker id ranges overlap; only 0..=54 are distinct
    assert_eq!(feed.len(), 55);
}
