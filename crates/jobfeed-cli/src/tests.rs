use chrono::{TimeZone, Utc};
use clap::Parser;
use jobfeed_core::{JobPosting, MissingIdentityPolicy, RawPosting, SearchDraft};

use super::*;

#[test]
fn parses_slug_command() {
    let cli = Cli::try_parse_from(["jobfeed", "slug", "Frontend London"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Slug { ref name }) if name == "Frontend London"
    ));
}

#[test]
fn parses_searches_check_command() {
    let cli = Cli::try_parse_from(["jobfeed", "searches", "check"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Searches {
            command: SearchesCommands::Check { file: None }
        })
    ));
}

#[test]
fn parses_feed_defaults() {
    let cli = Cli::try_parse_from(["jobfeed", "feed", "postings.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Feed {
            ref source,
            location: None,
            unseen_only: false,
            ref seen,
            page: 0,
            ..
        }) if source == "all" && seen.is_empty()
    ));
}

#[test]
fn parses_feed_with_filters_and_repeated_seen() {
    let cli = Cli::try_parse_from([
        "jobfeed",
        "feed",
        "postings.json",
        "--source",
        "reed",
        "--location",
        "london",
        "--unseen-only",
        "--seen",
        "reed:1",
        "--seen",
        "reed:2",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Feed {
            source,
            location,
            unseen_only,
            seen,
            ..
        }) => {
            assert_eq!(source, "reed");
            assert_eq!(location.as_deref(), Some("london"));
            assert!(unseen_only);
            assert_eq!(seen, vec!["reed:1", "reed:2"]);
        }
        other => panic!("expected feed command, got {other:?}"),
    }
}

#[test]
fn parses_run_with_file() {
    let cli = Cli::try_parse_from([
        "jobfeed",
        "run",
        "postings.json",
        "--file",
        "searches.yaml",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Run { file: Some(ref f), .. }) if f == &PathBuf::from("searches.yaml")
    ));
}

#[test]
fn slug_runs_without_loading_config() {
    let cli = Cli::try_parse_from(["jobfeed", "slug", "X"]).unwrap();
    assert!(!cli.command.unwrap().needs_config());

    for args in [
        vec!["jobfeed", "searches", "check"],
        vec!["jobfeed", "feed", "postings.json"],
        vec!["jobfeed", "run", "postings.json"],
    ] {
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.command.unwrap().needs_config());
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["jobfeed"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

fn stored(raw: RawPosting) -> JobPosting {
    raw.into_posting(MissingIdentityPolicy::Reject).unwrap()
}

#[test]
fn format_posting_fills_missing_fields() {
    let line = feed::format_posting(&stored(RawPosting::new("reed", "1", "Rust Dev")));
    assert_eq!(line, "reed:1 | Rust Dev | Unknown |  | undated | new");
}

#[test]
fn format_posting_shows_date_and_seen() {
    let posted = Utc.with_ymd_and_hms(2026, 4, 2, 10, 0, 0).unwrap();
    let mut posting = stored(
        RawPosting::new("adzuna", "9", "Data Engineer")
            .with_company("Acme")
            .with_location("Leeds")
            .with_posted_at(posted),
    );
    posting.seen = true;
    assert_eq!(
        feed::format_posting(&posting),
        "adzuna:9 | Data Engineer | Acme | Leeds | 2026-04-02 | seen"
    );
}

#[test]
fn describe_omits_unset_posted_after() {
    let def = SearchDraft::new("Frontend London", "react", "London", 50.0)
        .canonicalize()
        .unwrap();
    assert_eq!(
        searches::describe(&def),
        "frontend-london | react | London | limit 50 | source all"
    );
}

#[test]
fn describe_includes_source_and_posted_after() {
    let def = SearchDraft::new("Data Leeds", "data", "Leeds", 10.0)
        .with_source("adzuna".parse().unwrap())
        .with_posted_after(chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
        .canonicalize()
        .unwrap();
    assert_eq!(
        searches::describe(&def),
        "data-leeds | data | Leeds | limit 10 | source adzuna | posted after 2026-01-01"
    );
}
