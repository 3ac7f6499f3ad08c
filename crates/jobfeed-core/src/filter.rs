//! Feed predicates and the canonical feed ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::posting::JobPosting;
use crate::provider::SourceFilter;
use crate::search::SearchDefinition;

/// Display-time narrowing of the feed. All active predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedFilter {
    pub source: SourceFilter,
    /// Case-insensitive substring of the posting location; blank matches all.
    pub location_contains: String,
    pub unseen_only: bool,
}

impl FeedFilter {
    /// A filter with every predicate disabled.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceFilter) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_location(mut self, needle: &str) -> Self {
        self.location_contains = needle.to_string();
        self
    }

    #[must_use]
    pub fn unseen_only(mut self, unseen_only: bool) -> Self {
        self.unseen_only = unseen_only;
        self
    }

    #[must_use]
    pub fn matches(&self, posting: &JobPosting) -> bool {
        self.source.matches(&posting.source_id)
            && location_contains(posting.location.as_deref(), &self.location_contains)
            && !(self.unseen_only && posting.seen)
    }
}

fn location_contains(location: Option<&str>, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    location.is_some_and(|loc| loc.to_lowercase().contains(&needle.to_lowercase()))
}

/// Newest `posted_at` first, undated postings last, ties by `uid` ascending.
#[must_use]
pub fn feed_order(a: &JobPosting, b: &JobPosting) -> Ordering {
    let by_date = match (a.posted_at, b.posted_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.uid.cmp(&b.uid))
}

/// Does `posting` satisfy a saved search's criteria?
///
/// Source and location behave as in [`FeedFilter`]. `posted_after` compares
/// at date granularity and excludes undated postings. Every whitespace token
/// of the query must appear in the title, company or location.
#[must_use]
pub fn matches_search(definition: &SearchDefinition, posting: &JobPosting) -> bool {
    if !definition.source.matches(&posting.source_id) {
        return false;
    }
    if !location_contains(posting.location.as_deref(), &definition.location) {
        return false;
    }
    if let Some(after) = definition.posted_after {
        match posting.posted_at {
            Some(at) if at.date_naive() >= after => {}
            _ => return false,
        }
    }

    let haystacks = [
        posting.title.to_lowercase(),
        posting.company.as_deref().unwrap_or("").to_lowercase(),
        posting.location.as_deref().unwrap_or("").to_lowercase(),
    ];
    definition
        .query
        .to_lowercase()
        .split_whitespace()
        .all(|token| haystacks.iter().any(|h| h.contains(token)))
}
