//! The job feed: deduplicated posting store, seen tracking, filtered views
//! and saved-search runs over the stored postings.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::filter::{feed_order, matches_search, FeedFilter};
use crate::posting::{IdentityField, JobPosting, MissingIdentityPolicy, RawPosting};
use crate::provider::ProviderId;
use crate::search::{normalize_name, SearchDefinition};

/// Outcome of one [`JobFeedEngine::ingest`] batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Newly stored postings, in input order.
    pub accepted: Vec<JobPosting>,
    /// uids that were already known (from earlier batches or earlier in this one).
    pub duplicates: Vec<String>,
    /// Postings dropped for missing identity under [`MissingIdentityPolicy::Reject`].
    pub rejected: Vec<RejectedPosting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedPosting {
    /// Position of the posting in the submitted batch.
    pub index: usize,
    pub missing: Vec<IdentityField>,
}

/// Counts for dashboard summary cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub total: usize,
    pub unseen: usize,
    pub by_source: BTreeMap<ProviderId, usize>,
}

#[derive(Debug, Default)]
struct FeedState {
    postings: HashMap<String, JobPosting>,
    /// Saved-search name -> uids already handed out by that search.
    delivered: HashMap<String, HashSet<String>>,
}

impl FeedState {
    fn sorted(&self, keep: impl Fn(&JobPosting) -> bool) -> Vec<&JobPosting> {
        let mut matched: Vec<&JobPosting> = self.postings.values().filter(|p| keep(p)).collect();
        matched.sort_by(|a, b| feed_order(a, b));
        matched
    }

    fn search(&self, definition: &SearchDefinition) -> Vec<&JobPosting> {
        let mut matched = self.sorted(|p| matches_search(definition, p));
        matched.truncate(usize::try_from(definition.limit).unwrap_or(usize::MAX));
        matched
    }
}

/// Owns every known posting uid and its `seen` flag.
///
/// An ingest batch, a seen-mark and a search run each hold the write lock
/// for their whole duration, so concurrent batches cannot both accept the
/// same uid. Filters take the read lock and see a consistent snapshot.
#[derive(Debug, Default)]
pub struct JobFeedEngine {
    policy: MissingIdentityPolicy,
    state: RwLock<FeedState>,
}

impl JobFeedEngine {
    #[must_use]
    pub fn new(policy: MissingIdentityPolicy) -> Self {
        Self {
            policy,
            state: RwLock::new(FeedState::default()),
        }
    }

    /// Rebuild an engine from stored postings, keeping their `seen` flags.
    /// The first posting wins when two share a uid.
    #[must_use]
    pub fn from_postings<I>(policy: MissingIdentityPolicy, postings: I) -> Self
    where
        I: IntoIterator<Item = JobPosting>,
    {
        let mut state = FeedState::default();
        for posting in postings {
            state.postings.entry(posting.uid.clone()).or_insert(posting);
        }
        Self {
            policy,
            state: RwLock::new(state),
        }
    }

    #[must_use]
    pub fn policy(&self) -> MissingIdentityPolicy {
        self.policy
    }

    /// Deduplicate `postings` by uid and store the new ones as unseen.
    ///
    /// Input order is processing order. A known uid is reported as a
    /// duplicate and the stored posting, including its `seen` flag and
    /// descriptive fields, is left untouched.
    pub fn ingest<I>(&self, postings: I) -> IngestReport
    where
        I: IntoIterator<Item = RawPosting>,
    {
        let mut report = IngestReport::default();
        let mut state = self.write();

        for (index, raw) in postings.into_iter().enumerate() {
            let posting = match raw.into_posting(self.policy) {
                Ok(posting) => posting,
                Err(missing) => {
                    tracing::warn!(index, ?missing, "rejecting posting without identity");
                    report.rejected.push(RejectedPosting { index, missing });
                    continue;
                }
            };

            if state.postings.contains_key(&posting.uid) {
                tracing::debug!(uid = %posting.uid, "duplicate posting skipped");
                report.duplicates.push(posting.uid);
                continue;
            }

            tracing::debug!(uid = %posting.uid, "posting accepted");
            state.postings.insert(posting.uid.clone(), posting.clone());
            report.accepted.push(posting);
        }
        drop(state);

        tracing::info!(
            accepted = report.accepted.len(),
            duplicates = report.duplicates.len(),
            rejected = report.rejected.len(),
            "ingest batch complete"
        );
        report
    }

    /// Mark a posting as viewed. Unknown uids are ignored.
    ///
    /// Returns `true` only when the flag actually changed.
    pub fn mark_seen(&self, uid: &str) -> bool {
        match self.write().postings.get_mut(uid) {
            Some(posting) if !posting.seen => {
                posting.seen = true;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, uid: &str) -> Option<JobPosting> {
        self.read().postings.get(uid).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().postings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().postings.is_empty()
    }

    /// Stored postings satisfying `filter`, newest first then by uid.
    #[must_use]
    pub fn filter(&self, filter: &FeedFilter) -> Vec<JobPosting> {
        self.read()
            .sorted(|p| filter.matches(p))
            .into_iter()
            .cloned()
            .collect()
    }

    /// One zero-based page of [`Self::filter`]. A zero `page_size` yields nothing.
    #[must_use]
    pub fn filter_page(
        &self,
        filter: &FeedFilter,
        page: usize,
        page_size: usize,
    ) -> Vec<JobPosting> {
        self.read()
            .sorted(|p| filter.matches(p))
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect()
    }

    /// Postings matching a saved search, in feed order, capped at its limit.
    #[must_use]
    pub fn search(&self, definition: &SearchDefinition) -> Vec<JobPosting> {
        self.read()
            .search(definition)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Run a saved search and return only the postings it has not delivered
    /// before, recording them as delivered. Independent of `seen`.
    pub fn take_new_for_search(&self, definition: &SearchDefinition) -> Vec<JobPosting> {
        let mut state = self.write();
        let matched: Vec<JobPosting> = state.search(definition).into_iter().cloned().collect();

        let delivered = state
            .delivered
            .entry(normalize_name(&definition.name))
            .or_default();
        let fresh: Vec<JobPosting> = matched
            .into_iter()
            .filter(|p| delivered.insert(p.uid.clone()))
            .collect();
        drop(state);

        tracing::info!(search = %definition.name, new = fresh.len(), "saved search run");
        fresh
    }

    /// Drop delivery bookkeeping for a search that no longer exists.
    pub fn forget_search(&self, name: &str) {
        self.write().delivered.remove(&normalize_name(name));
    }

    #[must_use]
    pub fn stats(&self) -> FeedStats {
        let state = self.read();
        let mut stats = FeedStats {
            total: state.postings.len(),
            ..FeedStats::default()
        };
        for posting in state.postings.values() {
            if !posting.seen {
                stats.unseen += 1;
            }
            *stats.by_source.entry(posting.source_id.clone()).or_default() += 1;
        }
        stats
    }

    /// Every stored posting in feed order, for persistence collaborators.
    #[must_use]
    pub fn snapshot(&self) -> Vec<JobPosting> {
        self.filter(&FeedFilter::all())
    }

    fn read(&self) -> RwLockReadGuard<'_, FeedState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FeedState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;
