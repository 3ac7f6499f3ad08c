//! The authoritative set of saved searches, keyed by normalized name.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::ValidationErrors;
use crate::search::{
    check_name_collision, normalize_name, NameCheckMode, SearchDefinition, SearchDraft,
};

/// In-memory saved-search store with upsert-by-normalized-name semantics.
///
/// Every mutation holds the write lock for its full duration; readers see
/// either the state before or after a save, never a partial one.
#[derive(Debug, Default)]
pub struct SavedSearchRegistry {
    entries: RwLock<BTreeMap<String, SearchDefinition>>,
}

impl SavedSearchRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from previously stored definitions.
    ///
    /// Each definition is re-canonicalized on the way in, so names are
    /// re-normalized and entries that would fail validation are dropped with
    /// a warning. Later definitions win when two normalize to the same key.
    #[must_use]
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = SearchDefinition>,
    {
        let entries = definitions
            .into_iter()
            .filter_map(|definition| {
                match SearchDraft::from(&definition).canonicalize() {
                    Ok(canonical) => Some((canonical.name.clone(), canonical)),
                    Err(errors) => {
                        tracing::warn!(
                            name = %definition.name,
                            %errors,
                            "dropping invalid stored search"
                        );
                        None
                    }
                }
            })
            .collect();

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// See [`normalize_name`].
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        normalize_name(raw)
    }

    /// See [`SearchDraft::validate`].
    ///
    /// # Errors
    ///
    /// Returns every failed check for `draft`.
    pub fn validate(draft: &SearchDraft) -> Result<(), ValidationErrors> {
        draft.validate()
    }

    /// Advisory collision check against the names currently stored.
    #[must_use]
    pub fn check_name_collision(&self, candidate: &str, mode: NameCheckMode<'_>) -> bool {
        let entries = self.read();
        let names: Vec<&str> = entries.keys().map(String::as_str).collect();
        check_name_collision(candidate, &names, mode)
    }

    /// Validate `draft` and store it, replacing any search with the same
    /// normalized name. Returns the stored definition.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the draft is invalid; the registry is
    /// left unchanged.
    pub fn upsert(&self, draft: &SearchDraft) -> Result<SearchDefinition, ValidationErrors> {
        let definition = draft.canonicalize()?;

        let replaced = self
            .write()
            .insert(definition.name.clone(), definition.clone())
            .is_some();

        tracing::info!(name = %definition.name, replaced, "saved search stored");
        Ok(definition)
    }

    /// Delete the search stored under the normalized form of `name`, if any.
    pub fn remove(&self, name: &str) -> Option<SearchDefinition> {
        let key = normalize_name(name);
        let removed = self.write().remove(&key);
        if removed.is_some() {
            tracing::info!(name = %key, "saved search removed");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<SearchDefinition> {
        self.read().get(&normalize_name(name)).cloned()
    }

    /// All definitions ordered by name. Doubles as the persistence snapshot.
    #[must_use]
    pub fn list(&self) -> Vec<SearchDefinition> {
        self.read().values().cloned().collect()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panicking writer cannot leave a half-inserted map behind, so a
    // poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, SearchDefinition>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, SearchDefinition>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
