//! Saved-search definitions: name normalization, validation and the
//! advisory name-collision check.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationErrors};
use crate::provider::SourceFilter;

/// Postings ingested per run when a draft does not say otherwise.
pub const DEFAULT_LIMIT: u32 = 50;

/// Normalize a free-text search name into its canonical slug.
///
/// Lower-cases and trims the input, collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen and strips hyphens from both ends.
/// Non-ASCII letters are treated as separators. Idempotent.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Uncommitted search input as typed by a user or read from config.
///
/// `limit` stays a float so non-finite and fractional input can be reported
/// as [`ValidationError::InvalidLimit`] instead of failing to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDraft {
    pub name: String,
    pub query: String,
    pub location: String,
    #[serde(default = "default_limit")]
    pub limit: f64,
    #[serde(default)]
    pub source: SourceFilter,
    #[serde(default)]
    pub posted_after: Option<NaiveDate>,
}

fn default_limit() -> f64 {
    f64::from(DEFAULT_LIMIT)
}

impl Default for SearchDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            query: String::new(),
            location: String::new(),
            limit: default_limit(),
            source: SourceFilter::Any,
            posted_after: None,
        }
    }
}

impl SearchDraft {
    #[must_use]
    pub fn new(name: &str, query: &str, location: &str, limit: f64) -> Self {
        Self {
            name: name.to_string(),
            query: query.to_string(),
            location: location.to_string(),
            limit,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceFilter) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_posted_after(mut self, posted_after: NaiveDate) -> Self {
        self.posted_after = Some(posted_after);
        self
    }

    /// The name this draft will be stored under.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Run every check independently and report all that fail.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] holding one entry per failed check.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.normalized_name().is_empty() {
            errors.push(ValidationError::EmptyName);
        }
        if self.query.trim().is_empty() {
            errors.push(ValidationError::EmptyQuery);
        }
        if self.location.trim().is_empty() {
            errors.push(ValidationError::EmptyLocation);
        }
        if whole_limit(self.limit).is_none() {
            errors.push(ValidationError::InvalidLimit);
        }

        errors.into_result()
    }

    /// `true` when the draft passes every check.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate and convert into the stored form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] if any check fails.
    pub fn canonicalize(&self) -> Result<SearchDefinition, ValidationErrors> {
        self.validate()?;
        let limit = whole_limit(self.limit).ok_or_else(|| {
            std::iter::once(ValidationError::InvalidLimit).collect::<ValidationErrors>()
        })?;

        Ok(SearchDefinition {
            name: self.normalized_name(),
            query: self.query.trim().to_string(),
            location: self.location.trim().to_string(),
            limit,
            source: self.source.clone(),
            posted_after: self.posted_after,
        })
    }
}

#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn whole_limit(limit: f64) -> Option<u32> {
    if (1.0..=f64::from(u32::MAX)).contains(&limit) && limit.fract() == 0.0 {
        Some(limit as u32)
    } else {
        None
    }
}

/// A validated saved search, keyed by its normalized `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDefinition {
    pub name: String,
    pub query: String,
    pub location: String,
    pub limit: u32,
    #[serde(default)]
    pub source: SourceFilter,
    #[serde(default)]
    pub posted_after: Option<NaiveDate>,
}

impl From<&SearchDefinition> for SearchDraft {
    fn from(definition: &SearchDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            query: definition.query.clone(),
            location: definition.location.clone(),
            limit: f64::from(definition.limit),
            source: definition.source.clone(),
            posted_after: definition.posted_after,
        }
    }
}

/// Whether a collision check is for a new search or an edit of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCheckMode<'a> {
    Create,
    /// Renaming a search back to its own current name is not a collision.
    Edit { current_name: &'a str },
}

/// Advisory check: would saving `candidate` overwrite another search?
///
/// The normalized candidate is compared case-insensitively against
/// `existing`. This never blocks a save; a colliding save is an upsert.
#[must_use]
pub fn check_name_collision<S: AsRef<str>>(
    candidate: &str,
    existing: &[S],
    mode: NameCheckMode<'_>,
) -> bool {
    let normalized = normalize_name(candidate);

    if let NameCheckMode::Edit { current_name } = mode {
        if normalized == current_name.to_lowercase() {
            return false;
        }
    }

    existing
        .iter()
        .any(|name| name.as_ref().to_lowercase() == normalized)
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
