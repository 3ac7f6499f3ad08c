use std::collections::BTreeSet;

use thiserror::Error;

/// A single failed check on a saved-search draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum ValidationError {
    #[error("name is empty after normalization")]
    EmptyName,

    #[error("query must be non-empty")]
    EmptyQuery,

    #[error("location must be non-empty")]
    EmptyLocation,

    #[error("limit must be a positive whole number")]
    InvalidLimit,
}

impl ValidationError {
    /// The draft field this check guards, for per-field UI messages.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            ValidationError::EmptyName => "name",
            ValidationError::EmptyQuery => "query",
            ValidationError::EmptyLocation => "location",
            ValidationError::InvalidLimit => "limit",
        }
    }
}

/// Every check that failed for one draft. Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeSet<ValidationError>);

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: ValidationError) {
        self.0.insert(error);
    }

    #[must_use]
    pub fn contains(&self, error: ValidationError) -> bool {
        self.0.contains(&error)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.0.iter().copied()
    }

    pub(crate) fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {error}", error.field())?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Error)]
#[error("provider id must be non-empty")]
pub struct EmptyProviderId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read searches file {path}: {source}")]
    SearchesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse searches file: {0}")]
    SearchesFileParse(#[from] serde_yaml::Error),

    #[error("saved search '{name}' is invalid: {source}")]
    InvalidSearch {
        name: String,
        #[source]
        source: ValidationErrors,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
