//! Seed saved searches from a YAML file.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::provider::SourceFilter;
use crate::search::{SearchDefinition, SearchDraft};
use crate::ConfigError;

/// One entry under `searches:`. `limit` falls back to the configured default.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEntry {
    pub name: String,
    pub query: String,
    pub location: String,
    #[serde(default)]
    pub limit: Option<f64>,
    #[serde(default)]
    pub source: SourceFilter,
    #[serde(default)]
    pub posted_after: Option<NaiveDate>,
}

impl SearchEntry {
    #[must_use]
    pub fn into_draft(self, default_limit: u32) -> SearchDraft {
        SearchDraft {
            name: self.name,
            query: self.query,
            location: self.location,
            limit: self.limit.unwrap_or_else(|| f64::from(default_limit)),
            source: self.source,
            posted_after: self.posted_after,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchesFile {
    #[serde(default)]
    pub searches: Vec<SearchEntry>,
}

/// Load and validate saved searches from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_searches(
    path: &Path,
    default_limit: u32,
) -> Result<Vec<SearchDefinition>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SearchesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_searches(&content, default_limit)
}

/// Parse and validate saved searches from YAML text.
///
/// Each entry is canonicalized; two entries that normalize to the same name
/// are rejected because the file would otherwise silently drop one of them.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed, an entry is invalid, or two
/// entries share a normalized name.
pub fn parse_searches(
    content: &str,
    default_limit: u32,
) -> Result<Vec<SearchDefinition>, ConfigError> {
    let file: SearchesFile = serde_yaml::from_str(content)?;

    let mut seen_names = HashSet::new();
    let mut definitions = Vec::with_capacity(file.searches.len());

    for entry in file.searches {
        let raw_name = entry.name.clone();
        let definition = entry
            .into_draft(default_limit)
            .canonicalize()
            .map_err(|source| ConfigError::InvalidSearch {
                name: raw_name.clone(),
                source,
            })?;

        if !seen_names.insert(definition.name.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate saved search name: '{}' (from '{}')",
                definition.name, raw_name
            )));
        }

        definitions.push(definition);
    }

    Ok(definitions)
}
