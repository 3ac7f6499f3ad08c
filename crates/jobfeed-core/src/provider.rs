//! Job-board provider identities and the source predicate built on them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EmptyProviderId;

/// Lower-cased identifier of an external job board, e.g. `"reed"`.
///
/// Case folding is part of posting identity: `"Reed"` and `"reed"` yield the
/// same uid prefix, so postings from either spelling deduplicate together.
///
/// The well-known providers have constructors; any other non-blank name is
/// accepted so new boards can be added without touching this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    pub const REED: &'static str = "reed";
    pub const ADZUNA: &'static str = "adzuna";
    /// Assigned to postings whose provider was missing when identity is synthesized.
    pub const UNKNOWN: &'static str = "unknown";

    /// Trims and lower-cases `raw`. Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    #[must_use]
    pub fn reed() -> Self {
        Self(Self::REED.to_string())
    }

    #[must_use]
    pub fn adzuna() -> Self {
        Self(Self::ADZUNA.to_string())
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProviderId {
    type Err = EmptyProviderId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or(EmptyProviderId)
    }
}

impl TryFrom<String> for ProviderId {
    type Error = EmptyProviderId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProviderId> for String {
    fn from(value: ProviderId) -> Self {
        value.0
    }
}

/// Restricts a search or feed view to one provider, or lets every provider through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceFilter {
    #[default]
    Any,
    Only(ProviderId),
}

impl SourceFilter {
    #[must_use]
    pub fn matches(&self, source: &ProviderId) -> bool {
        match self {
            SourceFilter::Any => true,
            SourceFilter::Only(wanted) => wanted == source,
        }
    }
}

impl std::fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFilter::Any => f.write_str("all"),
            SourceFilter::Only(provider) => write!(f, "{provider}"),
        }
    }
}

impl FromStr for SourceFilter {
    type Err = std::convert::Infallible;

    /// `"all"`, `"any"` and blank input mean every provider.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match ProviderId::new(s) {
            None => SourceFilter::Any,
            Some(p) if p.as_str() == "all" || p.as_str() == "any" => SourceFilter::Any,
            Some(p) => SourceFilter::Only(p),
        })
    }
}

impl From<String> for SourceFilter {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

impl From<SourceFilter> for String {
    fn from(value: SourceFilter) -> Self {
        value.to_string()
    }
}
