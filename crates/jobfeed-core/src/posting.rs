//! Job postings as ingested from providers, and the rules that give each one
//! its deduplication identity.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigError;
use crate::provider::ProviderId;

pub const UID_SEPARATOR: char = ':';

/// Build the deduplication key, e.g. `reed:123456`.
#[must_use]
pub fn job_uid(source_id: &ProviderId, source_job_id: &str) -> String {
    format!("{source_id}{UID_SEPARATOR}{source_job_id}")
}

/// A posting as handed over by an ingestion collaborator. Identity fields
/// are optional because upstream payloads are not trusted to carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPosting {
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub source_job_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

impl RawPosting {
    #[must_use]
    pub fn new(source_id: &str, source_job_id: &str, title: &str) -> Self {
        Self {
            source_id: Some(source_id.to_string()),
            source_job_id: Some(source_job_id.to_string()),
            title: title.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    #[must_use]
    pub fn with_posted_at(mut self, posted_at: DateTime<Utc>) -> Self {
        self.posted_at = Some(posted_at);
        self
    }

    /// Resolve identity under `policy` and produce an unseen [`JobPosting`].
    ///
    /// # Errors
    ///
    /// Under [`MissingIdentityPolicy::Reject`], returns the identity fields
    /// that were absent or blank.
    pub fn into_posting(
        self,
        policy: MissingIdentityPolicy,
    ) -> Result<JobPosting, Vec<IdentityField>> {
        let source_id = self.source_id.as_deref().and_then(ProviderId::new);
        let source_job_id = self
            .source_job_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToOwned::to_owned);

        let (source_id, source_job_id) = match (source_id, source_job_id, policy) {
            (Some(source), Some(job_id), _) => (source, job_id),
            (source, job_id, MissingIdentityPolicy::Synthesize) => {
                let job_id = job_id.unwrap_or_else(|| self.fingerprint());
                (source.unwrap_or_else(ProviderId::unknown), job_id)
            }
            (source, job_id, MissingIdentityPolicy::Reject) => {
                let mut missing = Vec::new();
                if source.is_none() {
                    missing.push(IdentityField::SourceId);
                }
                if job_id.is_none() {
                    missing.push(IdentityField::SourceJobId);
                }
                return Err(missing);
            }
        };

        Ok(JobPosting {
            uid: job_uid(&source_id, &source_job_id),
            source_id,
            source_job_id,
            title: self.title,
            company: self.company,
            location: self.location,
            url: self.url,
            posted_at: self.posted_at,
            seen: false,
        })
    }

    /// Stable stand-in job id derived from the descriptive fields.
    ///
    /// SHA-256 over `title || company || location || url || posted_at`,
    /// trimmed and lower-cased, truncated to 16 hex chars.
    fn fingerprint(&self) -> String {
        let input = format!(
            "{}\x00{}\x00{}\x00{}\x00{}",
            self.title.trim().to_lowercase(),
            self.company.as_deref().unwrap_or("").trim().to_lowercase(),
            self.location.as_deref().unwrap_or("").trim().to_lowercase(),
            self.url.as_deref().unwrap_or("").trim(),
            self.posted_at.map(|at| at.to_rfc3339()).unwrap_or_default(),
        );
        let digest = format!("{:x}", Sha256::digest(input.as_bytes()));
        format!("syn-{}", &digest[..16])
    }
}

/// A deduplicated posting owned by the feed engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    /// `source_id:source_job_id`, unique across all providers.
    pub uid: String,
    pub source_id: ProviderId,
    pub source_job_id: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    /// One-way: flips to `true` on first view and never back.
    pub seen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    SourceId,
    SourceJobId,
}

impl std::fmt::Display for IdentityField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityField::SourceId => write!(f, "source_id"),
            IdentityField::SourceJobId => write!(f, "source_job_id"),
        }
    }
}

/// What ingest does with a posting that lacks a provider or provider job id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingIdentityPolicy {
    /// Drop the posting and report it.
    #[default]
    Reject,
    /// Fill the gap: provider `unknown`, job id from a content fingerprint.
    Synthesize,
}

impl std::fmt::Display for MissingIdentityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingIdentityPolicy::Reject => write!(f, "reject"),
            MissingIdentityPolicy::Synthesize => write!(f, "synthesize"),
        }
    }
}

impl FromStr for MissingIdentityPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(MissingIdentityPolicy::Reject),
            "synthesize" => Ok(MissingIdentityPolicy::Synthesize),
            other => Err(ConfigError::InvalidEnvVar {
                var: "JOBFEED_MISSING_IDENTITY_POLICY".to_string(),
                reason: format!("expected 'reject' or 'synthesize', got '{other}'"),
            }),
        }
    }
}
