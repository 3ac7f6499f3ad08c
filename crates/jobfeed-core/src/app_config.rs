use std::path::PathBuf;

use crate::posting::MissingIdentityPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub searches_path: PathBuf,
    pub missing_identity_policy: MissingIdentityPolicy,
    /// Applied to saved searches that omit `limit`.
    pub default_limit: u32,
    pub feed_page_size: usize,
}
