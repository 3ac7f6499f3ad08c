pub mod app_config;
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod posting;
pub mod provider;
pub mod registry;
pub mod search;
pub mod searches_file;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, EmptyProviderId, ValidationError, ValidationErrors};
pub use feed::{FeedStats, IngestReport, JobFeedEngine, RejectedPosting};
pub use filter::{feed_order, matches_search, FeedFilter};
pub use posting::{job_uid, IdentityField, JobPosting, MissingIdentityPolicy, RawPosting};
pub use provider::{ProviderId, SourceFilter};
pub use registry::SavedSearchRegistry;
pub use search::{
    check_name_collision, normalize_name, NameCheckMode, SearchDefinition, SearchDraft,
    DEFAULT_LIMIT,
};
pub use searches_file::{load_searches, parse_searches, SearchEntry, SearchesFile};
