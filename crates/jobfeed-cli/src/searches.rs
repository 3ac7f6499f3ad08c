//! `searches` sub-commands.

use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use jobfeed_core::{AppConfig, SavedSearchRegistry, SearchDefinition};

/// Sub-commands available under `searches`.
#[derive(Debug, Subcommand)]
pub enum SearchesCommands {
    /// Load and validate the saved-searches file, printing each definition
    Check {
        /// Saved-searches YAML file (defaults to `JOBFEED_SEARCHES_PATH`)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

pub(crate) fn run(config: &AppConfig, command: SearchesCommands) -> anyhow::Result<()> {
    match command {
        SearchesCommands::Check { file } => {
            let path = file.unwrap_or_else(|| config.searches_path.clone());
            let registry = load_registry(config, &path)?;
            for definition in registry.list() {
                println!("{}", describe(&definition));
            }
            println!("{} saved searches OK", registry.len());
            Ok(())
        }
    }
}

/// Build a registry seeded from the saved-searches file at `path`.
pub(crate) fn load_registry(
    config: &AppConfig,
    path: &std::path::Path,
) -> anyhow::Result<SavedSearchRegistry> {
    let definitions = jobfeed_core::load_searches(path, config.default_limit)
        .with_context(|| format!("loading saved searches from {}", path.display()))?;
    Ok(SavedSearchRegistry::from_definitions(definitions))
}

/// One-line summary, e.g. `frontend-london | react | London | limit 50 | source all`.
pub(crate) fn describe(definition: &SearchDefinition) -> String {
    let mut line = format!(
        "{} | {} | {} | limit {} | source {}",
        definition.name, definition.query, definition.location, definition.limit, definition.source
    );
    if let Some(after) = definition.posted_after {
        line.push_str(&format!(" | posted after {after}"));
    }
    line
}
