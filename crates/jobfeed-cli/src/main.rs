mod feed;
mod searches;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::searches::SearchesCommands;

#[derive(Debug, Parser)]
#[command(name = "jobfeed")]
#[command(about = "Saved job searches and a deduplicated job feed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the normalized form of a saved-search name
    Slug { name: String },
    /// Inspect the saved-searches file
    Searches {
        #[command(subcommand)]
        command: SearchesCommands,
    },
    /// Ingest a JSON array of postings and print the filtered feed
    Feed {
        /// Path to a JSON array of raw postings
        postings: PathBuf,

        /// Provider to show, or "all"
        #[arg(long, default_value = "all")]
        source: String,

        /// Case-insensitive location substring
        #[arg(long)]
        location: Option<String>,

        /// Hide postings already marked seen
        #[arg(long)]
        unseen_only: bool,

        /// Mark a posting uid as seen before filtering (repeatable)
        #[arg(long = "seen", value_name = "UID")]
        seen: Vec<String>,

        /// Zero-based page of the feed to print
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Ingest postings, then print what each saved search has new
    Run {
        /// Path to a JSON array of raw postings
        postings: PathBuf,

        /// Saved-searches YAML file (defaults to `JOBFEED_SEARCHES_PATH`)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

impl Commands {
    /// Commands that only transform their arguments run without config.
    fn needs_config(&self) -> bool {
        !matches!(self, Self::Slug { .. })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("jobfeed: no command given; see --help");
        return Ok(());
    };
    if !command.needs_config() {
        if let Commands::Slug { name } = &command {
            println!("{}", jobfeed_core::normalize_name(name));
        }
        return Ok(());
    }

    let config = jobfeed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, policy = %config.missing_identity_policy, "config loaded");

    match command {
        Commands::Slug { .. } => {}
        Commands::Searches { command } => searches::run(&config, command)?,
        Commands::Feed {
            postings,
            source,
            location,
            unseen_only,
            seen,
            page,
        } => {
            let filter = jobfeed_core::FeedFilter::all()
                .with_source(source.parse()?)
                .with_location(location.as_deref().unwrap_or(""))
                .unseen_only(unseen_only);
            feed::run_feed(&config, &postings, &filter, &seen, page)?;
        }
        Commands::Run { postings, file } => {
            let path = file.unwrap_or_else(|| config.searches_path.clone());
            feed::run_saved_searches(&config, &postings, &path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
