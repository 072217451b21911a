//! `codesearch` — a thin CLI over the file/text search library.
//!
//! Carries no business logic of its own: every subcommand is a direct call
//! into `codesearch_core::search`.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use codesearch_core::config::{self, SearchConfig};
use codesearch_core::logging;
use codesearch_core::search::{FileSearchService, PathType, SystemCommandRunner, TextSearchService};

#[derive(Parser)]
#[command(name = "codesearch", about = "Cross-platform file and text search over external tools")]
struct Cli {
    /// Path to a `codesearch.toml` config file. Defaults to `./codesearch.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate files by glob or name pattern.
    Files {
        pattern: String,
        directory: PathBuf,
        #[arg(long)]
        max_results: Option<i64>,
        /// Report paths relative to `directory` instead of absolute.
        #[arg(long)]
        relative: bool,
    },
    /// Search file contents with a regular expression.
    Text {
        pattern: String,
        directory: PathBuf,
        #[arg(long)]
        case_insensitive: bool,
        #[arg(long)]
        max_results: Option<i64>,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = SearchConfig::load(Some(&config_path).filter(|p| p.exists()))?;
    let runner = SystemCommandRunner;

    match cli.command {
        Commands::Files { pattern, directory, max_results, relative } => {
            let path_type = if relative { PathType::Relative } else { PathType::Absolute };
            let service = FileSearchService::with_config(config);
            match service.search_files(&pattern, &directory, max_results, path_type, &runner) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => bail!(err),
            }
        }
        Commands::Text { pattern, directory, case_insensitive, max_results } => {
            let service = TextSearchService::with_config(config);
            match service.search_text(&pattern, &directory, !case_insensitive, max_results, &runner) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => bail!(err),
            }
        }
    }

    Ok(())
}
