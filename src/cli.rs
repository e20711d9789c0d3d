//! Command-line interface definitions for Health News Brief.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Debug mode and the similarity threshold can also come from environment
//! variables.

use clap::Parser;

/// Command-line arguments for the Health News Brief application.
///
/// Flags given here override the matching settings in `config.yaml`.
///
/// # Examples
///
/// ```sh
/// # Fetch configured feeds and write today's brief
/// health_news_brief -j ./json -m ./markdown
///
/// # Re-run the pipeline over a saved batch, keeping duplicates annotated
/// health_news_brief -j ./json -m ./markdown -i batch.json --debug
///
/// # Looser fuzzy matching
/// BRIEF_THRESHOLD=0.3 health_news_brief -j ./json -m ./markdown
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON brief
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown brief
    #[arg(short, long)]
    pub markdown_output_dir: String,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Read articles from a JSON array instead of fetching feeds
    #[arg(short, long)]
    pub input: Option<String>,

    /// Keep duplicates in the output and annotate why each was flagged
    #[arg(long, env = "BRIEF_DEBUG")]
    pub debug: bool,

    /// Cap on articles in the brief (0 = no cap); overrides config
    #[arg(long)]
    pub max_articles: Option<usize>,

    /// Jaccard threshold for fuzzy title matching; overrides config
    #[arg(long, env = "BRIEF_THRESHOLD")]
    pub threshold: Option<f64>,
}
