//! # Health News Brief
//!
//! A news pipeline that collects healthcare and value-based-care articles
//! from RSS feeds and Google News searches, rejects irrelevant and spam
//! items, collapses near-duplicate coverage of the same story, assigns each
//! survivor a category, and writes a dated brief as JSON and Markdown.
//!
//! ## Usage
//!
//! ```sh
//! health_news_brief -j ./json -m ./markdown
//! health_news_brief -j ./json -m ./markdown -i saved_batch.json --debug
//! ```
//!
//! ## Architecture
//!
//! 1. **Ingestion**: RSS/Atom feeds and Google News queries (or a JSON file)
//! 2. **Filtering**: Source blocklists, spam and topic exclusions, keyword gate
//! 3. **Dedup**: URL, normalized title, and token-overlap title similarity
//! 4. **Categorization**: First matching category rule, else "Other"
//! 5. **Output**: JSON brief and Markdown brief
//!
//! In debug mode duplicates are kept and annotated with the reason they
//! were flagged instead of being dropped.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod categorize;
mod cli;
mod config;
mod dedup;
mod feeds;
mod keywords;
mod models;
mod outputs;
mod pipeline;
mod relevance;
mod rules;
mod similarity;
mod tables;
mod utils;

use cli::Cli;
use models::Brief;
use pipeline::{Mode, Pipeline};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("health_news_brief starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Load config, apply CLI overrides ----
    let mut config = config::load_config(args.config.as_deref()).await?;
    if let Some(threshold) = args.threshold {
        config.similarity_threshold = threshold;
    }
    if let Some(max_articles) = args.max_articles {
        config.max_articles = max_articles;
    }
    config.validate()?;

    let mode = if args.debug { Mode::Debug } else { Mode::Standard };
    info!(
        ?mode,
        threshold = config.similarity_threshold,
        max_articles = config.max_articles,
        "Configuration ready"
    );

    // Early check: ensure output dirs are writable
    for dir in [&args.json_output_dir, &args.markdown_output_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Ingest ----
    let raw_articles = match &args.input {
        Some(path) => feeds::load_json(path).await?,
        None => {
            if config.feeds.is_empty() && config.google_news.search_queries.is_empty() {
                warn!("No feeds or search queries configured; the brief will be empty");
            }
            feeds::collect(&config).await?
        }
    };
    info!(count = raw_articles.len(), "Total articles to filter");

    // ---- Filter, dedup, categorize ----
    let pipeline = Pipeline::from_config(&config);
    let report = pipeline.run(raw_articles, mode);

    let now = Local::now();
    let brief = Brief {
        industry: config.industry.clone(),
        local_date: now.date_naive().to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        debug: mode == Mode::Debug,
        articles: report.articles,
        stats: report.stats,
    };
    info!(
        local_date = %brief.local_date,
        local_time = %brief.local_time,
        articles = brief.articles.len(),
        "Brief assembled"
    );

    // ---- Outputs ----
    if let Err(e) = outputs::json::write_brief(&brief, &args.json_output_dir).await {
        error!(error = %e, "Failed to write JSON brief");
    }

    let category_order = pipeline.categorizer().labels();
    if let Err(e) =
        outputs::write_markdown(&brief, &category_order, &args.markdown_output_dir).await
    {
        error!(path = %args.markdown_output_dir, error = %e, "Failed writing Markdown");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
