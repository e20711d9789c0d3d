//! YAML configuration.
//!
//! Every field has a built-in default from [`crate::tables`], so an empty
//! file (or no file at all) yields a working healthcare configuration. The
//! loaded [`Config`] is immutable and passed explicitly to each component.

use crate::categorize::CategoryRule;
use crate::relevance::FilterTables;
use crate::similarity::DEFAULT_THRESHOLD;
use crate::tables;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Widest accepted ingestion window: ten years.
pub const MAX_TIME_WINDOW_HOURS: i64 = 24 * 365 * 10;

/// An RSS or Atom feed to ingest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedSource {
    /// Outlet name used as the article source.
    pub name: String,
    pub url: String,
}

/// Google News RSS search settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GoogleNewsConfig {
    pub search_queries: Vec<String>,
    /// Lookback passed as `when:<period>`, e.g. `7d`, `24h`.
    pub period: String,
    pub language: String,
    pub country: String,
    pub max_results_per_query: usize,
}

impl Default for GoogleNewsConfig {
    fn default() -> Self {
        Self {
            search_queries: Vec::new(),
            period: "7d".to_string(),
            language: "en".to_string(),
            country: "US".to_string(),
            max_results_per_query: 50,
        }
    }
}

/// Word lists for title keyword extraction.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub stopwords: Vec<String>,
    pub generic_terms: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            stopwords: tables::default_stopwords(),
            generic_terms: tables::default_generic_terms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Shown in the brief heading.
    pub industry: String,
    /// Domain keywords; an article must contain at least one.
    pub keywords: Vec<String>,
    /// Cap on articles in a standard brief. 0 means no cap.
    pub max_articles: usize,
    /// Feed entries older than this are skipped at ingestion.
    pub time_window_hours: i64,
    pub similarity_threshold: f64,
    pub feeds: Vec<FeedSource>,
    pub google_news: GoogleNewsConfig,
    pub filters: FilterTables,
    pub categories: Vec<CategoryRule>,
    pub tokenizer: TokenizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            industry: "Healthcare".to_string(),
            keywords: tables::default_keywords(),
            max_articles: 20,
            time_window_hours: 168,
            similarity_threshold: DEFAULT_THRESHOLD,
            feeds: Vec::new(),
            google_news: GoogleNewsConfig::default(),
            filters: tables::default_filter_tables(),
            categories: tables::default_categories(),
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl Config {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )
            .into());
        }

        if !(0..=MAX_TIME_WINDOW_HOURS).contains(&self.time_window_hours) {
            return Err(format!(
                "time_window_hours must be within [0, {MAX_TIME_WINDOW_HOURS}], got {}",
                self.time_window_hours
            )
            .into());
        }

        if let Some(rule) = self.categories.iter().find(|rule| rule.label.trim().is_empty()) {
            return Err(format!(
                "category rule with triggers {:?} has an empty label",
                rule.triggers
            )
            .into());
        }

        // A blank term is a substring of every text.
        reject_blank("keywords", &self.keywords)?;
        let filters = &self.filters;
        reject_blank("filters.blocked_sources", &filters.blocked_sources)?;
        reject_blank("filters.source_spam_patterns", &filters.source_spam_patterns)?;
        reject_blank("filters.spam_terms", &filters.spam_terms)?;
        reject_blank("filters.geographic_exclusions", &filters.geographic_exclusions)?;
        reject_blank("filters.topic_exclusions", &filters.topic_exclusions)?;
        for rule in &filters.disambiguation {
            if rule.term.trim().is_empty() {
                return Err("filters.disambiguation has a rule with a blank term".into());
            }
            let term = rule.term.trim();
            reject_blank(&format!("disambiguation '{term}' context"), &rule.context)?;
            reject_blank(
                &format!("disambiguation '{term}' ambiguity_signals"),
                &rule.ambiguity_signals,
            )?;
            reject_blank(&format!("disambiguation '{term}' disqualifiers"), &rule.disqualifiers)?;
        }
        for rule in &self.categories {
            reject_blank(&format!("category '{}' triggers", rule.label), &rule.triggers)?;
        }

        if self.keywords.is_empty() {
            warn!("No domain keywords configured; every article will be rejected");
        }

        Ok(())
    }
}

fn reject_blank(list: &str, terms: &[String]) -> Result<(), Box<dyn Error>> {
    if terms.iter().any(|term| term.trim().is_empty()) {
        return Err(format!("{list} contains a blank term").into());
    }
    Ok(())
}

/// Load configuration from `path`, or the built-in defaults when `path` is
/// `None` and `./config.yaml` does not exist.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let path = match path {
        Some(p) => p.to_string(),
        None if Path::new("config.yaml").exists() => "config.yaml".to_string(),
        None => {
            info!("No config file found; using built-in defaults");
            return Ok(Config::default());
        }
    };

    let yaml = tokio::fs::read_to_string(&path).await?;
    let config = Config::from_yaml(&yaml)?;
    info!(
        %path,
        keywords = config.keywords.len(),
        feeds = config.feeds.len(),
        queries = config.google_news.search_queries.len(),
        categories = config.categories.len(),
        "Loaded configuration"
    );
    Ok(config)
}
