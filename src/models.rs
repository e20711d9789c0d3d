//! Data models for news articles and the rendered brief.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawArticle`]: Record as handed over by an ingestion source
//! - [`Article`]: Normalized article flowing through the pipeline
//! - [`DuplicateFlag`]: Debug-mode duplicate verdict attached to an article
//! - [`Brief`]: One pipeline run, ready for JSON/Markdown output

use crate::pipeline::RunStats;
use crate::rules::MatchText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum description length kept at ingestion, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// An article record as produced by a feed, a search API or an input file.
///
/// Every field is optional so malformed records can be deserialized and then
/// dropped by [`RawArticle::into_article`] instead of failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: String,
}

impl RawArticle {
    /// Normalize into an [`Article`].
    ///
    /// Returns `None` when the title is missing or blank. The description is
    /// cut to [`MAX_DESCRIPTION_CHARS`] and a missing timestamp becomes `now`.
    pub fn into_article(self, now: DateTime<Utc>) -> Option<Article> {
        let title = self.title?.trim().to_string();
        if title.is_empty() {
            return None;
        }

        Some(Article::new(
            &title,
            &self.link,
            &crate::utils::truncate_chars(self.description.trim(), MAX_DESCRIPTION_CHARS),
            self.published.unwrap_or(now),
            &self.source,
        ))
    }
}

/// Duplicate verdict attached to every article in debug mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateFlag {
    pub is_duplicate: bool,
    pub duplicate_reason: Option<String>,
    /// Jaccard similarity, only for fuzzy title matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_similarity: Option<f64>,
    /// Shared title tokens, only for fuzzy title matches.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicate_keywords: Vec<String>,
}

impl DuplicateFlag {
    pub fn unique() -> Self {
        Self {
            is_duplicate: false,
            duplicate_reason: None,
            duplicate_similarity: None,
            duplicate_keywords: Vec::new(),
        }
    }
}

/// A normalized news article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    /// Unique key for URL-based dedup. May be empty for malformed sources.
    pub link: String,
    pub description: String,
    pub published: DateTime<Utc>,
    /// Outlet name, e.g. "Fierce Healthcare".
    pub source: String,
    /// Assigned by the categorizer only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub duplicate: Option<DuplicateFlag>,
}

impl Article {
    pub fn new(
        title: &str,
        link: &str,
        description: &str,
        published: DateTime<Utc>,
        source: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            link: link.to_string(),
            description: description.to_string(),
            published,
            source: source.to_string(),
            category: None,
            duplicate: None,
        }
    }

    /// Lowercased text the relevance and category rules match against.
    pub fn match_text(&self) -> MatchText {
        MatchText::new(&self.title, &self.description, &self.source)
    }

    pub fn is_duplicate(&self) -> bool {
        self.duplicate.as_ref().is_some_and(|flag| flag.is_duplicate)
    }
}

/// The output of one pipeline run.
///
/// Each execution produces one `Brief`, which is serialized to both JSON
/// (for downstream consumers) and Markdown (for reading).
#[derive(Debug, Serialize)]
pub struct Brief {
    /// Industry label shown in the brief heading.
    pub industry: String,
    /// The date of generation in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The local time of generation in `HH:MM:SS` format.
    pub local_time: String,
    /// Debug briefs keep duplicates and annotate every article.
    pub debug: bool,
    /// Articles in newest-first order.
    pub articles: Vec<Article>,
    pub stats: RunStats,
}
