//! One filtering pass over a batch of ingested articles.
//!
//! raw record -> normalize -> newest-first sort -> relevance filter ->
//! dedup (or annotate, in debug mode) -> categorize -> `max_articles` cut.

use crate::categorize::Categorizer;
use crate::config::Config;
use crate::dedup::Deduplicator;
use crate::keywords::KeywordExtractor;
use crate::models::{Article, RawArticle};
use crate::relevance::{RelevanceFilter, Stage};
use crate::similarity::SimilarityMatcher;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Whether duplicates are dropped or kept and annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Standard,
    Debug,
}

/// Counts for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub received: usize,
    /// Records dropped for a missing or blank title.
    pub malformed: usize,
    pub rejected: BTreeMap<Stage, usize>,
    pub duplicates: BTreeMap<String, usize>,
    pub accepted: usize,
    /// Unique articles cut by `max_articles`.
    pub truncated: usize,
    pub categories: BTreeMap<String, usize>,
}

impl RunStats {
    pub fn total_rejected(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn total_duplicates(&self) -> usize {
        self.duplicates.values().sum()
    }
}

#[derive(Debug)]
pub struct PipelineReport {
    pub articles: Vec<Article>,
    pub stats: RunStats,
}

/// Relevance filter, similarity matcher and categorizer built once from config.
#[derive(Debug, Clone)]
pub struct Pipeline {
    filter: RelevanceFilter,
    matcher: SimilarityMatcher,
    categorizer: Categorizer,
    /// 0 keeps everything.
    max_articles: usize,
}

impl Pipeline {
    pub fn new(
        filter: RelevanceFilter,
        matcher: SimilarityMatcher,
        categorizer: Categorizer,
        max_articles: usize,
    ) -> Self {
        Self {
            filter,
            matcher,
            categorizer,
            max_articles,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let extractor =
            KeywordExtractor::new(&config.tokenizer.stopwords, &config.tokenizer.generic_terms);
        Self::new(
            RelevanceFilter::new(&config.filters, &config.keywords),
            SimilarityMatcher::new(extractor, config.similarity_threshold),
            Categorizer::new(&config.categories),
            config.max_articles,
        )
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn run(&self, raw: Vec<RawArticle>, mode: Mode) -> PipelineReport {
        self.run_at(raw, mode, Utc::now())
    }

    /// Same as [`Pipeline::run`] with an explicit processing time.
    #[instrument(level = "info", skip_all, fields(count = raw.len(), mode = ?mode))]
    pub fn run_at(&self, raw: Vec<RawArticle>, mode: Mode, now: DateTime<Utc>) -> PipelineReport {
        let mut stats = RunStats {
            received: raw.len(),
            ..Default::default()
        };

        let mut articles: Vec<Article> = raw
            .into_iter()
            .filter_map(|record| record.into_article(now))
            .collect();
        stats.malformed = stats.received - articles.len();

        // Stable, so equal timestamps keep ingestion order.
        articles.sort_by(|a, b| b.published.cmp(&a.published));

        let relevant: Vec<Article> = articles
            .into_iter()
            .filter(|article| match self.filter.assess(article) {
                Ok(()) => true,
                Err(rejection) => {
                    debug!(title = %article.title, source = %article.source, %rejection, "Rejected article");
                    *stats.rejected.entry(rejection.stage).or_default() += 1;
                    false
                }
            })
            .collect();

        let mut dedup = Deduplicator::new(&self.matcher);
        let mut output = match mode {
            Mode::Standard => dedup.dedup(relevant),
            Mode::Debug => dedup.annotate(relevant),
        };
        stats.duplicates = dedup
            .counts()
            .iter()
            .map(|(kind, count)| (kind.to_string(), *count))
            .collect();
        stats.accepted = dedup.state().len();

        if mode == Mode::Standard && self.max_articles > 0 && output.len() > self.max_articles {
            stats.truncated = output.len() - self.max_articles;
            output.truncate(self.max_articles);
        }

        for article in &mut output {
            article.category = Some(self.categorizer.categorize(article));
        }
        stats.categories = output
            .iter()
            .filter(|article| !article.is_duplicate())
            .filter_map(|article| article.category.clone())
            .counts()
            .into_iter()
            .collect();

        info!(
            received = stats.received,
            malformed = stats.malformed,
            rejected = stats.total_rejected(),
            duplicates = stats.total_duplicates(),
            accepted = stats.accepted,
            truncated = stats.truncated,
            "Pipeline run complete"
        );
        for (category, count) in &stats.categories {
            debug!(%category, count, "Category breakdown");
        }

        PipelineReport {
            articles: output,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 11, 12, 0, 0).unwrap()
    }

    fn raw(title: &str, link: &str, description: &str, source: &str, hours_ago: i64) -> RawArticle {
        RawArticle {
            title: Some(title.to_string()),
            link: link.to_string(),
            description: description.to_string(),
            published: Some(now() - Duration::hours(hours_ago)),
            source: source.to_string(),
        }
    }

    fn scenario_config() -> Config {
        Config {
            keywords: vec!["value-based care".to_string()],
            ..Config::default()
        }
    }

    fn scenario() -> Vec<RawArticle> {
        let description = "The Medicare payment rule takes effect in January.";
        vec![
            raw(
                "CMS finalizes new rule for value-based care",
                "https://healthnews.example/cms-rule",
                description,
                "HealthNews",
                1,
            ),
            raw(
                "CMS finalizes new rule for value-based care",
                "https://otherwire.example/cms-rule",
                description,
                "OtherWire",
                2,
            ),
            raw(
                "Local team wins basketball tournament",
                "https://sportsdaily.example/final",
                "",
                "SportsDaily",
                3,
            ),
        ]
    }

    #[test]
    fn test_end_to_end_scenario() {
        let pipeline = Pipeline::from_config(&scenario_config());
        let report = pipeline.run_at(scenario(), Mode::Standard, now());

        assert_eq!(report.articles.len(), 1);
        let article = &report.articles[0];
        assert_eq!(article.source, "HealthNews");
        assert_eq!(article.category.as_deref(), Some("CMS Rules & Policy"));

        assert_eq!(report.stats.received, 3);
        assert_eq!(report.stats.rejected.get(&Stage::TopicExclusion), Some(&1));
        assert_eq!(report.stats.duplicates.get("exact_title"), Some(&1));
        assert_eq!(report.stats.accepted, 1);
        assert_eq!(report.stats.categories.get("CMS Rules & Policy"), Some(&1));
    }

    #[test]
    fn test_end_to_end_titles_only() {
        let batch = scenario()
            .into_iter()
            .map(|mut article| {
                article.description = String::new();
                article
            })
            .collect();
        let report = Pipeline::from_config(&scenario_config()).run_at(batch, Mode::Standard, now());

        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.articles[0].source, "HealthNews");
        assert_eq!(report.articles[0].category.as_deref(), Some("CMS Rules & Policy"));
        assert_eq!(report.stats.rejected.get(&Stage::TopicExclusion), Some(&1));
        assert_eq!(report.stats.rejected.get(&Stage::Disambiguation), None);
        assert_eq!(report.stats.duplicates.get("exact_title"), Some(&1));
    }

    #[test]
    fn test_end_to_end_debug_mode_marks_duplicate() {
        let pipeline = Pipeline::from_config(&scenario_config());
        let report = pipeline.run_at(scenario(), Mode::Debug, now());

        assert_eq!(report.articles.len(), 2);
        assert!(!report.articles[0].is_duplicate());
        assert!(report.articles[1].is_duplicate());
        assert_eq!(report.articles[1].source, "OtherWire");
        assert_eq!(
            report.articles[1]
                .duplicate
                .as_ref()
                .and_then(|f| f.duplicate_reason.as_deref()),
            Some("exact title match")
        );
        assert!(report.articles.iter().all(|a| a.category.is_some()));
        assert_eq!(report.stats.categories.get("CMS Rules & Policy"), Some(&1));
    }

    #[test]
    fn test_newest_copy_survives_regardless_of_input_order() {
        let pipeline = Pipeline::from_config(&scenario_config());
        let mut input = scenario();
        input.reverse();
        let report = pipeline.run_at(input, Mode::Standard, now());
        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.articles[0].source, "HealthNews");
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let pipeline = Pipeline::from_config(&scenario_config());
        let mut input = scenario();
        input.push(RawArticle {
            title: None,
            link: "https://x".to_string(),
            description: "value-based care".to_string(),
            ..Default::default()
        });
        let report = pipeline.run_at(input, Mode::Standard, now());
        assert_eq!(report.stats.malformed, 1);
        assert_eq!(report.articles.len(), 1);
    }

    #[test]
    fn test_max_articles_cut() {
        let config = Config {
            keywords: vec!["aco".to_string()],
            max_articles: 2,
            ..Config::default()
        };
        let pipeline = Pipeline::from_config(&config);
        let input = vec![
            raw("Oncology ACO expands network", "https://a/1", "", "A", 1),
            raw("WakeMed ACO reaches Aetna deal", "https://a/2", "", "B", 2),
            raw("Rural ACO posts shared savings", "https://a/3", "", "C", 3),
        ];
        let report = pipeline.run_at(input, Mode::Standard, now());
        assert_eq!(report.articles.len(), 2);
        assert_eq!(report.stats.truncated, 1);
        assert_eq!(report.articles[0].link, "https://a/1");
    }

    #[test]
    fn test_output_has_unique_links_and_categories() {
        let config = Config {
            keywords: vec!["aco".to_string()],
            max_articles: 0,
            ..Config::default()
        };
        let pipeline = Pipeline::from_config(&config);
        let input = vec![
            raw("Oncology ACO expands network", "https://a/1", "", "A", 1),
            raw("Different ACO headline entirely", "https://a/1", "", "B", 2),
            raw("Rural ACO posts shared savings", "https://a/3", "", "C", 3),
        ];
        let report = pipeline.run_at(input, Mode::Standard, now());
        let links: Vec<&str> = report.articles.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links, vec!["https://a/1", "https://a/3"]);
        assert!(report.articles.iter().all(|a| a.category.is_some() && !a.title.is_empty()));
        assert_eq!(report.articles[1].category.as_deref(), Some("ACO Performance"));
    }
}
