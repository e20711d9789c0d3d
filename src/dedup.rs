//! Batch-scoped duplicate detection.
//!
//! Candidates are checked in input order (newest first), so the earliest-seen
//! copy of a story survives. A candidate is a duplicate when its link was
//! already accepted, its normalized title equals an accepted one, or the
//! similarity matcher pairs it with any accepted title.

use crate::keywords::{TokenSet, normalize_title};
use crate::models::{Article, DuplicateFlag};
use crate::similarity::{SimilarityMatcher, SimilarityVerdict};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum DuplicateReason {
    Url,
    ExactTitle,
    Fuzzy(SimilarityVerdict),
}

impl DuplicateReason {
    /// Short label used for statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            DuplicateReason::Url => "url",
            DuplicateReason::ExactTitle => "exact_title",
            DuplicateReason::Fuzzy(_) => "fuzzy_title",
        }
    }

    pub fn to_flag(&self) -> DuplicateFlag {
        let (similarity, keywords) = match self {
            DuplicateReason::Fuzzy(verdict) => (Some(verdict.similarity), verdict.overlap.clone()),
            _ => (None, Vec::new()),
        };
        DuplicateFlag {
            is_duplicate: true,
            duplicate_reason: Some(self.to_string()),
            duplicate_similarity: similarity,
            duplicate_keywords: keywords,
        }
    }
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateReason::Url => f.write_str("duplicate URL"),
            DuplicateReason::ExactTitle => f.write_str("exact title match"),
            DuplicateReason::Fuzzy(verdict) => write!(f, "fuzzy match: {verdict}"),
        }
    }
}

/// What has been accepted so far in this batch. Only grows.
#[derive(Debug, Default, Clone)]
pub struct DedupState {
    seen_urls: HashSet<String>,
    seen_normalized: HashSet<String>,
    /// Token sets of accepted titles, in acceptance order.
    seen_titles: Vec<TokenSet>,
}

impl DedupState {
    pub fn len(&self) -> usize {
        self.seen_titles.len()
    }

    pub fn has_url(&self, link: &str) -> bool {
        self.seen_urls.contains(link)
    }
}

/// Owns the [`DedupState`] for exactly one batch.
#[derive(Debug)]
pub struct Deduplicator<'m> {
    matcher: &'m SimilarityMatcher,
    state: DedupState,
    counts: BTreeMap<&'static str, usize>,
}

impl<'m> Deduplicator<'m> {
    pub fn new(matcher: &'m SimilarityMatcher) -> Self {
        Self {
            matcher,
            state: DedupState::default(),
            counts: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> &DedupState {
        &self.state
    }

    /// Duplicates found so far, keyed by [`DuplicateReason::kind`].
    pub fn counts(&self) -> &BTreeMap<&'static str, usize> {
        &self.counts
    }

    /// Check a candidate against the accepted set without recording it.
    pub fn check(&self, article: &Article) -> Option<DuplicateReason> {
        if self.state.has_url(&article.link) {
            return Some(DuplicateReason::Url);
        }

        if self.state.seen_normalized.contains(&normalize_title(&article.title)) {
            return Some(DuplicateReason::ExactTitle);
        }

        let tokens = self.matcher.extractor().extract(&article.title);
        self.state
            .seen_titles
            .iter()
            .map(|seen_tokens| self.matcher.compare_tokens(&tokens, seen_tokens))
            .find(SimilarityVerdict::is_duplicate)
            .map(DuplicateReason::Fuzzy)
    }

    /// Record an article as accepted.
    pub fn accept(&mut self, article: &Article) {
        self.state.seen_urls.insert(article.link.clone());
        self.state.seen_normalized.insert(normalize_title(&article.title));
        let tokens = self.matcher.extractor().extract(&article.title);
        self.state.seen_titles.push(tokens);
    }

    /// Check a candidate and accept it if unique.
    pub fn observe(&mut self, article: &Article) -> Option<DuplicateReason> {
        match self.check(article) {
            Some(reason) => {
                debug!(title = %article.title, reason = %reason, "Duplicate article");
                *self.counts.entry(reason.kind()).or_default() += 1;
                Some(reason)
            }
            None => {
                self.accept(article);
                None
            }
        }
    }

    /// Standard mode: keep unique articles, in input order.
    pub fn dedup(&mut self, articles: Vec<Article>) -> Vec<Article> {
        articles
            .into_iter()
            .filter(|article| self.observe(article).is_none())
            .collect()
    }

    /// Debug mode: keep every article and attach its duplicate verdict.
    pub fn annotate(&mut self, articles: Vec<Article>) -> Vec<Article> {
        articles
            .into_iter()
            .map(|mut article| {
                let flag = match self.observe(&article) {
                    Some(reason) => reason.to_flag(),
                    None => DuplicateFlag::unique(),
                };
                article.duplicate = Some(flag);
                article
            })
            .collect()
    }
}
