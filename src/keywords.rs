//! Title keyword extraction.
//!
//! Reduces a headline to the set of tokens that actually say something about
//! the story: outlet suffix removed, lowercased, stopwords and domain-generic
//! terms dropped, short tokens dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Normalized set of significant lowercase words from a title.
///
/// Ordered so that overlap lists come out sorted.
pub type TokenSet = BTreeSet<String>;

/// Separator between a headline and the outlet that syndicated it,
/// e.g. `"CMS finalizes rule - Reuters"`.
pub const OUTLET_SEPARATOR: &str = " - ";

/// Tokens of this length or shorter are dropped.
const MAX_SHORT_TOKEN_LEN: usize = 2;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z0-9]+\b").expect("valid token regex"));

/// Drop a trailing `" - Outlet"` suffix, splitting on the last separator.
pub fn strip_outlet_suffix(title: &str) -> &str {
    match title.rfind(OUTLET_SEPARATOR) {
        Some(idx) => &title[..idx],
        None => title,
    }
}

/// Title form used for exact-match comparison.
pub fn normalize_title(title: &str) -> String {
    strip_outlet_suffix(title).to_lowercase().trim().to_string()
}

/// Extracts [`TokenSet`]s from titles using fixed word lists.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords: HashSet<String>,
    generic_terms: HashSet<String>,
}

impl KeywordExtractor {
    pub fn new<S, G>(stopwords: S, generic_terms: G) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
    {
        Self {
            stopwords: stopwords.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
            generic_terms: generic_terms
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn extract(&self, title: &str) -> TokenSet {
        let lowered = strip_outlet_suffix(title).to_lowercase();

        TOKEN_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| word.len() > MAX_SHORT_TOKEN_LEN)
            .filter(|word| !self.stopwords.contains(*word) && !self.generic_terms.contains(*word))
            .map(str::to_string)
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(crate::tables::STOPWORDS, crate::tables::GENERIC_TERMS)
    }
}
