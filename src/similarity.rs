//! Near-duplicate title matching.
//!
//! Plain Jaccard over a single threshold misses same-story headlines that are
//! worded differently but name the same entities, and over-matches short
//! generic titles. Three layered rules are applied instead, first match wins:
//!
//! 1. two or more shared rare tokens (length >= 7)
//! 2. four or more shared tokens with similarity >= 0.30
//! 3. similarity >= the configured threshold

use crate::keywords::{KeywordExtractor, TokenSet};
use serde::Serialize;
use std::fmt;

pub const DEFAULT_THRESHOLD: f64 = 0.40;

/// Minimum length for a shared token to count as rare.
const RARE_TOKEN_LEN: usize = 7;
const RARE_TOKEN_MIN_SHARED: usize = 2;
const MODERATE_MIN_SHARED: usize = 4;
const MODERATE_MIN_SIMILARITY: f64 = 0.30;

/// Which rule classified a pair of titles as duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatchRule {
    /// Shared rare tokens, sorted.
    RareTokens(Vec<String>),
    ModerateOverlap,
    Threshold,
}

/// Outcome of comparing two titles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityVerdict {
    pub rule: Option<MatchRule>,
    /// Jaccard similarity of the two token sets.
    pub similarity: f64,
    /// Tokens shared by both titles, sorted.
    pub overlap: Vec<String>,
}

impl SimilarityVerdict {
    fn no_signal() -> Self {
        Self {
            rule: None,
            similarity: 0.0,
            overlap: Vec::new(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.rule.is_some()
    }
}

impl fmt::Display for SimilarityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = (self.similarity * 100.0).round();
        match &self.rule {
            Some(MatchRule::RareTokens(tokens)) => {
                write!(f, "2+ rare tokens match: [{}]", tokens.join(", "))
            }
            Some(MatchRule::ModerateOverlap) => write!(f, "4+ keywords with {pct}% similarity"),
            Some(MatchRule::Threshold) => write!(f, "high similarity ({pct}%)"),
            None => write!(f, "not similar ({pct}%)"),
        }
    }
}

/// Jaccard similarity of two token sets; 0.0 when both are empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    extractor: KeywordExtractor,
    threshold: f64,
}

impl SimilarityMatcher {
    pub fn new(extractor: KeywordExtractor, threshold: f64) -> Self {
        Self {
            extractor,
            threshold,
        }
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Rule evaluation over already-extracted token sets.
    pub fn compare_tokens(&self, tokens_a: &TokenSet, tokens_b: &TokenSet) -> SimilarityVerdict {
        if tokens_a.is_empty() || tokens_b.is_empty() {
            return SimilarityVerdict::no_signal();
        }

        let overlap: Vec<String> = tokens_a.intersection(tokens_b).cloned().collect();
        let similarity = jaccard(tokens_a, tokens_b);

        let rare: Vec<String> = overlap
            .iter()
            .filter(|token| token.len() >= RARE_TOKEN_LEN)
            .cloned()
            .collect();

        let rule = if rare.len() >= RARE_TOKEN_MIN_SHARED {
            Some(MatchRule::RareTokens(rare))
        } else if overlap.len() >= MODERATE_MIN_SHARED && similarity >= MODERATE_MIN_SIMILARITY {
            Some(MatchRule::ModerateOverlap)
        } else if similarity >= self.threshold {
            Some(MatchRule::Threshold)
        } else {
            None
        };

        SimilarityVerdict {
            rule,
            similarity,
            overlap,
        }
    }
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new(KeywordExtractor::default(), DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Title-level entry points; the pipeline compares cached token sets.
    impl SimilarityMatcher {
        pub(crate) fn similar(&self, title_a: &str, title_b: &str) -> bool {
            self.verdict(title_a, title_b).is_duplicate()
        }

        pub(crate) fn verdict(&self, title_a: &str, title_b: &str) -> SimilarityVerdict {
            let tokens_a = self.extractor.extract(title_a);
            let tokens_b = self.extractor.extract(title_b);
            self.compare_tokens(&tokens_a, &tokens_b)
        }
    }

    fn matcher() -> SimilarityMatcher {
        // No word lists, so every token of length >= 3 counts.
        SimilarityMatcher::new(KeywordExtractor::new(Vec::<String>::new(), Vec::<String>::new()), DEFAULT_THRESHOLD)
    }

    #[test]
    fn test_jaccard_basic() {
        let a: TokenSet = ["one", "two", "three"].iter().map(|s| s.to_string()).collect();
        let b: TokenSet = ["two", "three", "four"].iter().map(|s| s.to_string()).collect();
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
        assert_eq!(jaccard(&TokenSet::new(), &TokenSet::new()), 0.0);
    }

    #[test]
    fn test_rare_token_override() {
        let m = SimilarityMatcher::default();
        let a = "Acme Biosciences launches Stellarix platform";
        let b = "Stellarix rollout from Acme Biosciences begins";
        let verdict = m.verdict(a, b);
        assert_eq!(
            verdict.rule,
            Some(MatchRule::RareTokens(vec![
                "biosciences".to_string(),
                "stellarix".to_string()
            ]))
        );
        assert!(m.similar(a, b));
    }

    #[test]
    fn test_rare_tokens_win_below_threshold() {
        let verdict = matcher().verdict(
            "quarterly biosciences stellarix aaa bbb ccc ddd",
            "stellarix biosciences eee fff ggg hhh iii",
        );
        assert!(verdict.similarity < DEFAULT_THRESHOLD);
        assert!(matches!(verdict.rule, Some(MatchRule::RareTokens(_))));
    }

    #[test]
    fn test_moderate_overlap_boundary_four_of_thirteen() {
        // 4 shared + 4 + 5 unique = 13 in the union, similarity ~0.31
        let a = "dog cat cow pig aaa bbb ccc ddd";
        let b = "dog cat cow pig eee fff ggg hhh iii";
        let verdict = matcher().verdict(a, b);
        assert!((verdict.similarity - 4.0 / 13.0).abs() < 1e-9);
        assert_eq!(verdict.rule, Some(MatchRule::ModerateOverlap));
    }

    #[test]
    fn test_three_of_thirteen_is_not_duplicate() {
        let a = "dog cat cow aaa bbb ccc ddd eee";
        let b = "dog cat cow fff ggg hhh iii jjj";
        let verdict = matcher().verdict(a, b);
        assert!((verdict.similarity - 3.0 / 13.0).abs() < 1e-9);
        assert!(!verdict.is_duplicate());
    }

    #[test]
    fn test_threshold_rule() {
        let verdict = matcher().verdict("dog cat cow", "dog cat pig");
        assert!((verdict.similarity - 0.5).abs() < 1e-9);
        assert_eq!(verdict.rule, Some(MatchRule::Threshold));
        assert_eq!(verdict.overlap, vec!["cat".to_string(), "dog".to_string()]);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let strict = SimilarityMatcher::new(KeywordExtractor::new(Vec::<String>::new(), Vec::<String>::new()), 0.9);
        assert!(!strict.similar("dog cat cow", "dog cat pig"));
    }

    #[test]
    fn test_empty_token_set_is_never_similar() {
        let m = SimilarityMatcher::default();
        assert!(!m.similar("The new CMS plan", "The new CMS plan"));
        assert!(!m.similar("", "Oncology network expands"));
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let m = SimilarityMatcher::default();
        let titles = [
            "Acme Biosciences launches Stellarix platform",
            "Stellarix rollout from Acme Biosciences begins",
            "Humana exits Medicare Advantage markets in three states",
            "Humana pulls out of three Medicare Advantage markets",
            "WakeMed and Aetna reach contract agreement",
            "",
        ];
        for a in &titles {
            for b in &titles {
                assert_eq!(m.similar(a, b), m.similar(b, a), "asymmetric for {a:?} / {b:?}");
                assert_eq!(m.verdict(a, b).similarity, m.verdict(b, a).similarity);
            }
        }
    }

    #[test]
    fn test_verdict_display() {
        let verdict = matcher().verdict("dog cat cow", "dog cat pig");
        assert_eq!(verdict.to_string(), "high similarity (50%)");
    }
}
