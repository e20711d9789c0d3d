//! Topical categorization by ordered trigger phrases.

use crate::models::Article;
use crate::rules::{MatchText, Rule, find_term, first_match};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Label given to articles no category rule matched.
pub const FALLBACK_CATEGORY: &str = "Other";

/// A category and the substrings that select it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryRule {
    pub label: String,
    pub triggers: Vec<String>,
}

impl Rule<MatchText> for CategoryRule {
    type Outcome = String;

    fn evaluate(&self, text: &MatchText) -> Option<String> {
        find_term(&text.content, &self.triggers).map(|_| self.label.clone())
    }
}

/// Assigns exactly one label per article. The first rule with a matching
/// trigger wins, so rule order is part of the output contract.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    pub fn new(rules: &[CategoryRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|rule| CategoryRule {
                    label: rule.label.clone(),
                    triggers: rule.triggers.iter().map(|t| t.to_lowercase()).collect(),
                })
                .collect(),
        }
    }

    pub fn categorize(&self, article: &Article) -> String {
        first_match(&self.rules, &article.match_text())
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
    }

    /// Labels in priority order, followed by the fallback.
    pub fn labels(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|rule| rule.label.clone())
            .chain(std::iter::once(FALLBACK_CATEGORY.to_string()))
            .unique()
            .collect()
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(&crate::tables::default_categories())
    }
}
