//! Multi-stage relevance gate.
//!
//! Every stage is an early-exit rejection. Blocklists run before the keyword
//! gate, so an off-topic article is never rescued by an incidental keyword
//! match. Stages 1-2 look at the outlet name, the rest at title + description.

use crate::models::Article;
use crate::rules::{MatchText, Rule, find_term, first_match};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Relevance stage that rejected an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SourceBlocklist,
    SourceSpam,
    ContentSpam,
    Geographic,
    Disambiguation,
    TopicExclusion,
    MissingKeyword,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SourceBlocklist => "source_blocklist",
            Stage::SourceSpam => "source_spam",
            Stage::ContentSpam => "content_spam",
            Stage::Geographic => "geographic",
            Stage::Disambiguation => "disambiguation",
            Stage::TopicExclusion => "topic_exclusion",
            Stage::MissingKeyword => "missing_keyword",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub stage: Stage,
    /// Term (or rule description) that triggered the rejection.
    pub matched: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched.is_empty() {
            write!(f, "{}", self.stage)
        } else {
            write!(f, "{} ({})", self.stage, self.matched)
        }
    }
}

fn lowercase_all(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

/// An acronym or brand name the domain shares with unrelated subjects.
///
/// Rejects when `term` appears together with a disqualifier, or when `term`
/// appears without any `context` term. If `ambiguity_signals` is non-empty the
/// context requirement only applies when one of the signals is present.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisambiguationRule {
    pub term: String,
    #[serde(default)]
    pub context: Vec<String>,
    #[serde(default)]
    pub ambiguity_signals: Vec<String>,
    #[serde(default)]
    pub disqualifiers: Vec<String>,
}

impl DisambiguationRule {
    fn lowercased(&self) -> Self {
        Self {
            term: self.term.to_lowercase(),
            context: lowercase_all(&self.context),
            ambiguity_signals: lowercase_all(&self.ambiguity_signals),
            disqualifiers: lowercase_all(&self.disqualifiers),
        }
    }

    fn check(&self, text: &MatchText) -> Option<String> {
        if !text.contains(&self.term) {
            return None;
        }

        if let Some(disqualifier) = find_term(&text.content, &self.disqualifiers) {
            return Some(format!("{} with {disqualifier}", self.term));
        }

        if self.context.is_empty() {
            return None;
        }

        let ambiguous = self.ambiguity_signals.is_empty()
            || find_term(&text.content, &self.ambiguity_signals).is_some();
        if ambiguous && find_term(&text.content, &self.context).is_none() {
            return Some(format!("{} without domain context", self.term));
        }

        None
    }
}

/// Blocklists and disambiguation rules for the relevance filter.
///
/// Lists left out of a config file keep their built-in defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterTables {
    pub blocked_sources: Vec<String>,
    pub source_spam_patterns: Vec<String>,
    pub spam_terms: Vec<String>,
    pub geographic_exclusions: Vec<String>,
    pub disambiguation: Vec<DisambiguationRule>,
    pub topic_exclusions: Vec<String>,
}

impl Default for FilterTables {
    fn default() -> Self {
        crate::tables::default_filter_tables()
    }
}

#[derive(Debug, Clone)]
enum FilterStage {
    Source { stage: Stage, terms: Vec<String> },
    Content { stage: Stage, terms: Vec<String> },
    Disambiguation(DisambiguationRule),
}

impl Rule<MatchText> for FilterStage {
    type Outcome = Rejection;

    fn evaluate(&self, text: &MatchText) -> Option<Rejection> {
        match self {
            FilterStage::Source { stage, terms } => {
                find_term(&text.source, terms).map(|term| Rejection {
                    stage: *stage,
                    matched: term.to_string(),
                })
            }
            FilterStage::Content { stage, terms } => {
                find_term(&text.content, terms).map(|term| Rejection {
                    stage: *stage,
                    matched: term.to_string(),
                })
            }
            FilterStage::Disambiguation(rule) => rule.check(text).map(|matched| Rejection {
                stage: Stage::Disambiguation,
                matched,
            }),
        }
    }
}

/// Accept/reject gate for candidate articles. Independent of dedup state.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    stages: Vec<FilterStage>,
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub fn new(tables: &FilterTables, keywords: &[String]) -> Self {
        let mut stages = vec![
            FilterStage::Source {
                stage: Stage::SourceBlocklist,
                terms: lowercase_all(&tables.blocked_sources),
            },
            FilterStage::Source {
                stage: Stage::SourceSpam,
                terms: lowercase_all(&tables.source_spam_patterns),
            },
            FilterStage::Content {
                stage: Stage::ContentSpam,
                terms: lowercase_all(&tables.spam_terms),
            },
            FilterStage::Content {
                stage: Stage::Geographic,
                terms: lowercase_all(&tables.geographic_exclusions),
            },
        ];
        stages.extend(
            tables
                .disambiguation
                .iter()
                .map(|rule| FilterStage::Disambiguation(rule.lowercased())),
        );
        stages.push(FilterStage::Content {
            stage: Stage::TopicExclusion,
            terms: lowercase_all(&tables.topic_exclusions),
        });

        Self {
            stages,
            keywords: lowercase_all(keywords)
                .into_iter()
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// `Ok(())` if the article passes every stage, else the first rejection.
    pub fn assess(&self, article: &Article) -> Result<(), Rejection> {
        let text = article.match_text();

        if let Some(rejection) = first_match(&self.stages, &text) {
            return Err(rejection);
        }

        match find_term(&text.content, &self.keywords) {
            Some(keyword) => {
                debug!(title = %article.title, %keyword, "Article matched domain keyword");
                Ok(())
            }
            None => Err(Rejection {
                stage: Stage::MissingKeyword,
                matched: String::new(),
            }),
        }
    }
}
