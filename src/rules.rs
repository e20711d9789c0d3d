//! Ordered "first match wins" rule evaluation.
//!
//! Relevance stages and category rules are both ordered lists of
//! `(predicate, outcome)` pairs. Each list is evaluated with [`first_match`],
//! so the order in the list is the only source of priority.

/// A single rule evaluated against a context.
pub trait Rule<C: ?Sized> {
    type Outcome;

    /// `Some(outcome)` if the rule fires for `ctx`.
    fn evaluate(&self, ctx: &C) -> Option<Self::Outcome>;
}

/// Outcome of the first rule in `rules` that fires, or `None`.
pub fn first_match<'r, C, R, I>(rules: I, ctx: &C) -> Option<R::Outcome>
where
    C: ?Sized,
    R: Rule<C> + 'r,
    I: IntoIterator<Item = &'r R>,
{
    rules.into_iter().find_map(|rule| rule.evaluate(ctx))
}

/// Lowercased text a rule is matched against.
#[derive(Debug, Clone)]
pub struct MatchText {
    /// `title + " " + description`, lowercased.
    pub content: String,
    /// Outlet label, lowercased.
    pub source: String,
}

impl MatchText {
    pub fn new(title: &str, description: &str, source: &str) -> Self {
        Self {
            content: format!("{title} {description}").to_lowercase(),
            source: source.to_lowercase(),
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.content.contains(needle)
    }
}

/// First term from `terms` found as a substring of `haystack`.
pub fn find_term<'t>(haystack: &str, terms: &'t [String]) -> Option<&'t str> {
    terms
        .iter()
        .map(String::as_str)
        .find(|term| haystack.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Threshold(i32, &'static str);

    impl Rule<i32> for Threshold {
        type Outcome = &'static str;

        fn evaluate(&self, ctx: &i32) -> Option<Self::Outcome> {
            (*ctx >= self.0).then_some(self.1)
        }
    }

    #[test]
    fn test_first_match_respects_order() {
        let rules = vec![Threshold(10, "big"), Threshold(5, "medium"), Threshold(0, "small")];
        assert_eq!(first_match(&rules, &12), Some("big"));
        assert_eq!(first_match(&rules, &7), Some("medium"));
        assert_eq!(first_match(&rules, &1), Some("small"));
        assert_eq!(first_match(&rules, &-3), None);

        let reversed: Vec<Threshold> = rules.into_iter().rev().collect();
        assert_eq!(first_match(&reversed, &12), Some("small"));
    }

    #[test]
    fn test_first_match_empty() {
        let rules: Vec<Threshold> = Vec::new();
        assert_eq!(first_match(&rules, &1), None);
    }

    #[test]
    fn test_match_text_lowercases() {
        let text = MatchText::new("CMS Finalizes", "Medicare RULE", "Fierce Healthcare");
        assert_eq!(text.content, "cms finalizes medicare rule");
        assert_eq!(text.source, "fierce healthcare");
        assert!(text.contains("finalizes medicare"));
    }

    #[test]
    fn test_find_term() {
        let terms = vec!["soccer".to_string(), "nba".to_string()];
        assert_eq!(find_term("the nba finals", &terms), Some("nba"));
        assert_eq!(find_term("aco results", &terms), None);
    }
}
