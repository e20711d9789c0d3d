//! Markdown rendering of a [`Brief`].
//!
//! A standard brief groups articles under one heading per category, in the
//! categorizer's priority order with "Other" last. A debug brief lists every
//! article in pipeline order and marks duplicates with the reason they were
//! flagged.

use crate::models::{Article, Brief};
use crate::utils::slugify_title;
use itertools::Itertools;
use std::fmt::Write;

const PUBLISHED_FORMAT: &str = "%b %d, %Y %H:%M UTC";

/// Render `brief` as Markdown.
///
/// `category_order` is the heading order for a standard brief; categories
/// present in the brief but missing from it are appended in first-seen order.
pub fn brief_to_markdown(brief: &Brief, category_order: &[String]) -> String {
    if brief.debug {
        debug_markdown(brief)
    } else {
        standard_markdown(brief, category_order)
    }
}

fn category_of(article: &Article) -> &str {
    article.category.as_deref().unwrap_or(crate::categorize::FALLBACK_CATEGORY)
}

fn write_article_meta(md: &mut String, article: &Article) {
    writeln!(
        md,
        "*{}* · {}\n",
        article.source,
        article.published.format(PUBLISHED_FORMAT)
    ).unwrap();
}

fn write_description(md: &mut String, article: &Article) {
    if !article.description.is_empty() {
        writeln!(md, "{}\n", article.description).unwrap();
    }
}

fn standard_markdown(brief: &Brief, category_order: &[String]) -> String {
    let mut md = String::new();
    writeln!(md, "# {} News Brief\n", brief.industry).unwrap();
    writeln!(md, "_Generated {} at {}_\n", brief.local_date, brief.local_time).unwrap();
    writeln!(
        md,
        "**{} articles** from {} candidates ({} filtered out, {} duplicates removed)\n",
        brief.articles.len(),
        brief.stats.received,
        brief.stats.total_rejected() + brief.stats.malformed,
        brief.stats.total_duplicates(),
    ).unwrap();

    if brief.articles.is_empty() {
        md.push_str("No relevant articles found.\n");
        return md;
    }

    let extra = brief
        .articles
        .iter()
        .map(category_of)
        .filter(|label| !category_order.iter().any(|known| known.as_str() == *label))
        .unique()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let sections: Vec<(&str, Vec<&Article>)> = category_order
        .iter()
        .chain(extra.iter())
        .map(|label| {
            let articles = brief
                .articles
                .iter()
                .filter(|article| category_of(article) == label.as_str())
                .collect::<Vec<_>>();
            (label.as_str(), articles)
        })
        .filter(|(_, articles)| !articles.is_empty())
        .collect();

    md.push_str("## Contents\n\n");
    for (label, articles) in &sections {
        writeln!(
            md,
            "- [{label}](#{}) ({})",
            slugify_title(label),
            articles.len()
        ).unwrap();
    }
    md.push('\n');

    for (label, articles) in &sections {
        writeln!(md, "## {label}\n").unwrap();
        for article in articles {
            writeln!(md, "### [{}]({})\n", article.title, article.link).unwrap();
            write_article_meta(&mut md, article);
            write_description(&mut md, article);
        }
    }

    md
}

fn debug_markdown(brief: &Brief) -> String {
    let duplicates = brief.articles.iter().filter(|a| a.is_duplicate()).count();

    let mut md = String::new();
    writeln!(md, "# {} News Brief (Debug)\n", brief.industry).unwrap();
    writeln!(md, "_Generated {} at {}_\n", brief.local_date, brief.local_time).unwrap();
    writeln!(md, "- **Total articles:** {}", brief.articles.len()).unwrap();
    writeln!(md, "- **Unique articles:** {}", brief.articles.len() - duplicates).unwrap();
    writeln!(md, "- **Duplicates detected:** {duplicates}").unwrap();
    writeln!(
        md,
        "- **Rejected by relevance filter:** {}\n",
        brief.stats.total_rejected()
    ).unwrap();
    for (stage, count) in &brief.stats.rejected {
        writeln!(md, "  - `{stage}`: {count}").unwrap();
    }
    if !brief.stats.rejected.is_empty() {
        md.push('\n');
    }

    md.push_str("## All Articles\n\n");
    for (idx, article) in brief.articles.iter().enumerate() {
        let marker = if article.is_duplicate() { " **[DUPLICATE]**" } else { "" };
        writeln!(md, "### {}. {}{marker}\n", idx + 1, article.title).unwrap();
        writeln!(
            md,
            "*Source: {} | Published: {} | Category: {}*\n",
            article.source,
            article.published.format(PUBLISHED_FORMAT),
            category_of(article)
        ).unwrap();

        if let Some(flag) = article.duplicate.as_ref().filter(|f| f.is_duplicate) {
            let reason = flag.duplicate_reason.as_deref().unwrap_or("unknown reason");
            writeln!(md, "> Duplicate reason: {reason}").unwrap();
            if !flag.duplicate_keywords.is_empty() {
                writeln!(
                    md,
                    "> Matching keywords: {}",
                    flag.duplicate_keywords.join(", ")
                ).unwrap();
            }
            md.push('\n');
        }

        write_description(&mut md, article);
        writeln!(md, "[Read more]({})\n", article.link).unwrap();
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DuplicateFlag;
    use crate::pipeline::RunStats;
    use chrono::{TimeZone, Utc};

    fn article(title: &str, link: &str, category: &str) -> Article {
        let mut a = Article::new(
            title,
            link,
            "Summary text.",
            Utc.with_ymd_and_hms(2025, 11, 11, 12, 30, 0).unwrap(),
            "Wire",
        );
        a.category = Some(category.to_string());
        a
    }

    fn brief(articles: Vec<Article>, debug: bool) -> Brief {
        Brief {
            industry: "Healthcare".to_string(),
            local_date: "2025-11-11".to_string(),
            local_time: "07:30:00".to_string(),
            debug,
            articles,
            stats: RunStats::default(),
        }
    }

    fn order() -> Vec<String> {
        vec![
            "CMS Rules & Policy".to_string(),
            "ACO Performance".to_string(),
            "Other".to_string(),
        ]
    }

    #[test]
    fn test_standard_groups_in_category_order() {
        let md = brief_to_markdown(
            &brief(
                vec![
                    article("Misc story", "https://a/3", "Other"),
                    article("ACO saves $12M", "https://a/2", "ACO Performance"),
                    article("CMS finalizes rule", "https://a/1", "CMS Rules & Policy"),
                ],
                false,
            ),
            &order(),
        );

        assert!(md.starts_with("# Healthcare News Brief\n"));
        let cms = md.find("## CMS Rules & Policy").unwrap();
        let aco = md.find("## ACO Performance").unwrap();
        let other = md.find("## Other").unwrap();
        assert!(cms < aco && aco < other);
        assert!(md.contains("- [CMS Rules & Policy](#cms-rules--policy) (1)"));
        assert!(md.contains("### [ACO saves $12M](https://a/2)"));
        assert!(md.contains("*Wire* · Nov 11, 2025 12:30 UTC"));
        assert!(!md.contains("DUPLICATE"));
    }

    #[test]
    fn test_standard_skips_empty_categories_and_keeps_unknown() {
        let md = brief_to_markdown(
            &brief(vec![article("Beer news", "https://a/1", "Beer")], false),
            &order(),
        );
        assert!(!md.contains("## CMS Rules & Policy"));
        assert!(md.contains("## Beer"));
    }

    #[test]
    fn test_standard_empty_brief() {
        let md = brief_to_markdown(&brief(Vec::new(), false), &order());
        assert!(md.contains("No relevant articles found."));
        assert!(!md.contains("## Contents"));
    }

    #[test]
    fn test_debug_marks_duplicates_with_reason() {
        let unique = {
            let mut a = article("Acme Biosciences launches Stellarix platform", "https://a/1", "Other");
            a.duplicate = Some(DuplicateFlag::unique());
            a
        };
        let dup = {
            let mut a = article("Stellarix rollout from Acme Biosciences begins", "https://a/2", "Other");
            a.duplicate = Some(DuplicateFlag {
                is_duplicate: true,
                duplicate_reason: Some("fuzzy match: 2+ rare tokens match: [biosciences, stellarix]".to_string()),
                duplicate_similarity: Some(0.5),
                duplicate_keywords: vec!["acme".to_string(), "biosciences".to_string()],
            });
            a
        };

        let md = brief_to_markdown(&brief(vec![unique, dup], true), &order());
        assert!(md.starts_with("# Healthcare News Brief (Debug)\n"));
        assert!(md.contains("- **Duplicates detected:** 1"));
        assert!(md.contains("### 1. Acme Biosciences launches Stellarix platform\n"));
        assert!(md.contains("### 2. Stellarix rollout from Acme Biosciences begins **[DUPLICATE]**"));
        assert!(md.contains("> Duplicate reason: fuzzy match: 2+ rare tokens match"));
        assert!(md.contains("> Matching keywords: acme, biosciences"));
        assert_eq!(md.matches("[DUPLICATE]").count(), 1);
    }
}
