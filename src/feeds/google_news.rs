//! Google News RSS search.
//!
//! Each configured query is sent as `<query> when:<period>` to the public
//! search feed. Results come back as RSS 2.0 and go through the same parser
//! as ordinary feeds; the per-item `<source>` element names the outlet.

use super::rss::{FeedEntry, fetch_text, parse_feed};
use crate::config::GoogleNewsConfig;
use crate::models::RawArticle;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::error::Error;
use tracing::{error, info, instrument};
use url::Url;

const SEARCH_URL: &str = "https://news.google.com/rss/search";

/// Used when neither a `<source>` element nor a parseable link is present.
const UNKNOWN_SOURCE: &str = "Unknown";

/// Build the RSS search URL for one query.
///
/// ```ignore
/// // https://news.google.com/rss/search?q=aco%20when%3A7d&hl=en-US&gl=US&ceid=US:en
/// search_url("aco", &GoogleNewsConfig::default());
/// ```
pub fn search_url(query: &str, config: &GoogleNewsConfig) -> String {
    let q = format!("{} when:{}", query.trim(), config.period);
    format!(
        "{SEARCH_URL}?q={}&hl={lang}-{country}&gl={country}&ceid={country}:{lang}",
        urlencoding::encode(&q),
        lang = config.language,
        country = config.country,
    )
}

/// Host of `link` without a leading `www.`, if it parses as a URL.
pub fn source_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?;
    Some(host.trim_start_matches("www.").to_string())
}

/// Map a search result to a raw article.
///
/// An empty description falls back to the title, so the relevance and
/// category rules still have text to match against.
pub fn entry_to_article(entry: FeedEntry) -> RawArticle {
    let source = entry
        .source
        .or_else(|| source_from_link(&entry.link))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());
    let description = if entry.description.is_empty() {
        entry.title.clone().unwrap_or_default()
    } else {
        entry.description
    };

    RawArticle {
        title: entry.title,
        link: entry.link,
        description,
        published: entry.published,
        source,
    }
}

#[instrument(level = "info", skip(client, config))]
async fn search_query(
    client: &Client,
    query: &str,
    config: &GoogleNewsConfig,
) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let url = search_url(query, config);
    let body = fetch_text(client, &url).await?;
    let articles: Vec<RawArticle> = parse_feed(&body)?
        .into_iter()
        .take(config.max_results_per_query)
        .map(entry_to_article)
        .collect();
    info!(count = articles.len(), "Google News results");
    Ok(articles)
}

/// Run every configured search query in turn.
///
/// Failed queries are logged and skipped.
#[instrument(level = "info", skip_all, fields(queries = config.search_queries.len()))]
pub async fn search_queries(client: &Client, config: &GoogleNewsConfig) -> Vec<RawArticle> {
    let batches: Vec<Vec<RawArticle>> = stream::iter(&config.search_queries)
        .then(|query| async move {
            match search_query(client, query, config).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(error = %e, %query, "Google News search failed");
                    Vec::new()
                }
            }
        })
        .collect()
        .await;

    let articles: Vec<RawArticle> = batches.into_iter().flatten().collect();
    info!(count = articles.len(), "Fetched Google News articles");
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let config = GoogleNewsConfig::default();
        assert_eq!(
            search_url("value-based care", &config),
            "https://news.google.com/rss/search?q=value-based%20care%20when%3A7d&hl=en-US&gl=US&ceid=US:en"
        );
    }

    #[test]
    fn test_search_url_custom_locale() {
        let config = GoogleNewsConfig {
            period: "24h".to_string(),
            language: "fr".to_string(),
            country: "CA".to_string(),
            ..GoogleNewsConfig::default()
        };
        let url = search_url("ACO", &config);
        assert!(url.contains("q=ACO%20when%3A24h"));
        assert!(url.ends_with("&hl=fr-CA&gl=CA&ceid=CA:fr"));
    }

    #[test]
    fn test_source_from_link() {
        assert_eq!(
            source_from_link("https://www.fiercehealthcare.com/payers/x"),
            Some("fiercehealthcare.com".to_string())
        );
        assert_eq!(source_from_link("not a url"), None);
    }

    #[test]
    fn test_entry_prefers_source_element() {
        let entry = FeedEntry {
            title: Some("ACO saves $12M - Becker's".to_string()),
            link: "https://news.google.com/rss/articles/abc".to_string(),
            description: "ACO saves $12M".to_string(),
            published: None,
            source: Some("Becker's Hospital Review".to_string()),
        };
        let raw = entry_to_article(entry);
        assert_eq!(raw.source, "Becker's Hospital Review");
        assert_eq!(raw.description, "ACO saves $12M");
    }

    #[test]
    fn test_entry_falls_back_to_link_host_and_title() {
        let entry = FeedEntry {
            title: Some("MSSP results released".to_string()),
            link: "https://www.cms.gov/newsroom/mssp".to_string(),
            ..FeedEntry::default()
        };
        let raw = entry_to_article(entry);
        assert_eq!(raw.source, "cms.gov");
        assert_eq!(raw.description, "MSSP results released");
    }

    #[test]
    fn test_entry_without_link_or_source() {
        let raw = entry_to_article(FeedEntry::default());
        assert_eq!(raw.source, UNKNOWN_SOURCE);
        assert_eq!(raw.title, None);
        assert_eq!(raw.description, "");
    }
}
