//! Article ingestion.
//!
//! Every source produces [`RawArticle`] records; the pipeline never sees
//! which source a record came from beyond its `source` field.
//!
//! # Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | RSS / Atom feeds | [`rss`] | `rss`, `atom_syndication` | Feed name is the source; time window applied |
//! | Google News search | [`google_news`] | RSS search endpoint | One request per configured query |
//! | JSON file | [`load_json`] | `serde_json` | Offline re-runs over a saved batch |
//!
//! Network failures are logged and skipped per feed or query; a run with no
//! reachable sources still produces an (empty) brief.

pub mod google_news;
pub mod rss;

use crate::config::Config;
use crate::models::RawArticle;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared HTTP client for all feed requests.
pub fn http_client() -> Result<Client, Box<dyn Error>> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Fetch every configured feed and search query.
#[instrument(level = "info", skip_all)]
pub async fn collect(config: &Config) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let client = http_client()?;

    let mut articles = self::rss::fetch_feeds(&client, &config.feeds, config.time_window_hours).await;
    let feed_count = articles.len();
    articles.extend(google_news::search_queries(&client, &config.google_news).await);

    info!(
        feeds = feed_count,
        google_news = articles.len() - feed_count,
        total = articles.len(),
        "Collected articles"
    );
    Ok(articles)
}

/// Read a JSON array of raw articles.
#[instrument(level = "info")]
pub async fn load_json(path: &str) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let body = tokio::fs::read_to_string(path).await?;
    let articles: Vec<RawArticle> = serde_json::from_str(&body)?;
    info!(count = articles.len(), "Loaded articles from file");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_json() {
        let path = std::env::temp_dir().join("health_news_brief_feeds_test.json");
        let body = r#"[
            {"title": "ACO saves $12M", "link": "https://a/1", "source": "Wire",
             "published": "2025-11-11T12:30:00Z", "description": "shared savings"},
            {"link": "https://a/2"}
        ]"#;
        tokio::fs::write(&path, body).await.unwrap();

        let articles = load_json(path.to_str().unwrap()).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("ACO saves $12M"));
        assert_eq!(articles[1].title, None);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_load_json_rejects_non_array() {
        let path = std::env::temp_dir().join("health_news_brief_feeds_bad.json");
        tokio::fs::write(&path, r#"{"title": "x"}"#).await.unwrap();
        assert!(load_json(path.to_str().unwrap()).await.is_err());
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client().is_ok());
    }
}
