//! RSS 2.0 and Atom feed ingestion.
//!
//! Documents are read with the `rss` and `atom_syndication` crates and
//! flattened into [`FeedEntry`] values. HTML in descriptions is reduced to
//! plain text with `scraper`.

use crate::config::FeedSource;
use crate::models::RawArticle;
use crate::utils::truncate_for_log;
use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::Html;
use std::error::Error;
use tracing::{debug, error, info, instrument};

/// One `<item>` or `<entry>` as it appears in the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: String,
    /// Plain text, HTML already stripped.
    pub description: String,
    pub published: Option<DateTime<Utc>>,
    /// Text of a `<source>` element, as Google News emits per item.
    pub source: Option<String>,
}

/// First non-empty plain-text rendering among `candidates`.
fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(strip_html)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn rss_entry(item: &::rss::Item) -> FeedEntry {
    let dc_date = item
        .dublin_core_ext()
        .and_then(|dc| dc.dates().first())
        .map(String::as_str);

    FeedEntry {
        title: non_empty(item.title()),
        link: item.link().unwrap_or_default().trim().to_string(),
        description: first_text([item.description(), item.content()]),
        published: item.pub_date().and_then(parse_date).or_else(|| dc_date.and_then(parse_date)),
        source: non_empty(item.source().and_then(|s| s.title())),
    }
}

fn atom_entry(entry: &atom_syndication::Entry) -> FeedEntry {
    // The first alternate link wins; Atom treats a missing rel as alternate.
    let link = entry
        .links()
        .iter()
        .find(|l| l.rel() == "alternate")
        .map(|l| l.href().trim().to_string())
        .unwrap_or_default();
    let published = entry.published().unwrap_or_else(|| entry.updated());

    FeedEntry {
        title: non_empty(Some(strip_html(entry.title().as_str()).as_str())),
        link,
        description: first_text([
            entry.summary().map(|s| s.as_str()),
            entry.content().and_then(|c| c.value()),
        ]),
        published: Some(published.with_timezone(&Utc)),
        source: None,
    }
}

/// Parse an RSS or Atom document into its entries, in document order.
///
/// RSS is tried first, then Atom. Only items and entries are read; the
/// channel's own title and links are ignored.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    match ::rss::Channel::read_from(xml.as_bytes()) {
        Ok(channel) => Ok(channel.items().iter().map(rss_entry).collect()),
        Err(rss_err) => match atom_syndication::Feed::read_from(xml.as_bytes()) {
            Ok(feed) => Ok(feed.entries().iter().map(atom_entry).collect()),
            Err(atom_err) => {
                Err(format!("not an RSS or Atom feed (rss: {rss_err}; atom: {atom_err})").into())
            }
        },
    }
}

/// Parse a feed timestamp: RFC 2822 (RSS) first, then RFC 3339 (Atom, Dublin Core).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Reduce an HTML fragment to its text with whitespace collapsed.
pub fn strip_html(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert a configured feed's entries to raw articles.
///
/// The feed's name becomes the source. Entries without a date, or published
/// before `now - time_window_hours`, are skipped. A window too large to
/// represent keeps every dated entry.
pub fn entries_to_articles(
    entries: Vec<FeedEntry>,
    feed_name: &str,
    time_window_hours: i64,
    now: DateTime<Utc>,
) -> Vec<RawArticle> {
    let cutoff = TimeDelta::try_hours(time_window_hours)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    entries
        .into_iter()
        .filter_map(|entry| {
            let published = entry.published?;
            if published < cutoff {
                debug!(feed = %feed_name, title = ?entry.title, %published, "Entry outside time window");
                return None;
            }
            Some(RawArticle {
                title: entry.title,
                link: entry.link,
                description: entry.description,
                published: Some(published),
                source: feed_name.to_string(),
            })
        })
        .collect()
}

pub(crate) async fn fetch_text(client: &Client, url: &str) -> Result<String, Box<dyn Error>> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body)
}

/// Fetch and parse one feed.
#[instrument(level = "info", skip_all, fields(feed = %feed.name))]
async fn fetch_feed(
    client: &Client,
    feed: &FeedSource,
    time_window_hours: i64,
    now: DateTime<Utc>,
) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let body = fetch_text(client, &feed.url).await?;
    let entries = parse_feed(&body).map_err(|e| {
        debug!(body = %truncate_for_log(&body, 200), "Unparseable feed body");
        e
    })?;
    let total = entries.len();
    let articles = entries_to_articles(entries, &feed.name, time_window_hours, now);
    info!(entries = total, kept = articles.len(), "Parsed feed");
    Ok(articles)
}

/// Fetch every configured feed in turn.
///
/// Failed fetches are logged and skipped without failing the whole batch.
#[instrument(level = "info", skip_all, fields(feeds = feeds.len()))]
pub async fn fetch_feeds(
    client: &Client,
    feeds: &[FeedSource],
    time_window_hours: i64,
) -> Vec<RawArticle> {
    let now = Utc::now();
    let batches: Vec<Vec<RawArticle>> = stream::iter(feeds)
        .then(|feed| async move {
            match fetch_feed(client, feed, time_window_hours, now).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(error = %e, feed = %feed.name, url = %feed.url, "Feed fetch failed");
                    Vec::new()
                }
            }
        })
        .collect()
        .await;

    let articles: Vec<RawArticle> = batches.into_iter().flatten().collect();
    info!(count = articles.len(), "Fetched feed articles");
    articles
}
