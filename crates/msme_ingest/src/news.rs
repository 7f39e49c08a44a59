use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use msme_core::{text, Error, NewsArticle, Result};
use msme_storage::Repository;
use serde::Deserialize;
use tracing::{info, warn};

/// NewsData.io-shaped wire format.
#[derive(Debug, Deserialize)]
struct WireResponse {
    status: String,
    #[serde(default)]
    results: Vec<WireArticle>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub country: Vec<String>,
}

/// Client for the external news search API. Failures are reported as
/// `Error::NewsFetch` so callers can degrade instead of aborting.
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch and normalize articles for a topic. Non-2xx responses and
    /// timeouts become `NewsFetch` errors, never panics or process
    /// failures.
    pub async fn fetch(&self, topic: &str, country: &str) -> Result<Vec<NewsArticle>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("NEWS_API_KEY is not set".to_string()))?;

        let url = format!("{}/latest", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", api_key),
                ("q", topic),
                ("country", country),
                ("language", "en"),
                ("size", "10"),
            ])
            .send()
            .await
            .map_err(|e| Error::NewsFetch(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::NewsFetch(format!(
                "news API returned {}",
                response.status()
            )));
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| Error::NewsFetch(format!("bad response body: {}", e)))?;

        if body.status != "success" {
            return Err(Error::NewsFetch(
                body.message.unwrap_or_else(|| "unknown API error".to_string()),
            ));
        }

        Ok(normalize(body.results))
    }

    /// Fetch, then persist articles that are new to the store. Returns
    /// the normalized batch and the number actually stored.
    pub async fn ingest(
        &self,
        repo: &Repository,
        topic: &str,
        country: &str,
    ) -> Result<(Vec<NewsArticle>, usize)> {
        let articles = self.fetch(topic, country).await?;
        let mut stored = 0;
        for article in &articles {
            if repo.upsert_article(article).await? {
                stored += 1;
            }
        }
        info!(topic, country, fetched = articles.len(), stored, "news ingest complete");
        Ok((articles, stored))
    }
}

/// Map wire articles into the common shape, dropping entries without a
/// title or description and deduplicating by (source, title).
pub(crate) fn normalize(results: Vec<WireArticle>) -> Vec<NewsArticle> {
    let mut seen: Vec<(String, String)> = Vec::new();
    let mut articles = Vec::new();

    for wire in results {
        let (title, description) = match (wire.title, wire.description) {
            (Some(t), Some(d)) if !t.is_empty() && !d.is_empty() => (t, d),
            _ => continue,
        };
        let source = wire.source_name.unwrap_or_else(|| "Unknown".to_string());

        let dedup_key = (source.to_lowercase(), title.to_lowercase());
        if seen.contains(&dedup_key) {
            continue;
        }
        seen.push(dedup_key);

        let keyword_text = format!("{} {}", title, description);
        articles.push(NewsArticle {
            id: text::slug(&format!("{} {}", source, title)),
            title,
            summary: description,
            link: wire.link.unwrap_or_default(),
            source,
            published_at: parse_pub_date(wire.pub_date.as_deref()),
            sectors: wire.category,
            country: wire.country,
            sentiment: None,
            keywords: text::keywords(&keyword_text),
        });
    }
    articles
}

fn parse_pub_date(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return Utc::now();
    };
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.and_utc();
    }
    if let Ok(parsed) = raw.parse::<DateTime<Utc>>() {
        return parsed;
    }
    warn!(raw, "unparsable pubDate, using now");
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(source: &str, title: &str) -> WireArticle {
        WireArticle {
            title: Some(title.to_string()),
            description: Some("MSME exporters report strong quarter".to_string()),
            link: Some("https://example.com/a".to_string()),
            source_name: Some(source.to_string()),
            pub_date: Some("2024-03-01 09:30:00".to_string()),
            category: vec!["business".to_string()],
            country: vec!["in".to_string()],
        }
    }

    #[test]
    fn normalize_dedupes_by_source_and_title() {
        let batch = vec![
            wire("The Hindu", "MSME exports rise"),
            wire("The Hindu", "MSME exports rise"),
            wire("Mint", "MSME exports rise"),
        ];
        let articles = normalize(batch);
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.sentiment.is_none()));
    }

    #[test]
    fn normalize_drops_incomplete_articles() {
        let mut incomplete = wire("Mint", "No description");
        incomplete.description = None;
        let articles = normalize(vec![incomplete, wire("Mint", "Complete")]);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Complete");
    }

    #[test]
    fn pub_date_parsing_falls_back_gracefully() {
        let parsed = parse_pub_date(Some("2024-03-01 09:30:00"));
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T09:30:00+00:00");
        // Unparsable input must not panic.
        let _ = parse_pub_date(Some("yesterday-ish"));
        let _ = parse_pub_date(None);
    }

    #[tokio::test]
    async fn missing_api_key_is_a_configuration_error() {
        let client = NewsClient::new(
            "https://newsdata.example",
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(!client.configured());
        let err = client.fetch("msme", "in").await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
