use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use msme_core::store::{Filter, COMPANIES, NEWS_ARTICLES, QUERY_CACHE};
use msme_core::{text, Company, DocumentStore, NewsArticle, Result};
use serde_json::{json, Value};
use tracing::warn;

/// Typed access to the document store collections. All methods are thin
/// wrappers; the store itself guarantees idempotent upserts.
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn upsert_company(&self, company: &Company) -> Result<()> {
        let doc = serde_json::to_value(company)?;
        self.store.upsert(COMPANIES, &company.id, doc).await
    }

    pub async fn companies(&self, filter: &Filter, limit: usize) -> Result<Vec<Company>> {
        let docs = self.store.list(COMPANIES, filter, limit).await?;
        Ok(decode_all(docs))
    }

    pub async fn all_companies(&self) -> Result<Vec<Company>> {
        let docs = self.store.find(COMPANIES, &Filter::new()).await?;
        Ok(decode_all(docs))
    }

    pub async fn company_count(&self) -> Result<u64> {
        self.store.count(COMPANIES).await
    }

    pub async fn article_exists(&self, source: &str, title: &str) -> Result<bool> {
        let filter = Filter::new().eq("source", source).eq("title", title);
        Ok(!self.store.find(NEWS_ARTICLES, &filter).await?.is_empty())
    }

    /// Returns true when the article was new to the store.
    pub async fn upsert_article(&self, article: &NewsArticle) -> Result<bool> {
        let existed = self.article_exists(&article.source, &article.title).await?;
        let doc = serde_json::to_value(article)?;
        self.store.upsert(NEWS_ARTICLES, &article.id, doc).await?;
        Ok(!existed)
    }

    pub async fn articles(&self, filter: &Filter, limit: usize) -> Result<Vec<NewsArticle>> {
        let docs = self.store.list(NEWS_ARTICLES, filter, limit).await?;
        Ok(decode_all(docs))
    }

    pub async fn latest_articles(&self, limit: usize) -> Result<Vec<NewsArticle>> {
        let docs = self.store.find(NEWS_ARTICLES, &Filter::new()).await?;
        let mut articles: Vec<NewsArticle> = decode_all(docs);
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit);
        Ok(articles)
    }

    pub async fn article_count(&self) -> Result<u64> {
        self.store.count(NEWS_ARTICLES).await
    }

    /// Soft cache lookup; entries older than `ttl` are ignored.
    pub async fn cached_response(&self, query: &str, ttl: Duration) -> Result<Option<Value>> {
        let key = text::slug(query);
        let filter = Filter::new().eq("query_key", &key);
        let hits = self.store.find(QUERY_CACHE, &filter).await?;
        for hit in hits {
            let cached_at = hit
                .get("cached_at")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<DateTime<Utc>>().ok());
            let fresh = cached_at
                .map(|t| Utc::now().signed_duration_since(t).num_seconds() < ttl.as_secs() as i64)
                .unwrap_or(false);
            if fresh {
                return Ok(hit.get("response").cloned());
            }
        }
        Ok(None)
    }

    pub async fn store_response(&self, query: &str, response: &Value) -> Result<()> {
        let key = text::slug(query);
        let entry = json!({
            "query_key": key,
            "query": query,
            "response": response,
            "cached_at": Utc::now().to_rfc3339(),
        });
        self.store.upsert(QUERY_CACHE, &key, entry).await
    }
}

fn decode_all<T: serde::de::DeserializeOwned>(docs: Vec<Value>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value(doc) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(error = %e, "skipping undecodable document");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::Utc;

    fn company(name: &str, sector: &str, exports: &[&str]) -> Company {
        Company {
            id: text::slug(name),
            name: name.to_string(),
            sector: sector.to_string(),
            location: "Chennai".to_string(),
            primary_products: "".to_string(),
            revenue: Some(12.5),
            profit_margin: Some(0.1),
            sales_growth: Some(0.2),
            debt_to_equity: Some(0.8),
            export_markets: exports.iter().map(|s| s.to_string()).collect(),
            performance: Some("Good".to_string()),
            description: String::new(),
            keywords: vec![sector.to_lowercase()],
        }
    }

    fn article(source: &str, title: &str) -> NewsArticle {
        NewsArticle {
            id: text::slug(&format!("{} {}", source, title)),
            title: title.to_string(),
            summary: "summary".to_string(),
            link: "http://example.com".to_string(),
            source: source.to_string(),
            published_at: Utc::now(),
            sectors: vec!["business".to_string()],
            country: vec!["in".to_string()],
            sentiment: None,
            keywords: vec![],
        }
    }

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn company_roundtrip_and_filtering() {
        let repo = repo();
        repo.upsert_company(&company("MediSup", "Healthcare", &["USA"]))
            .await
            .unwrap();
        repo.upsert_company(&company("TexCo", "Textiles", &[]))
            .await
            .unwrap();

        let filter = Filter::new().contains("sector", "health");
        let matched = repo.companies(&filter, 10).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "MediSup");
        assert!(matched[0].exports());
    }

    #[tokio::test]
    async fn upsert_article_reports_newness() {
        let repo = repo();
        let a = article("The Hindu", "MSME exports rise");
        assert!(repo.upsert_article(&a).await.unwrap());
        assert!(!repo.upsert_article(&a).await.unwrap());
        assert_eq!(repo.article_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn query_cache_respects_ttl() {
        let repo = repo();
        let response = json!({"narrative": "cached"});
        repo.store_response("find textile companies", &response)
            .await
            .unwrap();

        let hit = repo
            .cached_response("Find Textile Companies", Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(hit, Some(response));

        let expired = repo
            .cached_response("find textile companies", Duration::from_secs(0))
            .await
            .unwrap();
        assert!(expired.is_none());
    }
}
