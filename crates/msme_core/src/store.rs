use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

pub const COMPANIES: &str = "companies";
pub const NEWS_ARTICLES: &str = "news_articles";
pub const QUERY_CACHE: &str = "query_cache";

/// A conjunction of field clauses, expressible both against the in-memory
/// backend and as a MongoDB query.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub clauses: Vec<Clause>,
}

#[derive(Debug, Clone)]
pub struct Clause {
    pub field: String,
    pub op: Op,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    /// Case-insensitive substring match.
    Contains,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: &str) -> Self {
        self.clauses.push(Clause {
            field: field.to_string(),
            op: Op::Eq,
            value: value.to_string(),
        });
        self
    }

    pub fn contains(mut self, field: &str, value: &str) -> Self {
        self.clauses.push(Clause {
            field: field.to_string(),
            op: Op::Contains,
            value: value.to_string(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate against a JSON document. String fields match by equality
    /// or substring; array-of-string fields match if any element does.
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses.iter().all(|clause| {
            let field = match document.get(&clause.field) {
                Some(v) => v,
                None => return false,
            };
            match field {
                Value::String(s) => clause.matches_str(s),
                Value::Array(items) => items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .any(|s| clause.matches_str(s)),
                other => clause.matches_str(&other.to_string()),
            }
        })
    }
}

impl Clause {
    fn matches_str(&self, candidate: &str) -> bool {
        match self.op {
            Op::Eq => candidate == self.value,
            Op::Contains => candidate
                .to_lowercase()
                .contains(&self.value.to_lowercase()),
        }
    }
}

/// Document store contract. Upsert is idempotent on key, find never
/// mutates, and absence of a match is an empty vec, never an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upsert(&self, collection: &str, key: &str, document: Value) -> Result<()>;

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>>;

    async fn list(&self, collection: &str, filter: &Filter, limit: usize) -> Result<Vec<Value>>;

    async fn count(&self, collection: &str) -> Result<u64>;

    /// Connectivity check, used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}
