use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ReplaceOptions;
use mongodb::{Client, Database};
use msme_core::store::{Filter, Op};
use msme_core::{DocumentStore, Error, Result};
use serde_json::Value;
use tracing::info;

/// MongoDB-backed document store. Documents are stored as-is with a
/// `_key` field carrying the upsert key.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| Error::Storage(format!("mongo connect: {}", e)))?;
        let db = client.database(db_name);
        info!(db = db_name, "connected to MongoDB");
        Ok(Self { db })
    }

    fn to_document(value: &Value) -> Result<Document> {
        mongodb::bson::to_document(value)
            .map_err(|e| Error::Storage(format!("bson encode: {}", e)))
    }

    fn to_value(mut document: Document) -> Result<Value> {
        document.remove("_id");
        document.remove("_key");
        serde_json::to_value(Bson::Document(document))
            .map_err(Error::Serialization)
    }

    fn to_query(filter: &Filter) -> Document {
        let mut query = Document::new();
        for clause in &filter.clauses {
            match clause.op {
                Op::Eq => {
                    query.insert(clause.field.clone(), clause.value.clone());
                }
                Op::Contains => {
                    query.insert(
                        clause.field.clone(),
                        doc! {"$regex": regex_escape(&clause.value), "$options": "i"},
                    );
                }
            }
        }
        query
    }
}

fn regex_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if "\\.^$|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn upsert(&self, collection: &str, key: &str, document: Value) -> Result<()> {
        let mut doc = Self::to_document(&document)?;
        doc.insert("_key", key);
        let options = ReplaceOptions::builder().upsert(true).build();
        self.db
            .collection::<Document>(collection)
            .replace_one(doc! {"_key": key}, doc, options)
            .await
            .map_err(|e| Error::Storage(format!("mongo upsert: {}", e)))?;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        let mut cursor = self
            .db
            .collection::<Document>(collection)
            .find(Self::to_query(filter), None)
            .await
            .map_err(|e| Error::Storage(format!("mongo find: {}", e)))?;

        let mut out = Vec::new();
        while cursor
            .advance()
            .await
            .map_err(|e| Error::Storage(format!("mongo cursor: {}", e)))?
        {
            let document = cursor
                .deserialize_current()
                .map_err(|e| Error::Storage(format!("mongo decode: {}", e)))?;
            out.push(Self::to_value(document)?);
        }
        Ok(out)
    }

    async fn list(&self, collection: &str, filter: &Filter, limit: usize) -> Result<Vec<Value>> {
        let mut matches = self.find(collection, filter).await?;
        matches.truncate(limit);
        Ok(matches)
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        self.db
            .collection::<Document>(collection)
            .count_documents(doc! {}, None)
            .await
            .map_err(|e| Error::Storage(format!("mongo count: {}", e)))
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .run_command(doc! {"ping": 1}, None)
            .await
            .map_err(|e| Error::Storage(format!("mongo ping: {}", e)))?;
        Ok(())
    }
}
