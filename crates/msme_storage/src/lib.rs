use std::sync::Arc;

use msme_core::{Config, DocumentStore, Result};

pub mod backends;
pub mod repo;

pub use backends::memory::MemoryStore;
pub use repo::Repository;

#[cfg(feature = "mongodb")]
pub use backends::mongo::MongoStore;

/// Create a document store by name. `memory` is always available;
/// `mongo` requires the `mongodb` feature and a reachable server.
#[cfg_attr(not(feature = "mongodb"), allow(unused_variables))]
pub async fn create_store(kind: &str, config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "mongodb")]
        "mongo" => {
            let store = MongoStore::connect(&config.mongo_uri, &config.db_name).await?;
            Ok(Arc::new(store))
        }
        other => Err(msme_core::Error::Storage(format!(
            "unknown storage backend: {}",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::{create_store, MemoryStore, Repository};
    pub use msme_core::{DocumentStore, Filter};
}
