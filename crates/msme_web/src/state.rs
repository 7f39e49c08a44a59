use std::sync::Arc;

use msme_agents::{AgentRuntime, Orchestrator};
use msme_core::{Config, DocumentStore, Result};
use msme_ingest::NewsClient;
use msme_storage::Repository;

/// Request-scoped context shared by all handlers. Everything here is
/// either immutable or internally synchronized.
pub struct AppState {
    pub config: Config,
    pub repo: Repository,
    pub news: NewsClient,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let news = NewsClient::new(
            &config.news_base_url,
            config.news_api_key.clone(),
            config.request_timeout,
        )?;
        let runtime = AgentRuntime::new(
            &config.agent_base_url,
            config.openai_api_key.clone(),
            config.request_timeout,
        )?;
        Ok(Self {
            config,
            repo: Repository::new(store),
            news,
            orchestrator: Orchestrator::new(Arc::new(runtime)),
        })
    }
}
