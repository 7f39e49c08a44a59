use std::time::Duration;

use crate::{Error, Result};

/// Service configuration, read once from the environment at startup.
/// Missing credentials degrade the dependent feature instead of failing;
/// only an unparsable `PORT` aborts startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub debug: bool,
    pub mongo_uri: String,
    pub db_name: String,
    pub news_api_key: Option<String>,
    pub news_base_url: String,
    pub openai_api_key: Option<String>,
    pub agent_base_url: String,
    pub company_csv_paths: Vec<String>,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            debug: false,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            db_name: "msme_aggregator".to_string(),
            news_api_key: None,
            news_base_url: "https://newsdata.io/api/1".to_string(),
            openai_api_key: None,
            agent_base_url: "https://api.openai.com/v1".to_string(),
            company_csv_paths: vec!["data/suppliers.csv".to_string()],
            request_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Some(port) = non_empty("PORT") {
            config.port = port
                .parse()
                .map_err(|_| Error::Configuration(format!("invalid PORT: {}", port)))?;
        }
        config.debug = non_empty("DEBUG").map(|v| v == "1" || v == "true").unwrap_or(false);

        if let Some(uri) = non_empty("MONGO_URI") {
            config.mongo_uri = uri;
        }
        if let Some(name) = non_empty("DB_NAME") {
            config.db_name = name;
        }
        config.news_api_key = non_empty("NEWS_API_KEY");
        if let Some(url) = non_empty("NEWS_BASE_URL") {
            config.news_base_url = url;
        }
        config.openai_api_key = non_empty("OPENAI_API_KEY");
        if let Some(url) = non_empty("AGENT_BASE_URL") {
            config.agent_base_url = url;
        }
        if let Some(paths) = non_empty("COMPANY_CSV_PATHS") {
            config.company_csv_paths = paths
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }
        if let Some(secs) = non_empty("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::Configuration(format!("invalid REQUEST_TIMEOUT_SECS: {}", secs)))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = non_empty("CACHE_TTL_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::Configuration(format!("invalid CACHE_TTL_SECS: {}", secs)))?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
