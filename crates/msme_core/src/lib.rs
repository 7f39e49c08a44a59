pub mod config;
pub mod error;
pub mod store;
pub mod text;
pub mod types;

pub use config::Config;
pub use error::Error;
pub use store::{DocumentStore, Filter};
pub use types::{
    AgentRole, ChartSpec, ChartType, Company, Insight, Intent, NewsArticle, Series,
};

pub type Result<T> = std::result::Result<T, Error>;
