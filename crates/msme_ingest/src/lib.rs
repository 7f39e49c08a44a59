pub mod loader;
pub mod news;

pub use loader::{CsvLoader, LoadReport};
pub use news::NewsClient;

pub mod prelude {
    pub use super::{CsvLoader, LoadReport, NewsClient};
    pub use msme_core::{NewsArticle, Result};
}
