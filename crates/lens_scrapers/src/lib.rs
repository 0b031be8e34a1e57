pub mod extract;
pub mod fetcher;
pub mod service;

pub use extract::{extract, Extracted};
pub use fetcher::HttpFetcher;
pub use service::ArticleCacheService;

pub mod prelude {
    pub use super::{ArticleCacheService, HttpFetcher};
    pub use lens_core::{ArticleFetcher, ArticlePayload, Error, Result};
}
