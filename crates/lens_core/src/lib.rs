pub mod error;
pub mod models;
pub mod scraper;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::AnalysisModel;
pub use scraper::ArticleFetcher;
pub use storage::ArticleRepository;
pub use types::{
    content_digest, AnalysisRecord, Article, ArticlePayload, FetchedArticle, NewAnalysis,
    NewArticle,
};
