use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, HTTP error status, or nothing readable in the page.
    #[error("Download error: {0}")]
    Download(String),

    #[error("Referential integrity violation: article {article_id} does not exist")]
    ReferentialIntegrity { article_id: i64 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
