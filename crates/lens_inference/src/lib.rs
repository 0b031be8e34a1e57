use std::fmt;

pub mod analysis;
pub mod models;

pub use analysis::{AnalysisReport, ArticleAnalyzer};
pub use models::create_model;

/// Backend selection, handed in by the caller.
#[derive(Clone, Default)]
pub struct Config {
    /// "openrouter", "ollama" or "dummy".
    pub provider: String,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub mod prelude {
    pub use super::analysis::{AnalysisReport, ArticleAnalyzer};
    pub use super::models::create_model;
    pub use super::Config;
    pub use lens_core::{AnalysisModel, Error, Result};
}
