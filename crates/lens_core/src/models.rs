use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// A text-completion backend used to analyse article text.
#[async_trait]
pub trait AnalysisModel: Send + Sync + fmt::Debug {
    /// Provider identifier recorded with each analysis (e.g. "openrouter").
    fn provider(&self) -> &str;

    /// Model identifier recorded with each analysis.
    fn model_name(&self) -> &str;

    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
