use async_trait::async_trait;
use lens_core::{AnalysisModel, Result};

/// Offline stand-in: echoes the first twenty words of the prompt.
#[derive(Debug, Default)]
pub struct DummyModel;

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalysisModel for DummyModel {
    fn provider(&self) -> &str {
        "dummy"
    }

    fn model_name(&self) -> &str {
        "dummy"
    }

    async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        let words: Vec<&str> = prompt.split_whitespace().take(20).collect();
        Ok(words.join(" "))
    }
}
