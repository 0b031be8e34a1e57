use std::sync::Arc;
use lens_core::{AnalysisModel, Error, Result};
use tracing::info;

use crate::Config;

pub mod dummy;
pub mod ollama;
pub mod openrouter;

pub use dummy::DummyModel;
pub use ollama::OllamaModel;
pub use openrouter::OpenRouterModel;

/// Sampling temperature shared by the remote backends.
pub const TEMPERATURE: f32 = 0.3;

/// Builds the backend named by `config.provider`.
///
/// Fails with `Error::Configuration` for an unknown provider or missing
/// credentials. Nothing touches the network here.
pub fn create_model(config: &Config) -> Result<Arc<dyn AnalysisModel>> {
    let model: Arc<dyn AnalysisModel> = match config.provider.trim().to_lowercase().as_str() {
        "openrouter" => Arc::new(OpenRouterModel::new(
            config.api_key.clone(),
            config.model_name.clone(),
            config.base_url.clone(),
        )?),
        "ollama" => Arc::new(OllamaModel::new(
            config.model_name.clone(),
            config.base_url.clone(),
        )?),
        "dummy" => Arc::new(DummyModel::new()),
        other => {
            return Err(Error::Configuration(format!(
                "Unsupported model provider '{}'",
                other
            )))
        }
    };

    info!("🧠 Using {} model {}", model.provider(), model.model_name());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, api_key: Option<&str>) -> Config {
        Config {
            provider: provider.to_string(),
            api_key: api_key.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn test_create_model() {
        let model = create_model(&config("openrouter", Some("key"))).unwrap();
        assert_eq!(model.provider(), "openrouter");
        assert_eq!(model.model_name(), openrouter::DEFAULT_MODEL);

        let model = create_model(&config(" Ollama ", None)).unwrap();
        assert_eq!(model.provider(), "ollama");
        assert_eq!(model.model_name(), ollama::DEFAULT_MODEL);

        let model = create_model(&config("dummy", None)).unwrap();
        assert_eq!(model.provider(), "dummy");
    }

    #[test]
    fn test_openrouter_requires_key() {
        assert!(matches!(
            create_model(&config("openrouter", None)),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            create_model(&config("openrouter", Some("  "))),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_provider() {
        match create_model(&config("gpt-local", None)) {
            Err(Error::Configuration(message)) => assert!(message.contains("gpt-local")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }
}
