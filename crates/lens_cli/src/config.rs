use std::path::PathBuf;

use lens_inference::Config;

pub const DEFAULT_PROVIDER: &str = "openrouter";
pub const DEFAULT_OPENROUTER_MODEL: &str = "xai/grok-4-fast";
pub const DEFAULT_OLLAMA_MODEL: &str = "gpt-oss:20b";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_DATABASE_PATH: &str = "data/analysis.db";

/// Runtime settings from `.env` and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model_provider: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub ollama_model: String,
    pub ollama_url: String,
    pub output_dir: PathBuf,
    pub database_path: PathBuf,
    pub verbose: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let home = lookup("HOME");

        Self {
            model_provider: get("MODEL_PROVIDER", DEFAULT_PROVIDER).trim().to_lowercase(),
            openrouter_api_key: lookup("OPENROUTER_API_KEY").filter(|key| !key.is_empty()),
            openrouter_model: get("OPENROUTER_MODEL", DEFAULT_OPENROUTER_MODEL),
            ollama_model: get("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            ollama_url: get("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            output_dir: resolve(expand_home(
                &get("OUTPUT_DIR", DEFAULT_OUTPUT_DIR),
                home.as_deref(),
            )),
            database_path: resolve(expand_home(
                &get("DATABASE_PATH", DEFAULT_DATABASE_PATH),
                home.as_deref(),
            )),
            verbose: false,
        }
    }

    /// Copy with command-line values applied on top.
    pub fn with_overrides(
        self,
        model_provider: Option<String>,
        output_dir: Option<PathBuf>,
        database_path: Option<PathBuf>,
        verbose: Option<bool>,
    ) -> Self {
        Self {
            model_provider: model_provider
                .map(|p| p.trim().to_lowercase())
                .unwrap_or(self.model_provider),
            output_dir: output_dir.map(resolve).unwrap_or(self.output_dir),
            database_path: database_path.map(resolve).unwrap_or(self.database_path),
            verbose: verbose.unwrap_or(self.verbose),
            ..self
        }
    }

    /// Backend settings for the selected provider only.
    pub fn inference_config(&self) -> Config {
        match self.model_provider.as_str() {
            "openrouter" => Config {
                provider: self.model_provider.clone(),
                api_key: self.openrouter_api_key.clone(),
                model_name: Some(self.openrouter_model.clone()),
                base_url: None,
            },
            "ollama" => Config {
                provider: self.model_provider.clone(),
                api_key: None,
                model_name: Some(self.ollama_model.clone()),
                base_url: Some(self.ollama_url.clone()),
            },
            _ => Config {
                provider: self.model_provider.clone(),
                ..Config::default()
            },
        }
    }
}

fn expand_home(path: &str, home: Option<&str>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

/// Anchors relative paths at the working directory, so report paths written
/// to the analysis log stay valid from anywhere.
fn resolve(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
