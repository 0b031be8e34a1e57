use async_trait::async_trait;
use lens_core::{AnalysisModel, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::TEMPERATURE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gpt-oss:20b";

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// A model served by a local Ollama daemon.
#[derive(Debug)]
pub struct OllamaModel {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaModel {
    pub fn new(model: Option<String>, base_url: Option<String>) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl AnalysisModel for OllamaModel {
    fn provider(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            system,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        Ok(response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use lens_core::Error;
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_generate() {
        let app = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], DEFAULT_MODEL);
                assert_eq!(body["stream"], false);
                assert_eq!(body["system"], "You list assumptions.");
                Json(json!({ "model": DEFAULT_MODEL, "response": "- one\n- two", "done": true }))
            }),
        );
        let model = OllamaModel::new(None, Some(serve(app).await)).unwrap();

        let output = model.complete("You list assumptions.", "Article text").await.unwrap();
        assert_eq!(output, "- one\n- two");
    }

    #[tokio::test]
    async fn test_missing_model_is_error() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::NOT_FOUND, "model not found") }),
        );
        let model = OllamaModel::new(Some("absent".to_string()), Some(serve(app).await)).unwrap();

        assert!(matches!(model.complete("s", "p").await, Err(Error::Http(_))));
    }
}
