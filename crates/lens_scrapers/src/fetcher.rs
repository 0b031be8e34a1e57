use async_trait::async_trait;
use lens_core::{ArticleFetcher, Error, FetchedArticle, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::extract::{extract, Extracted};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads a page over HTTP(S) and runs it through the extractor.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lens/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

fn download_error(err: impl std::fmt::Display) -> Error {
    Error::Download(format!("Failed to fetch article: {}", err))
}

#[async_trait]
impl ArticleFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle> {
        let parsed = Url::parse(url).map_err(|e| download_error(format!("invalid URL {}: {}", url, e)))?;

        debug!("Fetching {}", parsed);
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(download_error)?;
        let html = response.text().await.map_err(download_error)?;

        let Extracted { title, body } = extract(&html);
        if body.trim().is_empty() {
            return Err(Error::Download(format!(
                "Unable to extract article content from {}",
                url
            )));
        }

        debug!("Extracted {} bytes from {}", body.len(), url);
        Ok(FetchedArticle {
            content: body,
            title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::Html;
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;

    async fn serve() -> SocketAddr {
        let app = Router::new()
            .route(
                "/article",
                get(|| async {
                    Html("<html><title>T</title><article><p>Hello</p><p>World</p></article></html>")
                }),
            )
            .route(
                "/empty",
                get(|| async { Html("<html><title>T</title><body><div>No paragraphs</div></body></html>") }),
            )
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Html("<article><p>Too late</p></article>")
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_fetch_article() {
        let addr = serve().await;
        let fetcher = HttpFetcher::new().unwrap();

        let article = fetcher.fetch(&format!("http://{}/article", addr)).await.unwrap();
        assert_eq!(article.title.as_deref(), Some("T"));
        assert_eq!(article.content, "Hello\n\nWorld");
    }

    #[tokio::test]
    async fn test_http_status_is_download_error() {
        let addr = serve().await;
        let fetcher = HttpFetcher::new().unwrap();

        match fetcher.fetch(&format!("http://{}/missing", addr)).await {
            Err(Error::Download(message)) => {
                assert!(message.starts_with("Failed to fetch article"));
                assert!(message.contains("404"));
            }
            other => panic!("expected download error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_extraction_is_download_error() {
        let addr = serve().await;
        let fetcher = HttpFetcher::new().unwrap();

        match fetcher.fetch(&format!("http://{}/empty", addr)).await {
            Err(Error::Download(message)) => {
                assert!(message.starts_with("Unable to extract article content"));
            }
            other => panic!("expected extraction error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_download_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        match fetcher.fetch(&format!("http://{}/article", addr)).await {
            Err(Error::Download(message)) => {
                assert!(message.starts_with("Failed to fetch article"));
                assert!(message.contains("Connection refused"), "{}", message);
            }
            other => panic!("expected download error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_download_error() {
        let addr = serve().await;
        let fetcher = HttpFetcher::with_timeout(Duration::from_millis(500)).unwrap();

        match fetcher.fetch(&format!("http://{}/slow", addr)).await {
            Err(Error::Download(message)) => {
                assert!(message.starts_with("Failed to fetch article"));
                assert!(message.contains("timed out"), "{}", message);
            }
            other => panic!("expected timeout error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_download_error() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(Error::Download(message)) if message.contains("invalid URL")));
    }
}
