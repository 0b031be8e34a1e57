use lens_core::{ArticleRepository, Error, Result};
use std::path::Path;
use std::sync::Arc;

pub mod backends;

pub use backends::*;

/// Opens the repository named by `backend` ("sqlite" or "memory").
pub async fn create_repository(
    backend: &str,
    database_path: &Path,
) -> Result<Arc<dyn ArticleRepository>> {
    match backend {
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(SqliteRepository::new_with_path(database_path).await?)),
        "memory" => Ok(Arc::new(MemoryRepository::new())),
        other => Err(Error::Configuration(format!(
            "Unsupported storage backend '{}'",
            other
        ))),
    }
}
