use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed seed file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid seed data: {0}")]
    Invalid(String),
}

pub(crate) async fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, SeedError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let raw = tokio::fs::read_to_string(path).await.map_err(|source| SeedError::Io {
        path: display.clone(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| SeedError::Parse { path: display, source })
}
