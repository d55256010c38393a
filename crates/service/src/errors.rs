use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("persistence error at {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("metrics error: {0}")]
    Metrics(String),
}

impl ServiceError {
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence { path: path.into(), source }
    }
}
