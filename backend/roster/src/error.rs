use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Malformed dataset in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode dataset: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Processing service URL is not configured")]
    NotConfigured,

    #[error("Failed to reach processing service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Processing service responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Unexpected response from processing service: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
