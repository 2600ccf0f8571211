use std::io;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Cli(String),

    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to get secret/{name}: {source}")]
    Secret {
        name: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("failed to load primary cluster config: {0}")]
    PrimaryConfig(String),

    #[error("failed to parse key {key}: {reason}")]
    Key { key: String, reason: String },

    #[error("failed to unmarshal JSON for cluster {key}: {source}")]
    Descriptor {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid descriptor for cluster {key}: {reason}")]
    InvalidDescriptor { key: String, reason: String },

    #[error("failed to create kube client for cluster {key}: {reason}")]
    Client { key: String, reason: String },

    #[error("{0}")]
    Other(String),
}
