//! Error types for backend calls.
//!
//! Every error is `Clone` so a single failed fetch can be handed to all the
//! loaders that were sharing it.

use thiserror::Error;

/// Failure of a single HTTP call against the products backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure and similar.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the JSON we expected.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Loading the product list failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("failed to load {key}: {source}")]
    Api { key: String, source: ApiError },

    /// The entry was dropped (shutdown) before its fetch resolved.
    #[error("fetch for {0} was abandoned")]
    Abandoned(String),
}

/// A delete, create or update call failed. The cache is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("failed to delete product {id}: {source}")]
    Delete { id: String, source: ApiError },

    #[error("failed to create product: {0}")]
    Create(ApiError),

    #[error("failed to update product {id}: {source}")]
    Update { id: String, source: ApiError },
}

impl MutationError {
    /// Short message for the status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Delete { .. } => "Could not delete the product.",
            Self::Create(_) => "Could not create the product.",
            Self::Update { .. } => "Could not update the product.",
        }
    }
}
