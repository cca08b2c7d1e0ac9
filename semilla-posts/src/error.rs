use std::io;
use thiserror::Error;

/// Failures surfacing from a filter chain. Filtering itself never fails; writers do.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("failed to write posts: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize post: {0}")]
    Json(#[from] serde_json::Error),
}
