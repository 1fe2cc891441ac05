//! Crate-wide error type.

use thiserror::Error;

use crate::snapshot::SnapshotError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from accepting a submitted snapshot.
#[derive(Error, Debug)]
pub enum Error {
    /// The body is not JSON at all.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The submitted snapshot failed validation.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
