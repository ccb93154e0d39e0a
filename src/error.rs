use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for portal operations. Every variant is recovered at
/// the handler boundary and turned into a user-visible message; none of
/// them should ever abort a request, let alone the process.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("file not found: {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file name: {name:?}")]
    InvalidName { name: String },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid username or password")]
    AuthFailure,
}
