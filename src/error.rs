use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything the crate can fail with.
///
/// The core surfaces errors verbatim: no retries, no reconnects, no
/// fallbacks. An absent chunk is not an error (it decodes to fill).
#[derive(Error, Debug)]
pub enum Error {
    /// Rank or range violation at the API surface.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Codec, dtype, transform type or layout feature the crate does not cover.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Chunk decode failed, or the decoded size is neither the full nor the
    /// truncated-edge chunk size.
    #[error("corrupt chunk: {0}")]
    ChunkCorrupt(String),

    /// Metadata document missing a required field, inconsistent in rank,
    /// or carrying unknown enumerators.
    #[error("invalid metadata: {0}")]
    MetadataInvalid(String),

    /// Transport or backend error from the store; the message is opaque.
    #[error("store failure: {0}")]
    StoreFailure(String),

    /// No array or group at the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store does not implement this operation.
    #[error("store does not support {0}")]
    NotSupported(&'static str),

    /// Cooperative cancellation fired.
    #[error("cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn store<E: std::fmt::Display>(err: E) -> Self {
        Self::StoreFailure(err.to_string())
    }

    pub(crate) fn metadata<E: std::fmt::Display>(err: E) -> Self {
        Self::MetadataInvalid(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::StoreFailure(e.to_string())
    }
}
