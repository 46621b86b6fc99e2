use hashbang_codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashbangError {
    #[error("a hashbang store is already installed in this environment")]
    DoubleInitialization,
    #[error("environment cannot deliver fragment change notifications")]
    MissingCapability,
    #[error("invalid separator: {0}")]
    InvalidSeparator(#[from] CodecError),
    #[error("path not found")]
    PathNotFound,
    #[error("path does not point to object")]
    NotObject,
    #[error("path does not point to array")]
    NotArray,
    #[error("invalid path operation")]
    InvalidPathOp,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
