//! Error types for kmkm.
//!
//! Mirrors the kinds spec'd for the core: I/O always surfaces, corrupt
//! records surface, dimension mismatches during collection `load` are a
//! soft failure the caller turns into a rebuild, and precondition
//! violations are a programmer error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt counter record: {0}")]
    CorruptRecord(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("precondition violated: {0}")]
    Precondition(String),
}

pub type Result<T> = std::result::Result<T, Error>;
