//! Error type shared by the store, the board logic and both front-ends.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// Input rejected before anything was written (empty title, unknown status).
    #[error("invalid input: {0}")]
    Validation(String),

    /// The referenced task or board does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing storage could not be read or written. Nothing was persisted.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] io::Error),

    /// A stored entry is not the JSON we expect.
    #[error("corrupt stored data: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BoardError>;

impl BoardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
