//! Taskdeck - a local todo manager with multiple named lists.
//!
//! This library provides the core functionality for the `td` CLI tool:
//! the domain model for lists and items, the JSON storage layer, and the
//! service operations that mutate or query that state.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod models;
pub mod storage;

use std::path::PathBuf;


/// Library-level error type for taskdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storage error: {0}")]
    StorageIo(#[from] std::io::Error),

    #[error("corrupt store file {path}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("invalid list name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("list '{0}' already exists")]
    DuplicateList(String),

    #[error("no list named '{0}'")]
    ListNotFound(String),

    #[error("deleting list '{0}' requires confirmation (pass --yes)")]
    ConfirmationRequired(String),

    #[error("invalid item: {0}")]
    InvalidItem(String),

    #[error("no item with id or position {token} in list '{list}'")]
    ItemNotFound { list: String, token: u64 },
}

impl Error {
    /// Process exit code for this error kind.
    ///
    /// Each kind maps to a distinct non-zero status so scripts can
    /// discriminate failures without parsing messages.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidName { .. } => 2,
            Error::DuplicateList(_) => 3,
            Error::ListNotFound(_) => 4,
            Error::ConfirmationRequired(_) => 5,
            Error::InvalidItem(_) => 6,
            Error::ItemNotFound { .. } => 7,
            Error::CorruptStore { .. } => 8,
            Error::StorageIo(_) => 9,
        }
    }
}

/// Result type alias for taskdeck operations.
pub type Result<T> = std::result::Result<T, Error>;
