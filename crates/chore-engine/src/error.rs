//! Error types for chore-engine operations.
//!
//! The resolver and describer never fail; malformed rules come back as
//! `None` or a sentinel string. These errors cover input parsing, the task
//! book, and the on-disk store.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChoreError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed store '{}': {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ChoreError>;
