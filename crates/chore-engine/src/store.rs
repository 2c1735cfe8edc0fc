//! File-backed persistence for a [`TaskBook`].
//!
//! The file is one JSON object used as a small key-value store: chores live
//! under `housekeeper_tasks` and categories under `housekeeper_categories`.
//! Unknown keys are ignored on load and dropped on save.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::book::TaskBook;
use crate::error::{ChoreError, Result};
use crate::task::{Category, Task};

pub const TASKS_KEY: &str = "housekeeper_tasks";
pub const CATEGORIES_KEY: &str = "housekeeper_categories";

#[derive(Debug, Default, Deserialize)]
struct StoredBook {
    #[serde(rename = "housekeeper_tasks", default)]
    tasks: Vec<Task>,
    #[serde(rename = "housekeeper_categories", default)]
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct StoredBookRef<'a> {
    #[serde(rename = "housekeeper_tasks")]
    tasks: &'a [Task],
    #[serde(rename = "housekeeper_categories")]
    categories: &'a [Category],
}

/// A task book stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Point at `path`. The file need not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the book. A missing file reads as an empty book.
    ///
    /// # Errors
    ///
    /// [`ChoreError::Io`] if the file exists but cannot be read, or
    /// [`ChoreError::Serialization`] if it is not a valid store document.
    pub fn load(&self) -> Result<TaskBook> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no store file yet; starting empty");
                return Ok(TaskBook::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };
        if raw.trim().is_empty() {
            return Ok(TaskBook::new());
        }

        let stored: StoredBook =
            serde_json::from_str(&raw).map_err(|source| ChoreError::Serialization {
                path: self.path.clone(),
                source,
            })?;
        info!(
            path = %self.path.display(),
            tasks = stored.tasks.len(),
            categories = stored.categories.len(),
            "loaded store"
        );
        Ok(TaskBook::from_parts(stored.tasks, stored.categories))
    }

    /// Write the book, creating parent directories as needed.
    ///
    /// The document is written to a sibling temporary file and renamed over
    /// the target, so a crash mid-write leaves the previous file intact.
    pub fn save(&self, book: &TaskBook) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let document = StoredBookRef {
            tasks: book.tasks(),
            categories: book.categories(),
        };
        let json =
            serde_json::to_string_pretty(&document).map_err(|source| ChoreError::Serialization {
                path: self.path.clone(),
                source,
            })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| ChoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;

        info!(
            path = %self.path.display(),
            tasks = book.tasks().len(),
            "saved store"
        );
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> ChoreError {
        ChoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
