//! Storage layer for taskdeck data.
//!
//! This module owns the on-disk JSON representation:
//!
//! - `<data-dir>/lists.json` - the index mapping list names to file names
//! - `<data-dir>/<list_name>.json` - one file per list
//!
//! Two guarantees hold for every write:
//!
//! - **Atomicity**: content is written to a temp file in the target
//!   directory and renamed over the destination, so an interrupted write
//!   leaves the previous valid file untouched and no observer ever sees a
//!   torn file.
//! - **Determinism**: identical in-memory state serializes to byte-identical
//!   output (sorted index keys, fixed struct field order, RFC 3339 UTC
//!   timestamps, 2-space pretty printing, trailing newline), so the files
//!   are diffable and testable byte-for-byte.
//!
//! Two simultaneous invocations racing on the same list can still lose one
//! update; the rename discipline only rules out torn files.

use std::ffi::OsStr;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::models::{Index, TodoList};
use crate::{Error, Result};

/// File name of the index within the data directory.
pub const INDEX_FILE: &str = "lists.json";

/// Resolve the data directory for this invocation.
///
/// Priority: explicit path (from `--data-dir` or `TD_DATA_DIR`) >
/// platform data directory, e.g. `~/.local/share/taskdeck/` on Linux.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    let base = dirs::data_dir().ok_or_else(|| {
        Error::StorageIo(io::Error::other("could not determine platform data directory"))
    })?;
    Ok(base.join("taskdeck"))
}

/// File name a list is stored under, relative to the data directory.
pub fn list_file_name(list_name: &str) -> String {
    format!("{}.json", list_name)
}

/// Store rooted at a data directory. Holds no file handles or cached state;
/// every operation opens, reads or writes, and closes within the call.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Bind a store to the given data directory. Does not touch the disk.
    pub fn open(data_dir: &Path) -> Self {
        Self {
            root: data_dir.to_path_buf(),
        }
    }

    /// Root data directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the index file.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Absolute path of a list file given its relative file name.
    pub fn list_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Create the data directory and an empty index file if absent.
    ///
    /// Idempotent: on an already-initialized store this is a no-op and never
    /// fails. Returns whether anything was created.
    pub fn ensure_initialized(&self) -> Result<bool> {
        let mut created = false;
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            created = true;
        }
        let index_path = self.index_path();
        if !index_path.exists() {
            self.write_atomic(&index_path, &to_canonical_json(&Index::new())?)?;
            created = true;
        }
        Ok(created)
    }

    /// Read and validate the index.
    ///
    /// A missing file means nothing has been created yet and yields an empty
    /// index; a file that exists but fails to parse or validate is corrupt.
    pub fn load_index(&self) -> Result<Index> {
        let path = self.index_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Index::new()),
            Err(e) => return Err(e.into()),
        };
        let index: Index =
            serde_json::from_slice(&bytes).map_err(|e| corrupt(&path, e.to_string()))?;
        index.validate().map_err(|reason| corrupt(&path, reason))?;
        Ok(index)
    }

    /// Serialize and atomically replace the index file.
    pub fn save_index(&self, index: &Index) -> Result<()> {
        self.write_atomic(&self.index_path(), &to_canonical_json(index)?)
    }

    /// Read and validate one list file by its relative file name.
    ///
    /// The caller resolves the file name through the index, so a missing
    /// file here means the store is inconsistent, not that the list does
    /// not exist.
    pub fn load_list(&self, file_name: &str) -> Result<TodoList> {
        let path = self.list_path(file_name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(corrupt(&path, "list file named in the index is missing"));
            }
            Err(e) => return Err(e.into()),
        };
        let list: TodoList =
            serde_json::from_slice(&bytes).map_err(|e| corrupt(&path, e.to_string()))?;
        list.validate().map_err(|reason| corrupt(&path, reason))?;
        if Path::new(file_name).file_stem() != Some(OsStr::new(&list.name)) {
            return Err(corrupt(
                &path,
                format!("list name '{}' does not match its file name", list.name),
            ));
        }
        Ok(list)
    }

    /// Serialize and atomically replace a list file.
    pub fn save_list(&self, list: &TodoList) -> Result<()> {
        let path = self.list_path(&list_file_name(&list.name));
        self.write_atomic(&path, &to_canonical_json(list)?)
    }

    /// Remove a list file. A file that is already gone is tolerated; the
    /// index is authoritative for which lists exist.
    pub fn remove_list_file(&self, file_name: &str) -> Result<()> {
        match fs::remove_file(self.list_path(file_name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write bytes to `path` atomically: temp file in the same directory,
    /// fsync, then rename over the target. The temp file is cleaned up on
    /// every error path.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let dir = path.parent().ok_or_else(|| {
            Error::StorageIo(io::Error::other(format!(
                "no parent directory for {}",
                path.display()
            )))
        })?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| Error::StorageIo(e.error))?;
        Ok(())
    }
}

/// Canonical serialization: pretty JSON plus a trailing newline.
fn to_canonical_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|e| Error::StorageIo(io::Error::other(e)))?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn corrupt(path: &Path, reason: impl Into<String>) -> Error {
    Error::CorruptStore {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}
