//! Persistence of the free-text session notes.
//!
//! The whole blob is stored as `{"notes": "..."}` in one file and always
//! read and written whole.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const NOTES_FILE: &str = "notes.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct NotesFile {
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store using [`NOTES_FILE`] inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(NOTES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved notes, or an empty string when nothing was saved yet
    pub fn load(&self) -> Result<String> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(String::new()),
            Err(source) => {
                return Err(DashboardError::NotesIo {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let file: NotesFile =
            serde_json::from_str(&text).map_err(|source| DashboardError::NotesFormat {
                path: self.path.clone(),
                source,
            })?;
        Ok(file.notes)
    }

    /// Overwrite the saved notes
    pub fn save(&self, notes: &str) -> Result<()> {
        let file = NotesFile {
            notes: notes.to_string(),
        };
        let json = serde_json::to_string(&file).map_err(|source| DashboardError::NotesFormat {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| DashboardError::NotesIo {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), bytes = notes.len(), "Notes saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.save("")
    }
}
