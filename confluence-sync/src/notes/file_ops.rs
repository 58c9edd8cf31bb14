//! File operations for notes
//!
//! Loads a markdown note with its display title and writes it back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SyncError;

/// A note on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub path: PathBuf,
    /// Display title: the file name without its extension
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path).map_err(|source| SyncError::NoteRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            title: note_title(path),
            content,
        })
    }

    /// Write `content` back to `path`
    pub fn save(&self) -> Result<(), SyncError> {
        write_note(&self.path, &self.content).map_err(|source| SyncError::NoteWrite {
            path: self.path.clone(),
            source,
        })
    }
}

/// Title shown for a note (e.g. "notes/Release Plan.md" -> "Release Plan")
pub fn note_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Write a note file in place
pub fn write_note(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content.as_bytes())
}
