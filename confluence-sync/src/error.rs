use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Failed to write settings file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfluenceError {
    #[error("Confluence host is not configured (run `config set-host`)")]
    MissingHost,

    #[error("Personal access token is not configured (run `config set-token`)")]
    MissingToken,

    #[error("Confluence request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Could not read Confluence page {page_id}: HTTP {status}: {body}")]
    FetchFailed {
        page_id: String,
        status: StatusCode,
        body: String,
    },

    #[error("Could not decode Confluence page {page_id}: {source}")]
    Decode {
        page_id: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to read note {path:?}: {source}")]
    NoteRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write note {path:?}: {source}")]
    NoteWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Remote(#[from] ConfluenceError),

    #[error("Failed to read page id from prompt: {0}")]
    Prompt(#[source] std::io::Error),
}
