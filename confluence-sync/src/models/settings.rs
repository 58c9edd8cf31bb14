//! User settings backed by a RON file.
//!
//! Holds the Confluence host, the personal access token and the note → page
//! mapping. Loaded once at startup into a [`SettingsRepository`] and written
//! back after every mutation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::mapping::Mapping;

/// Persisted settings record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub confluence_host: String,
    #[serde(default)]
    pub personal_access_token: String,
    #[serde(default)]
    pub mapping: Mapping,
}

impl Settings {
    /// Load from `path`. A missing file yields `Default`; an unreadable or
    /// malformed file is an error so a later save cannot clobber the mapping.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[SETTINGS] No settings at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        ron::from_str::<Settings>(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize to pretty RON and write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let pretty = ron::ser::PrettyConfig::default();
        let content = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

/// Owns the in-memory settings and the file they live in.
///
/// Every mutating method persists before returning, so the file always
/// reflects the last successful change.
#[derive(Debug)]
pub struct SettingsRepository {
    path: PathBuf,
    settings: Settings,
}

impl SettingsRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = Settings::load(&path)?;
        log::debug!(
            "[SETTINGS] Loaded {} mapping entries from {:?}",
            settings.mapping.len(),
            path
        );
        Ok(Self { path, settings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mapping(&self) -> &Mapping {
        &self.settings.mapping
    }

    pub fn set_host(&mut self, host: &str) -> Result<(), SettingsError> {
        self.update(|s| s.confluence_host = host.trim().to_string())
    }

    pub fn set_token(&mut self, token: &str) -> Result<(), SettingsError> {
        self.update(|s| s.personal_access_token = token.trim().to_string())
    }

    /// Record the page id for an identifier
    pub fn set_page(&mut self, unique_id: &str, page_id: &str) -> Result<(), SettingsError> {
        self.update(|s| s.mapping.set(unique_id, page_id))
    }

    /// Reserve an empty mapping entry for a new identifier
    pub fn insert_slot(&mut self, unique_id: &str) -> Result<(), SettingsError> {
        self.update(|s| s.mapping.insert_slot(unique_id))
    }

    fn update(&mut self, f: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        f(&mut self.settings);
        self.settings.save(&self.path)?;
        log::debug!("[SETTINGS] Saved settings to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/settings.ron");

        let mut settings = Settings {
            confluence_host: "https://wiki.example.com".to_string(),
            personal_access_token: "secret".to_string(),
            mapping: Mapping::default(),
        };
        settings.mapping.set("id-1", "12345");
        settings.mapping.insert_slot("id-2");
        settings.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("confluenceHost"));
        assert!(raw.contains("personalAccessToken"));

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        std::fs::write(&path, r#"(confluenceHost: "https://wiki")"#).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.confluence_host, "https://wiki");
        assert!(loaded.personal_access_token.is_empty());
        assert!(loaded.mapping.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        std::fs::write(&path, "(confluenceHost: ").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_repository_persists_every_mutation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ron");

        let mut repo = SettingsRepository::open(&path).unwrap();
        repo.set_host(" https://wiki.example.com ").unwrap();
        repo.set_token("tok").unwrap();
        repo.insert_slot("uuid-1").unwrap();
        repo.set_page("uuid-1", "777").unwrap();

        let reopened = SettingsRepository::open(&path).unwrap();
        assert_eq!(reopened.settings().confluence_host, "https://wiki.example.com");
        assert_eq!(reopened.settings().personal_access_token, "tok");
        assert_eq!(reopened.mapping().get("uuid-1"), Some("777"));
    }
}
