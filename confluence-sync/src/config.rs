use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Location of the RON settings file (host, token, mapping).
    pub const SETTINGS_PATH: &str = "CONFLUENCE_SYNC_SETTINGS";
    /// Note the commands act on when no path is given on the command line.
    pub const ACTIVE_NOTE: &str = "CONFLUENCE_SYNC_ACTIVE_NOTE";
    /// Per-request timeout in seconds. Unset or 0 means no timeout.
    pub const HTTP_TIMEOUT_SECS: &str = "CONFLUENCE_SYNC_HTTP_TIMEOUT_SECS";
}

/// Default values
pub mod defaults {
    pub const SETTINGS_DIR: &str = ".confluence-sync";
    pub const SETTINGS_FILE: &str = "settings.ron";
}

/// Default settings path, relative to the working directory (the vault root)
pub fn default_settings_path() -> PathBuf {
    PathBuf::from(defaults::SETTINGS_DIR).join(defaults::SETTINGS_FILE)
}

#[derive(Clone, Debug)]
pub struct Config {
    pub settings_path: PathBuf,
    pub active_note: Option<PathBuf>,
    pub http_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Self {
        let settings_path = env::var(env_vars::SETTINGS_PATH)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_settings_path);

        let active_note = env::var(env_vars::ACTIVE_NOTE)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let http_timeout = env::var(env_vars::HTTP_TIMEOUT_SECS)
            .ok()
            .and_then(|s| parse_timeout_secs(&s));

        Self {
            settings_path,
            active_note,
            http_timeout,
        }
    }

    /// Command line values win over the environment
    pub fn with_overrides(mut self, settings_path: Option<PathBuf>) -> Self {
        if let Some(path) = settings_path {
            self.settings_path = path;
        }
        self
    }

    /// The note a command should act on: the explicit argument, else the
    /// configured active note, else none.
    pub fn resolve_note(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.active_note.clone())
    }
}

fn parse_timeout_secs(value: &str) -> Option<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            log::warn!(
                "Ignoring invalid {} value {:?}",
                env_vars::HTTP_TIMEOUT_SECS,
                value
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_secs() {
        assert_eq!(parse_timeout_secs("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout_secs(" 5 "), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout_secs("0"), None);
        assert_eq!(parse_timeout_secs("soon"), None);
    }

    #[test]
    fn test_resolve_note_prefers_explicit_path() {
        let config = Config {
            settings_path: default_settings_path(),
            active_note: Some(PathBuf::from("active.md")),
            http_timeout: None,
        };
        assert_eq!(
            config.resolve_note(Some(PathBuf::from("given.md"))),
            Some(PathBuf::from("given.md"))
        );
        assert_eq!(config.resolve_note(None), Some(PathBuf::from("active.md")));
    }

    #[test]
    fn test_settings_path_override() {
        let config = Config {
            settings_path: default_settings_path(),
            active_note: None,
            http_timeout: None,
        }
        .with_overrides(Some(PathBuf::from("/tmp/other.ron")));
        assert_eq!(config.settings_path, PathBuf::from("/tmp/other.ron"));
        assert_eq!(config.resolve_note(None), None);
    }
}
