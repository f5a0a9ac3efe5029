//! Persisted CLI defaults, stored as RON next to the working directory.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

const DEFAULTS_FILENAME: &str = ".chainfiles.ron";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppDefaults {
    pub endpoint: String,
    pub page_size: u32,
}

impl Default for AppDefaults {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/".to_string(),
            page_size: 100,
        }
    }
}

/// Load persisted defaults; a missing or unreadable file falls back to the
/// built-in defaults, with a warning for anything other than "not found".
pub fn load_defaults(dir: &Path) -> AppDefaults {
    let path = dir.join(DEFAULTS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppDefaults::default();
        }
        Err(err) => {
            engine_warn!("Failed to read defaults from {:?}: {}", path, err);
            return AppDefaults::default();
        }
    };

    match ron::from_str(&content) {
        Ok(defaults) => {
            engine_info!("Loaded persisted defaults from {:?}", path);
            defaults
        }
        Err(err) => {
            engine_warn!("Failed to parse defaults from {:?}: {}", path, err);
            AppDefaults::default()
        }
    }
}

/// Write defaults atomically: temp file in the same directory, then rename.
pub fn save_defaults(dir: &Path, defaults: &AppDefaults) -> Result<()> {
    let path = dir.join(DEFAULTS_FILENAME);
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(defaults, pretty).context("serialize defaults")?;

    let mut tmp = NamedTempFile::new_in(dir).context("create temp defaults file")?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(&path)
        .with_context(|| format!("persist defaults to {path:?}"))?;

    engine_info!("Saved defaults to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_builtin_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        assert_eq!(load_defaults(temp.path()), AppDefaults::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempfile::TempDir::new().unwrap();
        let defaults = AppDefaults {
            endpoint: "https://ledger.example/".to_string(),
            page_size: 10,
        };

        save_defaults(temp.path(), &defaults).unwrap();
        assert_eq!(load_defaults(temp.path()), defaults);
    }

    #[test]
    fn garbage_file_falls_back_to_builtin_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join(DEFAULTS_FILENAME), "not ron at all").unwrap();

        assert_eq!(load_defaults(temp.path()), AppDefaults::default());
    }
}
