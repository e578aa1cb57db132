use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Optional startup configuration, read from `bankview.json` next to the
/// working directory. Everything here is cosmetic; a missing or malformed
/// file degrades to defaults with a logged warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the decorative sidebar logo. Absence is not an error.
    pub logo: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            logo: Some(PathBuf::from("assets/logo.png")),
        }
    }
}

pub const CONFIG_FILE: &str = "bankview.json";

impl AppConfig {
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// The logo path, if configured and actually present on disk.
    pub fn logo_if_present(&self) -> Option<&Path> {
        let path = self.logo.as_deref()?;
        if path.is_file() {
            Some(path)
        } else {
            log::warn!("logo image not found at {}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from(Path::new("definitely/not/here.json"));
        assert_eq!(config.logo, AppConfig::default().logo);
    }

    #[test]
    fn config_json_round_trips() {
        let config = AppConfig {
            logo: Some(PathBuf::from("img/bank.jpg")),
        };
        let text = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.logo, config.logo);
    }

    #[test]
    fn absent_logo_path_is_not_an_error() {
        let config = AppConfig {
            logo: Some(PathBuf::from("nowhere/logo.png")),
        };
        assert!(config.logo_if_present().is_none());

        let config = AppConfig { logo: None };
        assert!(config.logo_if_present().is_none());
    }
}
