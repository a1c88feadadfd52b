//! Local application configuration.
//!
//! A single JSON file stores the settings this client needs before it can
//! reach the backend. Everything else (company data, logo, etc.) lives on
//! the server and is edited through the Configurações screen.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Settings persisted on the local machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend REST API, without a trailing slash
    pub api_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
        }
    }
}

/// Get the path of the config file
///
/// - Linux: ~/.config/gestor-desktop/config.json
/// - macOS: ~/Library/Application Support/gestor-desktop/config.json
/// - Windows: %APPDATA%\gestor-desktop\config.json
pub fn config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
    path.push("gestor-desktop");
    path.push("config.json");
    Some(path)
}

/// Load the configuration, writing the defaults on first run.
///
/// A malformed or unreadable file never aborts startup: the defaults are
/// used and a warning is printed.
pub fn load() -> AppConfig {
    let Some(path) = config_path() else {
        eprintln!("⚠️  Could not determine config directory, using defaults");
        return AppConfig::default();
    };

    match fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("⚠️  Invalid config at {}: {} (using defaults)", path.display(), e);
                AppConfig::default()
            }
        },
        Err(_) => {
            // First run: seed the file so the user has something to edit
            let config = AppConfig::default();
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match serde_json::to_string_pretty(&config) {
                Ok(json) => {
                    if fs::write(&path, json).is_ok() {
                        println!("📁 Wrote default config to {}", path.display());
                    }
                }
                Err(e) => eprintln!("⚠️  Could not serialize default config: {}", e),
            }
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_has_no_trailing_slash() {
        let config = AppConfig::default();
        assert!(!config.api_base_url.ends_with('/'));
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig {
            api_base_url: "https://api.example.com/v1".to_string(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.api_base_url, config.api_base_url);
    }
}
