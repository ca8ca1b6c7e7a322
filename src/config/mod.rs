//! Application configuration loaded from a TOML file

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

const DEFAULT_REMOTE_TABLE: &str = "inspection_reports";

/// Which record store backs the report archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Embedded SQLite database under the data directory
    Local,
    /// Hosted PostgREST table
    Remote {
        base_url: String,
        api_key: String,
        table: String,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend for the report archive
    pub backend: StorageBackend,
    /// Pre-filled internal reviewer name for new reports
    pub employee_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            employee_name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum TomlBackendKind {
    Local,
    Remote,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TomlStorageConfig {
    backend: Option<TomlBackendKind>,
    base_url: Option<String>,
    api_key: Option<String>,
    table: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlEmployeeConfig {
    name: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
struct TomlConfig {
    storage: Option<TomlStorageConfig>,
    employee: Option<TomlEmployeeConfig>,
}

impl Config {
    /// Load configuration from file, merging with defaults
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        match fs::read_to_string(&config_file) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(_) => Config::default(),
        }
    }

    fn from_toml_str(contents: &str) -> Self {
        let mut config = Config::default();

        let Ok(toml_config) = toml::from_str::<TomlConfig>(contents) else {
            tracing::warn!("Malformed config file, falling back to defaults");
            return config;
        };

        if let Some(storage) = toml_config.storage {
            config.backend = match storage.backend {
                Some(TomlBackendKind::Remote) => {
                    match (storage.base_url, storage.api_key) {
                        (Some(base_url), Some(api_key)) => StorageBackend::Remote {
                            base_url,
                            api_key,
                            table: storage
                                .table
                                .unwrap_or_else(|| DEFAULT_REMOTE_TABLE.to_string()),
                        },
                        // Incomplete remote settings keep the local store
                        _ => {
                            tracing::warn!(
                                "Remote backend configured without base-url/api-key, using local store"
                            );
                            StorageBackend::Local
                        }
                    }
                }
                _ => StorageBackend::Local,
            };
        }

        if let Some(employee) = toml_config.employee {
            config.employee_name = employee.name;
        }

        config
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!("Failed to create config directory: {e}");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!("Failed to write default config: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("");
        assert_eq!(config.backend, StorageBackend::Local);
        assert!(config.employee_name.is_none());
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config = Config::from_toml_str(EXAMPLE_CONFIG);
        assert_eq!(config.backend, StorageBackend::Local);
    }

    #[test]
    fn test_remote_backend_with_credentials() {
        let config = Config::from_toml_str(
            r#"
            [storage]
            backend = "remote"
            base-url = "https://example.supabase.co"
            api-key = "secret"
            "#,
        );
        assert_eq!(
            config.backend,
            StorageBackend::Remote {
                base_url: "https://example.supabase.co".to_string(),
                api_key: "secret".to_string(),
                table: "inspection_reports".to_string(),
            }
        );
    }

    #[test]
    fn test_incomplete_remote_falls_back_to_local() {
        let config = Config::from_toml_str(
            r#"
            [storage]
            backend = "remote"
            base-url = "https://example.supabase.co"
            "#,
        );
        assert_eq!(config.backend, StorageBackend::Local);
    }

    #[test]
    fn test_employee_name() {
        let config = Config::from_toml_str("[employee]\nname = \"Erika Muster\"\n");
        assert_eq!(config.employee_name.as_deref(), Some("Erika Muster"));
    }

    #[test]
    fn test_malformed_toml_uses_defaults() {
        let config = Config::from_toml_str("[[[not toml");
        assert_eq!(config.backend, StorageBackend::Local);
    }
}
