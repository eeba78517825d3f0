//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// A validated configuration together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: ConfigSource,
}

/// Load and validate configuration from a TOML file.
///
/// A missing file is not an error: the defaults are validated and returned.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let (config, source) = match fs::read_to_string(path) {
        Ok(content) => (
            toml::from_str::<AppConfig>(&content)?,
            ConfigSource::File(path.to_path_buf()),
        ),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            (AppConfig::default(), ConfigSource::Defaults)
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig { config, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_uses_defaults() {
        let loaded = load_config(Path::new("definitely-not-here.toml")).unwrap();
        assert_eq!(loaded.source, ConfigSource::Defaults);
        assert_eq!(loaded.config.listener.host, "localhost");
        assert_eq!(loaded.config.listener.port, 8080);
        assert_eq!(loaded.config.static_files.directory, "./public");
        assert_eq!(loaded.config.logging.level, "info");
    }

    #[test]
    fn full_file_overrides_defaults() {
        let file = write_config(
            r#"
[server]
host = "0.0.0.0"
port = 9090
read_timeout_secs = 60
write_timeout_secs = 60
idle_timeout_secs = 240

[static]
directory = "./test-public"
cache_max_age = "7200"

[logging]
level = "debug"
enable_request_logging = false

[middleware]
enable_cors = false
enable_compression = true

[proxy]
upstream = "http://10.0.0.5:3000"
"#,
        );

        let loaded = load_config(file.path()).unwrap();
        let config = loaded.config;
        assert_eq!(loaded.source, ConfigSource::File(file.path().to_path_buf()));
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.listener.port, 9090);
        assert_eq!(config.listener.read_timeout().as_secs(), 60);
        assert_eq!(config.listener.idle_timeout().as_secs(), 240);
        assert_eq!(config.listener.shutdown_grace_secs, 30);
        assert_eq!(config.static_files.directory, "./test-public");
        assert_eq!(config.static_files.cache_max_age, "7200");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.enable_request_logging);
        assert!(!config.middleware.enable_cors);
        assert!(config.middleware.enable_compression);
        assert_eq!(config.proxy.upstream, "http://10.0.0.5:3000");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let file = write_config("[static]\ncache_max_age = \"\"\n");
        let config = load_config(file.path()).unwrap().config;
        assert_eq!(config.static_files.cache_max_age, "");
        assert_eq!(config.static_files.directory, "./public");
        assert!(config.middleware.enable_cors);
    }

    #[test]
    fn out_of_range_port_is_parse_error() {
        let file = write_config("[server]\nport = 70000\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn invalid_values_are_validation_errors() {
        let file = write_config("[server]\nport = 0\n[logging]\nlevel = \"loud\"\n");
        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.source, ConfigSource::File(path));
        assert_eq!(
            toml::to_string(&loaded.config).unwrap(),
            toml::to_string(&AppConfig::default()).unwrap()
        );
    }
}
