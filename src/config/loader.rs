//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `model.path`.
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";

/// Environment variable overriding `listener.port`.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var} value '{value}': expected a port number")]
    InvalidPort { var: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file (no overrides, no validation).
pub fn load_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply `MODEL_PATH` and `PORT` overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut ServerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(MODEL_PATH_ENV) {
        config.model.path = path;
    }
    if let Some(port) = lookup(PORT_ENV) {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
            var: PORT_ENV,
            value: port.clone(),
        })?;
    }
    Ok(())
}

/// Build the effective configuration: defaults, then the optional file,
/// then the process environment. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => ServerConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.model.path, "models/churn.toml");
        assert!(config.model.convert_unknown_levels_to_na);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        apply_env_overrides(&mut config, env(&[("MODEL_PATH", "/srv/m.toml"), ("PORT", "9000")]))
            .unwrap();
        assert_eq!(config.model.path, "/srv/m.toml");
        assert_eq!(config.listener.port, 9000);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid PORT value 'eighty': expected a port number"
        );
    }

    #[test]
    fn test_partial_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            port = 3000

            [model]
            convert_unknown_levels_to_na = false

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.model.path, "models/churn.toml");
        assert!(!config.model.convert_unknown_levels_to_na);
        assert!(config.model.convert_invalid_numbers_to_na);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.limits.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Path::new("/nonexistent/server.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validation_message() {
        let err = ConfigError::Validation(vec![
            ValidationError::ZeroPort,
            ValidationError::ZeroTimeout,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: listener.port must be non-zero, timeouts.request_secs must be greater than zero"
        );
    }
}
