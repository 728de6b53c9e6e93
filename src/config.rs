//! Runtime configuration loaded from environment variables (and `.env`).

use std::env;
use std::path::PathBuf;

use crate::badge::FailurePolicy;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Web server port
    pub port: u16,
    /// Where CLI mode writes generated documents
    pub output_dir: PathBuf,
    /// Where uploaded logos are stored and served from
    pub static_dir: PathBuf,
    /// Handling of assignments that do not resolve
    pub failure_policy: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            output_dir: PathBuf::from("output"),
            static_dir: PathBuf::from("static"),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Config::default();
        let port = match env::var("PORT") {
            Ok(port) => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", port))?,
            Err(_) => defaults.port,
        };
        let failure_policy = match env::var("BADGE_FAILURE_POLICY") {
            Ok(policy) => policy
                .parse()
                .map_err(|_| ConfigError::Invalid("BADGE_FAILURE_POLICY", policy))?,
            Err(_) => defaults.failure_policy,
        };

        Ok(Self {
            port,
            output_dir: env::var("BADGE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            static_dir: env::var("BADGE_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            failure_policy,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "9090");
        env::set_var("BADGE_FAILURE_POLICY", "skip-person");
        env::set_var("BADGE_OUTPUT_DIR", "/tmp/badges");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 9090);
        assert_eq!(config.failure_policy, FailurePolicy::SkipPerson);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/badges"));

        env::set_var("PORT", "not-a-port");
        assert!(matches!(Config::from_env(), Err(ConfigError::Invalid("PORT", _))));

        env::remove_var("PORT");
        env::remove_var("BADGE_FAILURE_POLICY");
        env::remove_var("BADGE_OUTPUT_DIR");
    }
}
