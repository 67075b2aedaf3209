// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

/// Feedhub Core configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HMAC secret for bearer token signing
    pub jwt_secret: String,
    /// Bearer token lifetime in hours
    pub token_ttl_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `FEEDHUB_DATABASE_URL`: PostgreSQL connection string
    /// - `FEEDHUB_JWT_SECRET`: HMAC secret for bearer tokens
    ///
    /// Optional (with defaults):
    /// - `FEEDHUB_TOKEN_TTL_HOURS`: Bearer token lifetime (default: 24)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("FEEDHUB_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("FEEDHUB_DATABASE_URL"))?;

        let jwt_secret = std::env::var("FEEDHUB_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("FEEDHUB_JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid(
                "FEEDHUB_JWT_SECRET",
                "must not be empty",
            ));
        }

        let token_ttl_hours: i64 = std::env::var("FEEDHUB_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("FEEDHUB_TOKEN_TTL_HOURS", "must be a positive integer")
            })?;
        if token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "FEEDHUB_TOKEN_TTL_HOURS",
                "must be a positive integer",
            ));
        }

        Ok(Self {
            database_url,
            jwt_secret,
            token_ttl_hours,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set env vars for a test and restore them after
    struct EnvGuard {
        vars: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            let old = env::var(key).ok();
            self.vars.push((key.to_string(), old));
            // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
            unsafe { env::set_var(key, value) };
        }

        fn remove(&mut self, key: &str) {
            let old = env::var(key).ok();
            self.vars.push((key.to_string(), old));
            // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
            unsafe { env::remove_var(key) };
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.vars.drain(..).rev() {
                // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
                unsafe {
                    match value {
                        Some(v) => env::set_var(&key, v),
                        None => env::remove_var(&key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_config_from_env_with_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("FEEDHUB_DATABASE_URL", "postgres://localhost/feedhub");
        guard.set("FEEDHUB_JWT_SECRET", "s3cret");
        guard.remove("FEEDHUB_TOKEN_TTL_HOURS");

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://localhost/feedhub");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl_hours, 24);
    }

    #[test]
    fn test_config_from_env_all_custom() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("FEEDHUB_DATABASE_URL", "postgres://user:pass@db:5432/prod");
        guard.set("FEEDHUB_JWT_SECRET", "prod-secret");
        guard.set("FEEDHUB_TOKEN_TTL_HOURS", "72");

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://user:pass@db:5432/prod");
        assert_eq!(config.token_ttl_hours, 72);
    }

    #[test]
    fn test_config_missing_database_url() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.remove("FEEDHUB_DATABASE_URL");
        guard.set("FEEDHUB_JWT_SECRET", "s3cret");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("FEEDHUB_DATABASE_URL")));
        assert!(err.to_string().contains("FEEDHUB_DATABASE_URL"));
    }

    #[test]
    fn test_config_missing_jwt_secret() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("FEEDHUB_DATABASE_URL", "postgres://localhost/feedhub");
        guard.remove("FEEDHUB_JWT_SECRET");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("FEEDHUB_JWT_SECRET")));
    }

    #[test]
    fn test_config_empty_jwt_secret() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("FEEDHUB_DATABASE_URL", "postgres://localhost/feedhub");
        guard.set("FEEDHUB_JWT_SECRET", "");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("FEEDHUB_JWT_SECRET", _)));
    }

    #[test]
    fn test_config_invalid_ttl() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("FEEDHUB_DATABASE_URL", "postgres://localhost/feedhub");
        guard.set("FEEDHUB_JWT_SECRET", "s3cret");
        guard.set("FEEDHUB_TOKEN_TTL_HOURS", "not_a_number");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("FEEDHUB_TOKEN_TTL_HOURS", _)
        ));
    }

    #[test]
    fn test_config_non_positive_ttl() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("FEEDHUB_DATABASE_URL", "postgres://localhost/feedhub");
        guard.set("FEEDHUB_JWT_SECRET", "s3cret");
        guard.set("FEEDHUB_TOKEN_TTL_HOURS", "0");

        assert!(Config::from_env().is_err());
    }
}
