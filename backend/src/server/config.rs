//! Application settings loaded via OrthoConfig.
//!
//! Values layer in the usual order: defaults, configuration file,
//! `BACKOFFICE_*` environment variables, then CLI flags.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/backoffice";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 10;

/// Runtime settings for the backend process.
#[derive(Debug, Clone, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BACKOFFICE")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Maximum size of the database connection pool.
    pub max_db_connections: Option<u32>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// Whether the session cookie requires HTTPS.
    #[ortho_config(default = true, cli_default_as_absent)]
    pub cookie_secure: bool,
}

impl AppSettings {
    /// The configured database URL, falling back to a local default.
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    /// The configured bind address, falling back to the default port.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// The configured pool size, falling back to the default.
    pub fn max_db_connections(&self) -> u32 {
        self.max_db_connections
            .unwrap_or(DEFAULT_MAX_DB_CONNECTIONS)
    }

    /// The configured session key path, falling back to the default secret
    /// mount.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("BACKOFFICE_DATABASE_URL", None::<String>),
            ("BACKOFFICE_BIND_ADDR", None::<String>),
            ("BACKOFFICE_MAX_DB_CONNECTIONS", None::<String>),
            ("BACKOFFICE_SESSION_KEY_FILE", None::<String>),
            ("BACKOFFICE_COOKIE_SECURE", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.max_db_connections(), DEFAULT_MAX_DB_CONNECTIONS);
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(settings.cookie_secure);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "BACKOFFICE_DATABASE_URL",
                Some("postgres://db.internal/backoffice".to_owned()),
            ),
            ("BACKOFFICE_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("BACKOFFICE_MAX_DB_CONNECTIONS", Some("4".to_owned())),
            ("BACKOFFICE_SESSION_KEY_FILE", None::<String>),
            ("BACKOFFICE_COOKIE_SECURE", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), "postgres://db.internal/backoffice");
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090");
        assert_eq!(settings.max_db_connections(), 4);
        assert!(!settings.cookie_secure);
    }
}
