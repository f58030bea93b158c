//! Application settings loaded from environment variables

use crate::env::{is_truthy, load_env, split_list};
use crate::error::{ConfigError, Result};
use monorepo_shared::{Environment, LogLevel};
use once_cell::sync::OnceCell;
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Default secret key. Deployments are expected to override it.
pub const DEFAULT_SECRET_KEY: &str = "change-me-in-production";

/// File read by [`Settings::load`]. `.env.local` is not consulted.
pub const SETTINGS_ENV_FILE: &str = ".env";

/// Minimum length of a secret key supplied through the environment.
pub const MIN_SECRET_KEY_LEN: usize = 32;

/// Application settings.
///
/// Each field is read from the upper-case variable of the same name (`APP_NAME`, `PORT`,
/// `SECRET_KEY`, ...). Unset variables keep their defaults; set but invalid values are errors.
///
/// # Example
///
/// ```no_run
/// use monorepo_config::Settings;
///
/// # fn main() -> monorepo_config::Result<()> {
/// let settings = Settings::from_env()?;
/// println!("{} listening on {}:{}", settings.app_name, settings.host, settings.port);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    /// Application environment
    pub environment: Environment,
    /// Enable debug mode
    pub debug: bool,
    /// Logging level
    pub log_level: LogLevel,

    /// Application name
    pub app_name: String,
    /// Application version
    pub app_version: String,

    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,

    /// Database connection URL
    pub database_url: Option<String>,
    /// Redis connection URL
    pub redis_url: Option<String>,

    /// Application secret key
    pub secret_key: SecretString,

    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            debug: false,
            log_level: LogLevel::Info,
            app_name: "Monorepo App".to_string(),
            app_version: "0.1.0".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: None,
            redis_url: None,
            secret_key: SecretString::new(DEFAULT_SECRET_KEY.into()),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// This will look for:
    /// - `ENVIRONMENT` - `development`, `staging`, `production`, or `test`
    /// - `DEBUG` - boolean (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`)
    /// - `LOG_LEVEL` - `DEBUG`, `INFO`, `WARNING`, `ERROR`, or `CRITICAL`
    /// - `APP_NAME`, `APP_VERSION`, `HOST`
    /// - `PORT` - 1 to 65535
    /// - `DATABASE_URL`, `REDIS_URL`
    /// - `SECRET_KEY` - at least 32 characters
    /// - `CORS_ORIGINS` - JSON array or comma-separated list
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first variable that fails validation.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Some(value) = read("ENVIRONMENT") {
            settings.environment = parse_with("ENVIRONMENT", &value)?;
        }

        if let Some(value) = read("DEBUG") {
            settings.debug = parse_bool("DEBUG", &value)?;
        }

        if let Some(value) = read("LOG_LEVEL") {
            settings.log_level = parse_with("LOG_LEVEL", &value)?;
        }

        if let Some(value) = read("APP_NAME") {
            settings.app_name = value;
        }

        if let Some(value) = read("APP_VERSION") {
            settings.app_version = value;
        }

        if let Some(value) = read("HOST") {
            settings.host = value;
        }

        if let Some(value) = read("PORT") {
            settings.port = parse_port(&value)?;
        }

        settings.database_url = read("DATABASE_URL");
        settings.redis_url = read("REDIS_URL");

        if let Some(value) = read("SECRET_KEY") {
            if value.chars().count() < MIN_SECRET_KEY_LEN {
                return Err(ConfigError::invalid(
                    "SECRET_KEY",
                    format!("must be at least {MIN_SECRET_KEY_LEN} characters"),
                ));
            }
            settings.secret_key = SecretString::new(value.into_boxed_str());
        }

        if let Some(value) = read("CORS_ORIGINS") {
            settings.cors_origins = parse_list("CORS_ORIGINS", &value)?;
        }

        Ok(settings)
    }

    /// Load `.env` from the working directory (if present), then read settings from the
    /// environment.
    pub fn load() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| ConfigError::EnvFile(dotenvy::Error::Io(e)))?;
        Self::load_from_dir(&cwd)
    }

    /// Load `dir/.env` (if present), then read settings from the environment.
    ///
    /// Variables already set in the process win over the file.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        load_env(Some(&dir.join(SETTINGS_ENV_FILE)), false)?;
        Self::from_env()
    }

    /// Check if running in the development environment.
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Check if running in the production environment.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Check if running in the test environment.
    pub fn is_test(&self) -> bool {
        self.environment == Environment::Test
    }

    /// Whether the secret key is still the built-in default.
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key.expose_secret() == DEFAULT_SECRET_KEY
    }
}

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Get the process-wide settings, loading them on first use.
///
/// A failed load is not cached; the next call tries again.
pub fn get_settings() -> Result<&'static Settings> {
    SETTINGS.get_or_try_init(|| {
        let settings = Settings::load()?;
        tracing::debug!(
            environment = %settings.environment,
            log_level = %settings.log_level,
            "settings loaded"
        );
        if settings.is_production() && settings.uses_default_secret() {
            tracing::warn!("SECRET_KEY is not set in production");
        }
        Ok(settings)
    })
}

/// Read a variable, treating non-unicode values as unset.
fn read(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_with<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|reason| ConfigError::invalid(key, reason))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    if is_truthy(value) {
        return Ok(true);
    }
    match value.to_ascii_lowercase().as_str() {
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, format!("'{value}' is not a boolean"))),
    }
}

fn parse_port(value: &str) -> Result<u16> {
    match value.trim().parse::<u16>() {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(ConfigError::invalid(
            "PORT",
            format!("'{value}' is not a port between 1 and 65535"),
        )),
    }
}

fn parse_list(key: &str, value: &str) -> Result<Vec<String>> {
    if value.trim_start().starts_with('[') {
        return serde_json::from_str(value)
            .map_err(|e| ConfigError::invalid(key, format!("invalid JSON list: {e}")));
    }
    Ok(split_list(value, ","))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 11] = [
        "ENVIRONMENT",
        "DEBUG",
        "LOG_LEVEL",
        "APP_NAME",
        "APP_VERSION",
        "HOST",
        "PORT",
        "DATABASE_URL",
        "REDIS_URL",
        "SECRET_KEY",
        "CORS_ORIGINS",
    ];

    fn with_clean_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let mut all: Vec<(&str, Option<&str>)> = VARS.iter().map(|key| (*key, None)).collect();
        for (key, value) in vars {
            all.retain(|(k, _)| k != key);
            all.push((*key, Some(*value)));
        }
        temp_env::with_vars(all, f)
    }

    #[test]
    fn test_defaults() {
        let settings = with_clean_env(&[], Settings::from_env).unwrap();
        assert_eq!(settings.environment, Environment::Development);
        assert!(!settings.debug);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.app_name, "Monorepo App");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.database_url, None);
        assert_eq!(settings.cors_origins, ["http://localhost:3000"]);
        assert!(settings.uses_default_secret());
        assert!(settings.is_development());
    }

    #[test]
    fn test_reads_environment() {
        let secret = "s".repeat(40);
        let settings = with_clean_env(
            &[
                ("ENVIRONMENT", "production"),
                ("DEBUG", "yes"),
                ("LOG_LEVEL", "warning"),
                ("APP_NAME", "Test App"),
                ("PORT", "9000"),
                ("DATABASE_URL", "postgres://localhost/db"),
                ("SECRET_KEY", secret.as_str()),
                ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ],
            Settings::from_env,
        )
        .unwrap();

        assert!(settings.is_production());
        assert!(settings.debug);
        assert_eq!(settings.log_level, LogLevel::Warning);
        assert_eq!(settings.app_name, "Test App");
        assert_eq!(settings.port, 9000);
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/db")
        );
        assert_eq!(settings.secret_key.expose_secret(), secret);
        assert_eq!(
            settings.cors_origins,
            ["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_cors_origins_json() {
        let settings = with_clean_env(
            &[("CORS_ORIGINS", r#"["https://a.example","https://b.example"]"#)],
            Settings::from_env,
        )
        .unwrap();
        assert_eq!(settings.cors_origins.len(), 2);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let cases = [
            ("PORT", "0"),
            ("PORT", "70000"),
            ("ENVIRONMENT", "qa"),
            ("LOG_LEVEL", "loud"),
            ("DEBUG", "maybe"),
            ("SECRET_KEY", "too-short"),
            ("CORS_ORIGINS", "[not json"),
        ];
        for (key, value) in cases {
            let err = with_clean_env(&[(key, value)], Settings::from_env).unwrap_err();
            assert_eq!(err.key(), Some(key), "{key}={value} should be rejected");
        }
    }

    #[test]
    fn test_secret_key_is_redacted_in_debug() {
        let secret = "k".repeat(32);
        let settings =
            with_clean_env(&[("SECRET_KEY", secret.as_str())], Settings::from_env).unwrap();
        assert!(!format!("{settings:?}").contains(&secret));
    }
}
