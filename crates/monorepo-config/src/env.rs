//! Environment variable helpers
//!
//! Thin, typed accessors over the process environment plus `.env` file loading via `dotenvy`.

use crate::error::{ConfigError, Result};
use monorepo_shared::Environment;
use std::env;
use std::path::{Path, PathBuf};

/// Variable that selects the application environment.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Files tried, in order, when no explicit env file is given.
pub const DEFAULT_ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Load environment variables from a `.env` file.
///
/// With `env_file` set, only that file is loaded. Otherwise the first existing file out of
/// [`DEFAULT_ENV_FILES`] in the current working directory is loaded. Existing variables are kept
/// unless `override_existing` is true.
///
/// Returns `Ok(false)` when no file was found.
///
/// # Errors
///
/// Returns [`ConfigError::EnvFile`] if a file exists but cannot be parsed.
///
/// # Example
///
/// ```no_run
/// use monorepo_config::load_env;
///
/// # fn main() -> monorepo_config::Result<()> {
/// if load_env(None, false)? {
///     println!("loaded .env");
/// }
/// # Ok(())
/// # }
/// ```
pub fn load_env(env_file: Option<&Path>, override_existing: bool) -> Result<bool> {
    match env_file {
        Some(path) => load_file(path, override_existing),
        None => {
            let cwd = env::current_dir().map_err(|e| ConfigError::EnvFile(dotenvy::Error::Io(e)))?;
            load_env_from_dir(&cwd, override_existing)
        }
    }
}

/// Load the first of [`DEFAULT_ENV_FILES`] that exists in `dir`.
pub fn load_env_from_dir(dir: &Path, override_existing: bool) -> Result<bool> {
    match find_env_file(dir) {
        Some(path) => load_file(&path, override_existing),
        None => Ok(false),
    }
}

fn find_env_file(dir: &Path) -> Option<PathBuf> {
    DEFAULT_ENV_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn load_file(path: &Path, override_existing: bool) -> Result<bool> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "env file not found");
        return Ok(false);
    }

    if override_existing {
        dotenvy::from_path_override(path)?;
    } else {
        dotenvy::from_path(path)?;
    }

    tracing::debug!(path = %path.display(), override_existing, "loaded env file");
    Ok(true)
}

/// Get the current environment from `ENVIRONMENT`.
///
/// Unset or unrecognised values resolve to [`Environment::Development`].
pub fn get_env() -> Environment {
    env::var(ENVIRONMENT_VAR)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

/// Check if running in the development environment.
pub fn is_dev() -> bool {
    get_env() == Environment::Development
}

/// Check if running in the production environment.
pub fn is_prod() -> bool {
    get_env() == Environment::Production
}

/// Check if running in the staging environment.
pub fn is_staging() -> bool {
    get_env() == Environment::Staging
}

/// Check if running in the test environment.
pub fn is_test() -> bool {
    get_env() == Environment::Test
}

/// Get a required environment variable, falling back to `default`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingVar`] if the variable is unset and no default is given.
pub fn require_env(key: &str, default: Option<&str>) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => default
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingVar(key.to_string())),
    }
}

/// Get a boolean environment variable.
///
/// `true`, `1`, `yes`, and `on` (any case) are true; any other set value is false.
pub fn get_bool_env(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => is_truthy(&value),
        Err(_) => default,
    }
}

pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Get an integer environment variable. Unparseable values yield `default`.
pub fn get_int_env(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Get a list environment variable split on `separator`.
///
/// Items are trimmed and empty items dropped. Unset variables yield `default`.
pub fn get_list_env(key: &str, separator: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(value) => split_list(&value, separator),
        Err(_) => default.iter().map(|item| item.to_string()).collect(),
    }
}

pub(crate) fn split_list(value: &str, separator: &str) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
