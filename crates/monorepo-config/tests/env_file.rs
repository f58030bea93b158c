//! Integration tests for `.env` file loading

use monorepo_config::{Settings, load_env, load_env_from_dir};
use std::fs;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_explicit_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "custom.env", "MONOREPO_ENVFILE_A=from-file\n");

    temp_env::with_var_unset("MONOREPO_ENVFILE_A", || {
        assert!(load_env(Some(&path), false).unwrap());
        assert_eq!(std::env::var("MONOREPO_ENVFILE_A").unwrap(), "from-file");
    });
}

#[test]
fn test_missing_file_returns_false() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.env");
    assert!(!load_env(Some(&path), false).unwrap());
    assert!(!load_env_from_dir(dir.path(), false).unwrap());
}

#[test]
fn test_existing_vars_are_kept_without_override() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, ".env", "MONOREPO_ENVFILE_B=from-file\n");

    temp_env::with_var("MONOREPO_ENVFILE_B", Some("from-process"), || {
        load_env(Some(&path), false).unwrap();
        assert_eq!(std::env::var("MONOREPO_ENVFILE_B").unwrap(), "from-process");

        load_env(Some(&path), true).unwrap();
        assert_eq!(std::env::var("MONOREPO_ENVFILE_B").unwrap(), "from-file");
    });
}

#[test]
fn test_local_file_takes_precedence() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, ".env", "MONOREPO_ENVFILE_C=plain\n");
    write_file(&dir, ".env.local", "MONOREPO_ENVFILE_C=local\n");

    temp_env::with_var_unset("MONOREPO_ENVFILE_C", || {
        assert!(load_env_from_dir(dir.path(), false).unwrap());
        assert_eq!(std::env::var("MONOREPO_ENVFILE_C").unwrap(), "local");
    });
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.env", "THIS IS NOT VALID\n");
    assert!(load_env(Some(&path), false).is_err());
}

#[test]
fn test_settings_from_env_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, ".env", "APP_NAME=From File\nPORT=8123\n");

    temp_env::with_vars_unset(["APP_NAME", "PORT"], || {
        load_env(Some(&path), false).unwrap();
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.app_name, "From File");
        assert_eq!(settings.port, 8123);
    });
}

#[test]
fn test_settings_read_only_the_plain_env_file() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, ".env", "APP_NAME=Plain\n");
    write_file(&dir, ".env.local", "APP_NAME=Local\nPORT=9999\n");

    temp_env::with_vars_unset(["APP_NAME", "PORT"], || {
        let settings = Settings::load_from_dir(dir.path()).unwrap();
        assert_eq!(settings.app_name, "Plain");
        assert_eq!(settings.port, 8000);
    });
}

#[test]
fn test_settings_without_env_file_use_defaults() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, ".env.local", "APP_NAME=Local\n");

    temp_env::with_var_unset("APP_NAME", || {
        let settings = Settings::load_from_dir(dir.path()).unwrap();
        assert_eq!(settings.app_name, "Monorepo App");
    });
}
