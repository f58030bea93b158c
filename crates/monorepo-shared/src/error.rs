//! Error types shared across the monorepo
//!
//! [`AppError`] carries a machine-readable [`ErrorCode`], a human-readable message, and a bag of
//! structured details. It serializes to the `{"error": {...}}` envelope used by API responses.

use crate::constants::HttpStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use thiserror::Error;

/// Result type alias for operations that fail with an [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

/// Machine-readable error code.
///
/// Serializes to the upper snake case form (`NOT_FOUND`, `VALIDATION_ERROR`, ...). Codes that are
/// not one of the well-known variants round-trip through [`ErrorCode::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// Unclassified failure (`INTERNAL_ERROR`).
    Internal,
    /// Resource lookup failed (`NOT_FOUND`).
    NotFound,
    /// Input failed validation (`VALIDATION_ERROR`).
    Validation,
    /// Caller is not authenticated (`AUTHENTICATION_ERROR`).
    Authentication,
    /// Caller lacks a permission (`AUTHORIZATION_ERROR`).
    Authorization,
    /// Resource already exists (`CONFLICT`).
    Conflict,
    /// Any other application-defined code.
    Custom(String),
}

impl ErrorCode {
    /// The wire form of this code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Internal => "INTERNAL_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::Authorization => "AUTHORIZATION_ERROR",
            Self::Conflict => "CONFLICT",
            Self::Custom(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "INTERNAL_ERROR" => Self::Internal,
            "NOT_FOUND" => Self::NotFound,
            "VALIDATION_ERROR" => Self::Validation,
            "AUTHENTICATION_ERROR" => Self::Authentication,
            "AUTHORIZATION_ERROR" => Self::Authorization,
            "CONFLICT" => Self::Conflict,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}

/// Base error for all application errors.
///
/// Displays as `[CODE] message`.
///
/// # Examples
///
/// ```rust
/// use monorepo_shared::{AppError, ErrorCode};
///
/// let err = AppError::new("Something went wrong");
/// assert_eq!(err.code, ErrorCode::Internal);
/// assert_eq!(err.to_string(), "[INTERNAL_ERROR] Something went wrong");
///
/// let err = AppError::validation("Invalid email", Some("email"));
/// assert_eq!(err.details["field"], "email");
/// ```
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct AppError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional structured details
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl AppError {
    /// Create an error with the `INTERNAL_ERROR` code and no details.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: message.into(),
            details: Map::new(),
        }
    }

    /// Replace the error code.
    pub fn with_code(mut self, code: impl Into<ErrorCode>) -> Self {
        self.code = code.into();
        self
    }

    /// Merge additional details into the error. Later keys win.
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details.extend(details);
        self
    }

    /// Add a single detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// A resource was not found.
    ///
    /// The message names the identifier when one is given.
    pub fn not_found(resource: &str, identifier: Option<&str>) -> Self {
        let message = match identifier {
            Some(id) if !id.is_empty() => format!("{resource} with id '{id}' not found"),
            _ => format!("{resource} not found"),
        };
        Self::new(message)
            .with_code(ErrorCode::NotFound)
            .with_detail("resource", resource)
            .with_detail("identifier", identifier)
    }

    /// Validation failed, optionally for a specific field.
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::new(message)
            .with_code(ErrorCode::Validation)
            .with_detail("field", field)
    }

    /// Authentication is required or failed.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(message).with_code(ErrorCode::Authentication)
    }

    /// The caller is authenticated but not allowed to do this.
    pub fn authorization(message: impl Into<String>, required_permission: Option<&str>) -> Self {
        Self::new(message)
            .with_code(ErrorCode::Authorization)
            .with_detail("required_permission", required_permission)
    }

    /// A resource with the same identity already exists.
    pub fn conflict(resource: &str, message: Option<&str>) -> Self {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("{resource} already exists"));
        Self::new(message)
            .with_code(ErrorCode::Conflict)
            .with_detail("resource", resource)
    }

    /// HTTP status conventionally used to report this error.
    pub fn status(&self) -> HttpStatus {
        match self.code {
            ErrorCode::NotFound => HttpStatus::NotFound,
            ErrorCode::Validation => HttpStatus::UnprocessableEntity,
            ErrorCode::Authentication => HttpStatus::Unauthorized,
            ErrorCode::Authorization => HttpStatus::Forbidden,
            ErrorCode::Conflict => HttpStatus::Conflict,
            ErrorCode::Internal | ErrorCode::Custom(_) => HttpStatus::InternalServerError,
        }
    }

    /// Serialize into the response envelope:
    /// `{"error": {"code": ..., "message": ..., "details": {...}}}`.
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "details": self.details,
            }
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Serialization error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let error = AppError::new("Something went wrong");
        assert_eq!(error.message, "Something went wrong");
        assert_eq!(error.code, ErrorCode::Internal);
        assert!(error.details.is_empty());
    }

    #[test]
    fn test_custom_code() {
        let error = AppError::new("Error").with_code("CUSTOM_ERROR");
        assert_eq!(error.code, ErrorCode::Custom("CUSTOM_ERROR".to_string()));
        assert_eq!(error.to_string(), "[CUSTOM_ERROR] Error");
    }

    #[test]
    fn test_well_known_code_from_str() {
        let error = AppError::new("Error").with_code("NOT_FOUND");
        assert_eq!(error.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_to_json_structure() {
        let mut details = Map::new();
        details.insert("key".to_string(), json!("value"));
        let error = AppError::new("Error").with_code("TEST").with_details(details);

        assert_eq!(
            error.to_json(),
            json!({
                "error": {
                    "code": "TEST",
                    "message": "Error",
                    "details": {"key": "value"},
                }
            })
        );
    }

    #[test]
    fn test_display() {
        let error = AppError::new("Something went wrong").with_code("TEST_ERROR");
        assert_eq!(error.to_string(), "[TEST_ERROR] Something went wrong");
    }

    #[test]
    fn test_not_found_without_identifier() {
        let error = AppError::not_found("User", None);
        assert_eq!(error.message, "User not found");
        assert_eq!(error.code, ErrorCode::NotFound);
        assert_eq!(error.details["identifier"], Value::Null);
    }

    #[test]
    fn test_not_found_with_identifier() {
        let error = AppError::not_found("User", Some("123"));
        assert_eq!(error.message, "User with id '123' not found");
        assert_eq!(error.details["resource"], "User");
        assert_eq!(error.details["identifier"], "123");
    }

    #[test]
    fn test_conflict_default_message() {
        let error = AppError::conflict("Email", None);
        assert_eq!(error.message, "Email already exists");
        assert_eq!(error.status(), HttpStatus::Conflict);

        let error = AppError::conflict("Email", Some("taken"));
        assert_eq!(error.message, "taken");
    }

    #[test]
    fn test_authorization_details() {
        let error = AppError::authorization("Access denied", Some("admin:write"));
        assert_eq!(error.code, ErrorCode::Authorization);
        assert_eq!(error.details["required_permission"], "admin:write");
        assert_eq!(error.status().code(), 403);
    }

    #[test]
    fn test_serde_round_trip_preserves_custom_code() {
        let error = AppError::validation("bad", Some("name")).with_code("RATE_LIMITED");
        let encoded = serde_json::to_string(&error).unwrap();
        let decoded: AppError = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, error);
    }
}
