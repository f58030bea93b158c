//! Common constants and enums for the monorepo.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default timeout for outbound calls, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default total number of attempts for retried operations.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Application environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (the default)
    #[default]
    Development,
    /// Pre-production
    Staging,
    /// Production
    Production,
    /// Automated tests
    Test,
}

impl Environment {
    /// Lowercase name of the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    /// Parses case-insensitively. Surrounding whitespace is not stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Log level option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Verbose diagnostics
    Debug,
    /// Normal operation (the default)
    #[default]
    Info,
    /// Something unexpected but recoverable
    Warning,
    /// An operation failed
    Error,
    /// The process cannot continue
    Critical,
}

impl LogLevel {
    /// Uppercase name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parses case-insensitively. `WARN` is accepted as an alias for `WARNING`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Common HTTP statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpStatus {
    /// 200
    Ok,
    /// 201
    Created,
    /// 204
    NoContent,
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 422
    UnprocessableEntity,
    /// 500
    InternalServerError,
    /// 503
    ServiceUnavailable,
}

impl HttpStatus {
    /// Numeric status code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::UnprocessableEntity => 422,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
        }
    }

    /// Whether this is a 4xx or 5xx status.
    pub fn is_error(&self) -> bool {
        self.code() >= 400
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Failed to compile email regex")
});

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("Failed to compile uuid regex")
});

static SLUG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Failed to compile slug regex")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("Failed to compile phone regex"));

/// Common validation patterns.
///
/// # Examples
///
/// ```rust
/// use monorepo_shared::Pattern;
///
/// assert!(Pattern::Email.matches("test@example.com"));
/// assert!(Pattern::Slug.matches("hello-world"));
/// assert!(!Pattern::Slug.matches("-hello"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Email address
    Email,
    /// Lowercase hyphenated UUID
    Uuid,
    /// URL slug: lowercase alphanumerics separated by single hyphens
    Slug,
    /// E.164 phone number
    Phone,
}

impl Pattern {
    /// The compiled regex for this pattern.
    pub fn regex(&self) -> &'static Regex {
        match self {
            Self::Email => &EMAIL_PATTERN,
            Self::Uuid => &UUID_PATTERN,
            Self::Slug => &SLUG_PATTERN,
            Self::Phone => &PHONE_PATTERN,
        }
    }

    /// Whether `value` matches this pattern in full.
    pub fn matches(&self, value: &str) -> bool {
        self.regex().is_match(value)
    }
}
