#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Shared types for the monorepo.
//!
//! Every other crate in the workspace builds on these:
//!
//! - [`AppError`] and [`ErrorCode`] - the common error shape returned across service boundaries
//! - [`constants`] - environment and log level enums, HTTP status codes, defaults, and
//!   validation patterns
//! - [`pagination`] - [`PaginationParams`] and the [`Paginated`] response wrapper
//!
//! # Examples
//!
//! ```rust
//! use monorepo_shared::{AppError, Paginated, PaginationParams};
//!
//! let params = PaginationParams::new(2, 10).unwrap();
//! let page = Paginated::create(vec!["a", "b"], 25, &params);
//! assert_eq!(page.total_pages, 3);
//! assert!(page.has_next());
//!
//! let err = AppError::not_found("User", Some("42"));
//! assert_eq!(err.to_string(), "[NOT_FOUND] User with id '42' not found");
//! ```

pub mod constants;
pub mod error;
pub mod pagination;

pub use constants::{Environment, HttpStatus, LogLevel, Pattern};
pub use error::{AppError, ErrorCode, Result};
pub use pagination::{Paginated, PaginationParams, SortOrder};
