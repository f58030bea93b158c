#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Configuration and environment utilities for the monorepo.
//!
//! - **`.env` loading** via [`load_env`]
//! - **Typed environment accessors** such as [`get_bool_env`] and [`get_list_env`]
//! - **Environment detection** with [`get_env`], [`is_dev`], [`is_prod`], ...
//! - **Validated application settings** via [`Settings`] and the process-wide [`get_settings`]
//! - **Tracing setup** from settings with `init_tracing` (requires the `trace` feature)
//!
//! # Examples
//!
//! ```no_run
//! use monorepo_config::{get_settings, is_prod};
//!
//! # fn main() -> monorepo_config::Result<()> {
//! let settings = get_settings()?;
//! if is_prod() {
//!     assert!(!settings.debug);
//! }
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod error;
#[cfg(feature = "trace")]
pub mod logging;
pub mod settings;

pub use env::{
    get_bool_env, get_env, get_int_env, get_list_env, is_dev, is_prod, is_staging, is_test,
    load_env, load_env_from_dir, require_env,
};
pub use error::{ConfigError, Result};
#[cfg(feature = "trace")]
pub use logging::init_tracing;
pub use settings::{Settings, get_settings};
