//! # warden-log
//!
//! `tracing-subscriber` setup shared by the warden crates. Library code only
//! emits events through the re-exported macros; binaries pick a
//! configuration and install it once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warden_log::prelude::*;
//!
//! fn main() -> LogResult<()> {
//!     let _guard = warden_log::auto_init()?;
//!     info!(capacity = 8, "stack ready");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment
//!
//! - `WARDEN_LOG` / `RUST_LOG`: filter directives
//! - `WARDEN_LOG_FORMAT`: `pretty`, `compact` or `json`
//! - `WARDEN_LOG_TIME`, `WARDEN_LOG_SOURCE`, `WARDEN_LOG_COLORS`: display toggles

#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod error;

// Public API
pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, WriterConfig};
pub use error::{LogError, LogResult};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Config, Format, LogResult, auto_init, debug, error, info, init, init_with, trace, warn,
    };
}

// Re-export tracing macros
pub use tracing::{Level, debug, error, info, span, trace, warn};

/// Pick a configuration from the environment and build type, then install it
///
/// Filter variables in the environment win; otherwise debug builds get
/// [`Config::development`] and release builds [`Config::production`].
/// Returns a no-op guard when a global subscriber is already set.
pub fn auto_init() -> LogResult<LoggerGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }

    if std::env::var("WARDEN_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
