//! Configuration types and presets
//!
//! - `base`: `Config` and `Format`
//! - `writer`: writer and display configuration
//! - `presets`: development, production and environment-driven setups

mod base;
mod presets;
mod writer;

pub use base::{Config, Format};
pub use writer::{DisplayConfig, WriterConfig};
