//! Writer and display configuration

use serde::{Deserialize, Serialize};

/// Writer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum WriterConfig {
    /// Write to stderr
    #[default]
    Stderr,
    /// Write to stdout
    Stdout,
}

/// Display configuration
///
/// Independent toggles; each maps onto one `tracing-subscriber` fmt option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show timestamps
    pub time: bool,
    /// Show source location (`file:line`)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Show thread IDs
    pub thread_ids: bool,
    /// Use ANSI colors
    pub colors: bool,
    /// Flatten JSON events
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time: true,
            source: false,
            target: true,
            thread_ids: false,
            colors: false,
            flatten: false,
        }
    }
}

impl DisplayConfig {
    /// Override toggles from `WARDEN_LOG_TIME`, `WARDEN_LOG_SOURCE` and
    /// `WARDEN_LOG_COLORS`.
    pub fn parse_env(&mut self) {
        if let Some(time) = env_flag("WARDEN_LOG_TIME") {
            self.time = time;
        }
        if let Some(source) = env_flag("WARDEN_LOG_SOURCE") {
            self.source = source;
        }
        if let Some(colors) = env_flag("WARDEN_LOG_COLORS") {
            self.colors = colors;
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
