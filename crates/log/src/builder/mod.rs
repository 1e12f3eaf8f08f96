//! Logger builder implementation
//!
//! `format` holds the layer-creation macros shared by the three output styles.

#[macro_use]
mod format;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{Config, Format, WriterConfig};
use crate::error::{LogError, LogResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    config: Config,
}

/// Returned by the init functions
///
/// Nothing is torn down on drop; the guard records whether this call
/// installed the global subscriber or found one already in place.
#[derive(Debug)]
#[must_use = "hold the guard for the lifetime of the program"]
pub struct LoggerGuard {
    installed: bool,
}

impl LoggerGuard {
    /// Guard for a call that installed nothing.
    pub fn noop() -> Self {
        Self { installed: false }
    }

    /// Whether this guard's call installed the global subscriber.
    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// The configuration this builder will apply.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Assemble the subscriber without installing it.
    ///
    /// Useful with `tracing::subscriber::with_default` for scoped logging.
    pub fn subscriber(&self) -> LogResult<impl tracing::Subscriber + Send + Sync + 'static> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::filter(&self.config.level, e))?;

        Ok(Registry::default().with(self.fmt_layer()).with(filter))
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Filter string cannot be parsed
    /// - A global subscriber is already set
    pub fn build(self) -> LogResult<LoggerGuard> {
        self.subscriber()?
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        Ok(LoggerGuard { installed: true })
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let display = &self.config.display;
        let writer = make_writer(self.config.writer);
        match self.config.format {
            Format::Pretty => create_fmt_layer!(pretty, display, writer),
            Format::Compact => create_fmt_layer!(compact, display, writer),
            Format::Json => create_json_layer!(display, writer),
        }
    }
}

fn make_writer(config: WriterConfig) -> BoxMakeWriter {
    match config {
        WriterConfig::Stderr => BoxMakeWriter::new(std::io::stderr),
        WriterConfig::Stdout => BoxMakeWriter::new(std::io::stdout),
    }
}
