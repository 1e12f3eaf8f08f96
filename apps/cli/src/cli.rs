//! Command-line interface definitions for warden.

use clap::Parser;

/// Push a run of integers through a guarded stack, pop them back and dump it.
#[derive(Debug, Parser)]
#[command(name = "warden", version, about)]
pub struct Cli {
    /// Initial capacity hint (values below 8 are raised to 8).
    #[arg(long, short = 'c', default_value_t = 0)]
    pub capacity: usize,

    /// How many values to push and then pop.
    #[arg(long, short = 'n', default_value_t = 33)]
    pub count: u64,

    /// Trace every stack operation and include addresses and guards in the dump.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log output format: pretty, compact or json.
    #[arg(long, env = "WARDEN_LOG_FORMAT", default_value = "compact")]
    pub log_format: warden_log::Format,

    /// Damage the stack after the pushes to show the next pop failing.
    #[cfg(feature = "tamper")]
    #[arg(long, value_enum)]
    pub tamper: Option<TamperTarget>,
}

/// Memory the `--tamper` flag overwrites.
#[cfg(feature = "tamper")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TamperTarget {
    /// Structural guard ahead of the handle metadata.
    FrontGuard,
    /// Structural guard after the handle metadata.
    BackGuard,
    /// Guard word after the element array.
    DataGuard,
    /// The element count.
    Length,
}
