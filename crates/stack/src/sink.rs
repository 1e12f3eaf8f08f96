//! Diagnostic output destinations for stack dumps

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identities 1 and 2 are reserved for the standard streams.
static NEXT_WRITER_ID: AtomicU64 = AtomicU64::new(3);

/// Where [`GuardedStack::dump`](crate::GuardedStack::dump) writes when no
/// explicit sink is passed.
#[derive(Default)]
pub enum DiagnosticSink {
    /// Process standard error
    #[default]
    Stderr,
    /// Process standard output
    Stdout,
    /// Caller-supplied writer
    Writer {
        /// Process-unique identity, folded into the stack digest
        id: u64,
        /// Destination for dump output
        inner: Box<dyn Write>,
    },
}

impl DiagnosticSink {
    /// Wrap an arbitrary writer, assigning it a fresh identity.
    pub fn writer(inner: impl Write + 'static) -> Self {
        Self::Writer {
            id: NEXT_WRITER_ID.fetch_add(1, Ordering::Relaxed),
            inner: Box::new(inner),
        }
    }

    /// Stable identity of this destination.
    pub fn identity(&self) -> u64 {
        match self {
            Self::Stderr => 1,
            Self::Stdout => 2,
            Self::Writer { id, .. } => *id,
        }
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stderr => f.write_str("Stderr"),
            Self::Stdout => f.write_str("Stdout"),
            Self::Writer { id, .. } => f.debug_struct("Writer").field("id", id).finish_non_exhaustive(),
        }
    }
}

impl Write for DiagnosticSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stderr => io::stderr().lock().write(buf),
            Self::Stdout => io::stdout().lock().write(buf),
            Self::Writer { inner, .. } => inner.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stderr => io::stderr().lock().flush(),
            Self::Stdout => io::stdout().lock().flush(),
            Self::Writer { inner, .. } => inner.flush(),
        }
    }
}
