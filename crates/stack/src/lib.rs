//! # warden-stack
//!
//! A self-checking dynamic-array stack. Guard values around the handle
//! metadata and around the element array, plus a running digest over both,
//! turn buffer overruns, stray writes and use-after-free into a typed
//! [`StackError`] on the next operation instead of silent state corruption.
//!
//! ## Quick Start
//!
//! ```rust
//! use warden_stack::prelude::*;
//!
//! fn main() -> StackResult<()> {
//!     let mut stack = GuardedStack::with_capacity(0)?;
//!     for value in 0..33 {
//!         stack.push(value)?;
//!     }
//!     assert_eq!(stack.pop()?, 32);
//!     stack.dump_to(&mut std::io::sink())?;
//!     stack.free()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `logging` (default): `tracing` events through `warden-log`
//! - `serde`: serialize [`StackConfig`] and [`StackStats`]
//! - `test-util`: the `Tamper` backdoor for corrupting a stack on purpose
//!
//! ## Architecture
//!
//! - [`layout`]: the single guarded buffer and the guard/poison constants
//! - `integrity`: guard checks and the digest
//! - `capacity`: grow, shrink, reallocate
//! - [`handle`]: free functions taking optional handles

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rust_2018_idioms)]

// Error types
pub mod error;

// Core modules
pub mod config;
pub mod handle;
pub mod layout;
pub mod sink;
pub mod stats;

mod capacity;
mod dump;
mod integrity;
mod stack;

#[cfg(feature = "test-util")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
mod tamper;

pub use crate::config::{MIN_CAPACITY, StackConfig};
pub use crate::error::{IntegrityFault, StackError, StackResult};
pub use crate::layout::{Element, POISON};
pub use crate::sink::DiagnosticSink;
pub use crate::stack::GuardedStack;
pub use crate::stats::StackStats;
#[cfg(feature = "test-util")]
pub use crate::tamper::Tamper;

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::config::{MIN_CAPACITY, StackConfig};
    pub use crate::error::{IntegrityFault, StackError, StackResult};
    pub use crate::layout::Element;
    pub use crate::sink::DiagnosticSink;
    pub use crate::stack::GuardedStack;
}
