//! The guarded stack handle: lifecycle and operation surface
//!
//! # Memory Layout
//!
//! ```text
//! GuardedStack
//! [front struct guard][sink][buffer][len][capacity][generation][initialized][digest]...[back struct guard]
//!                              |
//!                              v
//!                     [front data guard][elem 0]..[elem cap-1][back data guard]
//! ```
//!
//! ## Invariants
//!
//! While `initialized` is true and nothing has been overwritten:
//! - `len ≤ capacity` and `capacity ≥ MIN_CAPACITY`
//! - all four guards hold their constants
//! - the stored digest matches a fresh recomputation
//! - slots in `[len, capacity)` hold [`POISON`]
//!
//! ## State Machine
//!
//! `Uninitialized --init--> Initialized --free--> Freed --init--> Initialized`
//!
//! Detected corruption is sticky: the stack is never re-stamped after a failed
//! check, so every later call reports `Corrupted` again.

use core::fmt;

use crate::config::{MIN_CAPACITY, StackConfig};
use crate::error::{StackError, StackResult};
use crate::layout::{
    Canary, Element, GuardedBuffer, POISON, STRUCT_GUARD_BACK, STRUCT_GUARD_FRONT,
};
use crate::sink::DiagnosticSink;
use crate::stats::StackStats;

#[cfg(feature = "logging")]
use warden_log::{debug, trace};

/// Structural guard values written by `free`.
pub(crate) const FREED_FRONT_GUARD: Canary = 0xABCD;
pub(crate) const FREED_BACK_GUARD: Canary = 0xFFEC;
/// Metadata values written by `free`; neither can occur in a live stack
/// built from the same state.
pub(crate) const FREED_CAPACITY: usize = 0xDEDD;
pub(crate) const FREED_LEN: usize = 0xAAAF;

/// Self-checking LIFO stack of [`Element`]s
///
/// Every operation first verifies the guards and digest, then acts, then
/// re-stamps the digest. Overwrites of the handle or its buffer are reported
/// as [`StackError::Corrupted`] on the next call instead of silently
/// corrupting program state.
///
/// # Examples
///
/// ```rust
/// use warden_stack::GuardedStack;
///
/// # fn main() -> warden_stack::StackResult<()> {
/// let mut stack = GuardedStack::with_capacity(0)?;
/// stack.push(7)?;
/// assert_eq!(stack.peek()?, 7);
/// assert_eq!(stack.pop()?, 7);
/// stack.free()?;
/// # Ok(())
/// # }
/// ```
#[repr(C)]
pub struct GuardedStack {
    pub(crate) front_guard: Canary,
    pub(crate) sink: Option<DiagnosticSink>,
    pub(crate) buffer: GuardedBuffer,
    pub(crate) len: usize,
    pub(crate) capacity: usize,
    pub(crate) generation: u64,
    pub(crate) initialized: bool,
    pub(crate) digest: u64,
    pub(crate) config: StackConfig,
    pub(crate) stats: StackStats,
    pub(crate) back_guard: Canary,
}

impl GuardedStack {
    /// Creates an uninitialized handle with default configuration.
    ///
    /// Every operation except [`init`](Self::init) returns `NotInitialized`
    /// until it is initialized.
    pub fn new() -> Self {
        Self::uninitialized(StackConfig::default())
    }

    /// Creates and initializes a stack writing dumps to standard error.
    pub fn with_capacity(capacity_hint: usize) -> StackResult<Self> {
        Self::with_config(capacity_hint, None, StackConfig::default())
    }

    /// Creates and initializes a stack with custom configuration.
    pub fn with_config(
        capacity_hint: usize,
        sink: Option<DiagnosticSink>,
        config: StackConfig,
    ) -> StackResult<Self> {
        let mut stack = Self::uninitialized(config);
        stack.init(capacity_hint, sink)?;
        Ok(stack)
    }

    fn uninitialized(config: StackConfig) -> Self {
        Self {
            front_guard: 0,
            sink: None,
            buffer: GuardedBuffer::default(),
            len: 0,
            capacity: 0,
            generation: 0,
            initialized: false,
            digest: 0,
            config,
            stats: StackStats::default(),
            back_guard: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Allocates storage and brings the handle into the initialized state.
    ///
    /// `capacity_hint` is clamped up to [`MIN_CAPACITY`]; `sink` defaults to
    /// standard error. Calling `init` on an initialized handle is a no-op
    /// that succeeds and keeps the existing contents. A freed handle may be
    /// initialized again.
    pub fn init(&mut self, capacity_hint: usize, sink: Option<DiagnosticSink>) -> StackResult<()> {
        if self.initialized {
            return Ok(());
        }

        self.config.validate()?;

        let capacity = capacity_hint.max(MIN_CAPACITY);
        if capacity > self.config.max_capacity {
            return Err(StackError::allocation_failure(capacity));
        }
        let buffer = GuardedBuffer::allocate(capacity)?;

        self.buffer = buffer;
        self.capacity = capacity;
        self.len = 0;
        self.generation = 0;
        self.stats = StackStats::default();
        self.front_guard = STRUCT_GUARD_FRONT;
        self.back_guard = STRUCT_GUARD_BACK;
        self.sink = Some(sink.unwrap_or_default());
        self.initialized = true;
        self.stamp();

        #[cfg(feature = "logging")]
        debug!(capacity, requested = capacity_hint, "stack initialized");

        Ok(())
    }

    /// Poisons every slot, releases the buffer and scrubs the metadata.
    ///
    /// After `free` the handle reports `NotInitialized` for every operation
    /// except `init`; a second `free` is rejected the same way.
    pub fn free(&mut self) -> StackResult<()> {
        self.ensure_initialized()?;

        self.buffer.poison_all();
        self.buffer.release();

        self.front_guard = FREED_FRONT_GUARD;
        self.back_guard = FREED_BACK_GUARD;
        self.sink = None;
        self.capacity = FREED_CAPACITY;
        self.len = FREED_LEN;
        self.digest = 0;
        self.initialized = false;

        #[cfg(feature = "logging")]
        debug!(generation = self.generation, "stack freed");

        Ok(())
    }

    /// True between a successful `init` and the next `free`.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Pushes `value`, doubling the capacity first when the stack is full.
    pub fn push(&mut self, value: Element) -> StackResult<()> {
        self.ensure_intact()?;
        self.grow_if_full()?;

        let index = self.len;
        self.buffer.elements_mut()[index] = value;
        self.len += 1;
        self.stamp();

        #[cfg(feature = "logging")]
        trace!(value, len = self.len, "push");

        Ok(())
    }

    /// Removes and returns the top element.
    ///
    /// With `poison_on_pop` enabled the vacated slot is re-poisoned, so a
    /// stale read of it is recognisable in a dump.
    pub fn pop(&mut self) -> StackResult<Element> {
        self.ensure_intact()?;
        if self.len == 0 {
            return Err(StackError::Empty);
        }

        self.len -= 1;
        let index = self.len;
        let value = self.buffer.elements()[index];
        if self.config.poison_on_pop {
            self.buffer.elements_mut()[index] = POISON;
        }
        self.stamp();

        #[cfg(feature = "logging")]
        trace!(value, len = self.len, "pop");

        Ok(value)
    }

    /// Returns the top element without removing it.
    pub fn peek(&self) -> StackResult<Element> {
        self.ensure_intact()?;
        match self.len.checked_sub(1) {
            Some(top) => Ok(self.buffer.elements()[top]),
            None => Err(StackError::Empty),
        }
    }

    /// Number of live elements.
    ///
    /// Pure query; a freed handle reports its scrubbed sentinel.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Number of allocated element slots.
    ///
    /// Pure query; a freed handle reports its scrubbed sentinel.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when the stack holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Active configuration.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Reallocation history.
    pub fn stats(&self) -> StackStats {
        StackStats {
            generation: self.generation,
            ..self.stats
        }
    }
}

impl Default for GuardedStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GuardedStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedStack")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("initialized", &self.initialized)
            .field("generation", &self.generation)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}
