//! Free-function surface over optional handles
//!
//! Mirrors a pointer-style API: every function takes the stack as an
//! `Option` and reports a missing one as [`StackError::BadHandle`] instead of
//! failing in some less predictable way. Callers that always hold a
//! [`GuardedStack`] can use its methods directly.
//!
//! ```rust
//! use warden_stack::{GuardedStack, StackError, handle};
//!
//! let mut stack = GuardedStack::new();
//! handle::init(Some(&mut stack), 0, None).unwrap();
//! handle::push(Some(&mut stack), 1).unwrap();
//! assert_eq!(handle::pop(Some(&mut stack)), Ok(1));
//! assert!(matches!(handle::pop(None), Err(StackError::BadHandle { .. })));
//! ```

use std::io::Write;

use crate::error::{StackError, StackResult};
use crate::layout::Element;
use crate::sink::DiagnosticSink;
use crate::stack::GuardedStack;

fn resolve<T>(stack: Option<T>) -> StackResult<T> {
    stack.ok_or_else(|| StackError::bad_handle("null stack handle"))
}

/// Initialize the stack in `slot`; see [`GuardedStack::init`].
pub fn init(
    slot: Option<&mut GuardedStack>,
    capacity_hint: usize,
    sink: Option<DiagnosticSink>,
) -> StackResult<()> {
    resolve(slot)?.init(capacity_hint, sink)
}

/// See [`GuardedStack::free`].
pub fn free(stack: Option<&mut GuardedStack>) -> StackResult<()> {
    resolve(stack)?.free()
}

/// See [`GuardedStack::push`].
pub fn push(stack: Option<&mut GuardedStack>, value: Element) -> StackResult<()> {
    resolve(stack)?.push(value)
}

/// See [`GuardedStack::pop`].
pub fn pop(stack: Option<&mut GuardedStack>) -> StackResult<Element> {
    resolve(stack)?.pop()
}

/// See [`GuardedStack::peek`].
pub fn peek(stack: Option<&GuardedStack>) -> StackResult<Element> {
    resolve(stack)?.peek()
}

/// Element count; a missing handle reads as zero.
pub fn size(stack: Option<&GuardedStack>) -> usize {
    stack.map_or(0, GuardedStack::size)
}

/// Slot count; a missing handle reads as zero.
pub fn capacity(stack: Option<&GuardedStack>) -> usize {
    stack.map_or(0, GuardedStack::capacity)
}

/// See [`GuardedStack::grow`].
pub fn grow(stack: Option<&mut GuardedStack>) -> StackResult<()> {
    resolve(stack)?.grow()
}

/// See [`GuardedStack::shrink`].
pub fn shrink(stack: Option<&mut GuardedStack>) -> StackResult<()> {
    resolve(stack)?.shrink()
}

/// See [`GuardedStack::reallocate`].
pub fn reallocate(stack: Option<&mut GuardedStack>, new_capacity: usize) -> StackResult<()> {
    resolve(stack)?.reallocate(new_capacity)
}

/// Dump to `sink`, or to the handle's default sink when `sink` is `None`.
pub fn dump(stack: Option<&mut GuardedStack>, sink: Option<&mut dyn Write>) -> StackResult<()> {
    let stack = resolve(stack)?;
    match sink {
        Some(out) => stack.dump_to(out),
        None => stack.dump(),
    }
}
