//! Integration tests for the stack lifecycle and LIFO behaviour

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use warden_stack::{
    DiagnosticSink, GuardedStack, MIN_CAPACITY, StackConfig, StackError, handle,
};

#[test]
fn test_thirty_three_round_trip() {
    let mut stack = GuardedStack::with_capacity(0).expect("init failed");
    assert_eq!(stack.capacity(), MIN_CAPACITY);

    for value in 0..=32 {
        stack.push(value).expect("push failed");
    }
    assert_eq!(stack.size(), 33);
    assert_eq!(stack.capacity(), 64);

    for expected in (0..=32).rev() {
        assert_eq!(stack.pop(), Ok(expected));
    }
    assert_eq!(stack.size(), 0);
    assert_eq!(stack.pop(), Err(StackError::Empty));

    let mut report = Vec::new();
    stack.dump_to(&mut report).expect("dump failed");
    let report = String::from_utf8(report).unwrap();
    let slot_lines = report
        .lines()
        .filter(|line| line.len() > 10 && line.as_bytes()[8..10] == *b"  ")
        .count();
    assert_eq!(slot_lines, 64);

    stack.free().expect("free failed");
}

#[test]
fn test_push_then_peek_and_pop() {
    let mut stack = GuardedStack::with_capacity(8).expect("init failed");
    stack.push(7).unwrap();
    stack.push(9).unwrap();

    assert_eq!(stack.peek(), Ok(9));
    assert_eq!(stack.size(), 2);
    assert_eq!(stack.pop(), Ok(9));
    assert_eq!(stack.pop(), Ok(7));
    assert!(stack.is_empty());
}

#[test]
fn test_capacity_hint_clamped() {
    for hint in [0, 1, 7] {
        let stack = GuardedStack::with_capacity(hint).unwrap();
        assert_eq!(stack.capacity(), MIN_CAPACITY, "hint {hint}");
    }
    assert_eq!(GuardedStack::with_capacity(100).unwrap().capacity(), 100);
}

#[test]
fn test_operations_after_free() {
    let mut stack = GuardedStack::with_capacity(8).unwrap();
    stack.push(1).unwrap();
    stack.free().unwrap();

    assert_eq!(stack.push(2), Err(StackError::NotInitialized));
    assert_eq!(stack.pop(), Err(StackError::NotInitialized));
    assert_eq!(stack.peek(), Err(StackError::NotInitialized));
    assert_eq!(stack.dump(), Err(StackError::NotInitialized));
    assert_eq!(stack.free(), Err(StackError::NotInitialized));
    assert!(!stack.is_initialized());
}

#[test]
fn test_freed_handle_can_be_reinitialized() {
    let mut stack = GuardedStack::with_capacity(8).unwrap();
    stack.push(1).unwrap();
    stack.free().unwrap();

    stack.init(16, None).unwrap();
    assert_eq!(stack.capacity(), 16);
    assert!(stack.is_empty());
    stack.push(5).unwrap();
    assert_eq!(stack.pop(), Ok(5));
}

#[test]
fn test_uninitialized_handle() {
    let mut stack = GuardedStack::new();
    assert_eq!(stack.push(1), Err(StackError::NotInitialized));
    assert_eq!(stack.verify_integrity(), Err(StackError::NotInitialized));
}

#[test]
fn test_reallocate_clamps_len() {
    let mut stack = GuardedStack::with_capacity(32).unwrap();
    for value in 0..20 {
        stack.push(value).unwrap();
    }

    stack.reallocate(10).unwrap();
    assert_eq!(stack.capacity(), 10);
    assert_eq!(stack.size(), 10);
    assert_eq!(stack.pop(), Ok(9));
    assert!(stack.verify_integrity().is_ok());
}

#[test]
fn test_grow_and_shrink_history() {
    let mut stack = GuardedStack::with_capacity(8).unwrap();
    stack.grow().unwrap();
    stack.grow().unwrap();
    stack.shrink().unwrap();

    assert_eq!(stack.capacity(), 16);
    let stats = stack.stats();
    assert_eq!(stats.generation, 3);
    assert_eq!(stats.grows, 2);
    assert_eq!(stats.shrinks, 1);
}

#[test]
fn test_allocation_ceiling_is_recoverable() {
    let config = StackConfig::hardened(16);
    let mut stack = GuardedStack::with_config(8, None, config).unwrap();
    for value in 0..16 {
        stack.push(value).unwrap();
    }

    let err = stack.push(16).unwrap_err();
    assert!(matches!(err, StackError::AllocationFailure { requested: 32, .. }));
    assert_eq!(err.code(), "STACK:ALLOC:FAILED");

    assert_eq!(stack.size(), 16);
    assert_eq!(stack.pop(), Ok(15));
}

#[test]
fn test_init_beyond_ceiling_fails() {
    let config = StackConfig::default().with_max_capacity(64);
    let err = GuardedStack::with_config(65, None, config).unwrap_err();
    assert!(matches!(err, StackError::AllocationFailure { .. }));
}

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_dump_goes_to_default_sink() {
    let captured = SharedBuffer::default();
    let sink = DiagnosticSink::writer(captured.clone());
    let mut stack = GuardedStack::with_config(8, Some(sink), StackConfig::production()).unwrap();
    stack.push(3).unwrap();

    stack.dump().unwrap();

    let text = String::from_utf8(captured.0.borrow().clone()).unwrap();
    assert!(text.contains("Stack size: 1"));
    assert!(text.contains("Stack capacity: 8"));
}

#[test]
fn test_handle_surface() {
    let mut stack = GuardedStack::new();
    handle::init(Some(&mut stack), 0, None).unwrap();
    handle::push(Some(&mut stack), 11).unwrap();
    handle::grow(Some(&mut stack)).unwrap();

    assert_eq!(handle::capacity(Some(&stack)), 16);
    assert_eq!(handle::pop(Some(&mut stack)), Ok(11));
    assert!(matches!(
        handle::push(None, 1),
        Err(StackError::BadHandle { .. })
    ));
    handle::free(Some(&mut stack)).unwrap();
}
