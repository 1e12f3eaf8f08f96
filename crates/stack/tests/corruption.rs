//! Integration tests for corruption detection
//!
//! Every test damages a live stack through `Tamper` and checks that the next
//! operation reports it without touching the data.

use rstest::rstest;
use warden_stack::{GuardedStack, IntegrityFault, POISON, StackConfig, StackError};

fn stack_with(values: &[u64]) -> GuardedStack {
    let mut stack = GuardedStack::with_config(8, None, StackConfig::production()).unwrap();
    for &value in values {
        stack.push(value).unwrap();
    }
    stack
}

fn fault_of(err: &StackError) -> Option<IntegrityFault> {
    match err {
        StackError::Corrupted { fault, .. } => Some(*fault),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Damage {
    FrontStructGuard,
    BackStructGuard,
    FrontDataGuard,
    BackDataGuard,
    LiveSlot,
    UnusedSlot,
    LenWithinCapacity,
    LenPastCapacity,
    CapacityGrown,
    Digest,
    FlippedByte,
}

fn apply(damage: Damage, stack: &mut GuardedStack) {
    let mut tamper = stack.tamper();
    match damage {
        Damage::FrontStructGuard => tamper.front_struct_guard(0),
        Damage::BackStructGuard => tamper.back_struct_guard(1),
        Damage::FrontDataGuard => tamper.front_data_guard(0),
        Damage::BackDataGuard => tamper.back_data_guard(0),
        Damage::LiveSlot => tamper.slot(0, 99),
        Damage::UnusedSlot => tamper.slot(6, 0),
        Damage::LenWithinCapacity => tamper.len(1),
        Damage::LenPastCapacity => tamper.len(9),
        Damage::CapacityGrown => tamper.capacity(1 << 20),
        Damage::Digest => tamper.digest(0),
        Damage::FlippedByte => tamper.flip_byte(3),
    };
}

#[rstest]
#[case(Damage::FrontStructGuard, IntegrityFault::FrontStructGuard)]
#[case(Damage::BackStructGuard, IntegrityFault::BackStructGuard)]
#[case(Damage::FrontDataGuard, IntegrityFault::FrontDataGuard)]
#[case(Damage::BackDataGuard, IntegrityFault::BackDataGuard)]
#[case(Damage::LiveSlot, IntegrityFault::Digest)]
#[case(Damage::UnusedSlot, IntegrityFault::Digest)]
#[case(Damage::LenWithinCapacity, IntegrityFault::Digest)]
#[case(Damage::LenPastCapacity, IntegrityFault::Bounds)]
#[case(Damage::CapacityGrown, IntegrityFault::BackDataGuard)]
#[case(Damage::Digest, IntegrityFault::Digest)]
#[case(Damage::FlippedByte, IntegrityFault::Digest)]
fn test_damage_is_detected(#[case] damage: Damage, #[case] expected: IntegrityFault) {
    let mut stack = stack_with(&[10, 20, 30]);
    apply(damage, &mut stack);
    let size_before = stack.size();

    let err = stack.push(40).unwrap_err();
    assert!(err.is_corruption());
    assert_eq!(err.code(), "STACK:INTEGRITY:CORRUPTED");
    assert_eq!(fault_of(&err), Some(expected));

    assert_eq!(stack.size(), size_before);
    assert!(stack.pop().unwrap_err().is_corruption());
}

#[test]
fn test_corruption_is_sticky() {
    let mut stack = stack_with(&[1, 2]);
    stack.tamper().slot(1, 7);

    for _ in 0..3 {
        assert!(stack.pop().unwrap_err().is_corruption());
        assert!(stack.peek().unwrap_err().is_corruption());
        assert!(stack.push(3).unwrap_err().is_corruption());
    }
}

#[test]
fn test_guard_checked_before_digest() {
    let mut stack = stack_with(&[1]);
    stack.tamper().digest(0).front_struct_guard(0);

    let err = stack.peek().unwrap_err();
    assert_eq!(fault_of(&err), Some(IntegrityFault::FrontStructGuard));
}

#[test]
fn test_reported_values() {
    let mut stack = stack_with(&[]);
    stack.tamper().front_data_guard(0xBAD);

    assert_eq!(
        stack.verify_guards(),
        Err(StackError::Corrupted {
            fault: IntegrityFault::FrontDataGuard,
            expected: 0x0CAA_BDFF,
            found: 0xBAD,
        })
    );
}

#[test]
fn test_shrunk_capacity_reads_element_as_guard() {
    let mut stack = stack_with(&[]);
    stack.tamper().capacity(4);

    let err = stack.verify_integrity().unwrap_err();
    assert_eq!(
        err,
        StackError::Corrupted {
            fault: IntegrityFault::BackDataGuard,
            expected: 0x0EEE_BDAA,
            found: POISON,
        }
    );
}

#[test]
fn test_dump_still_works_on_damaged_stack() {
    let mut stack = stack_with(&[5]);
    stack.tamper().slot(0, 6);

    let report = stack.report().unwrap();
    assert!(report.contains("Stack size: 1"));
    assert!(stack.verify_integrity().is_err());
}

#[test]
fn test_capacity_operations_refuse_damaged_stack() {
    let mut stack = stack_with(&[1, 2, 3]);
    stack.tamper().len(2);

    assert!(stack.grow().unwrap_err().is_corruption());
    assert!(stack.shrink().unwrap_err().is_corruption());
    assert!(stack.reallocate(32).unwrap_err().is_corruption());
    assert!(stack.shrink_if_sparse().unwrap_err().is_corruption());
    assert_eq!(stack.capacity(), 8);
}

#[test]
fn test_free_is_allowed_after_corruption() {
    let mut stack = stack_with(&[1]);
    stack.tamper().back_struct_guard(0);

    stack.free().unwrap();
    assert_eq!(stack.push(1), Err(StackError::NotInitialized));
}
