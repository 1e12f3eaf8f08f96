//! Capacity management: growth, shrinking and explicit reallocation
//!
//! All resizing goes through `resize_storage`, which resizes
//! the single buffer in place, re-guards it, bumps the generation counter and
//! re-stamps the digest. A failed allocation leaves the stack exactly as it
//! was.

use crate::config::MIN_CAPACITY;
use crate::error::{StackError, StackResult};
use crate::stack::GuardedStack;

#[cfg(feature = "logging")]
use warden_log::debug;

impl GuardedStack {
    /// Resize to `new_capacity` slots (clamped up to [`MIN_CAPACITY`]).
    ///
    /// Shrinking below the current element count discards the elements above
    /// the new capacity and clamps the count; that data loss is accepted
    /// policy, not an error.
    pub fn reallocate(&mut self, new_capacity: usize) -> StackResult<()> {
        self.ensure_intact()?;
        self.resize_storage(new_capacity)
    }

    /// Double the capacity, bounded by the configured `max_capacity`.
    pub fn grow(&mut self) -> StackResult<()> {
        self.ensure_intact()?;
        let target = self.growth_target()?;
        self.resize_storage(target)
    }

    /// Halve the capacity, never below [`MIN_CAPACITY`].
    pub fn shrink(&mut self) -> StackResult<()> {
        self.ensure_intact()?;
        self.resize_storage(self.capacity / 2)
    }

    /// Halve the capacity when at most a quarter of the slots are live.
    ///
    /// Returns whether a reallocation happened. Never invoked implicitly by
    /// `pop`; callers decide when to reclaim memory.
    pub fn shrink_if_sparse(&mut self) -> StackResult<bool> {
        self.ensure_intact()?;
        if self.capacity <= MIN_CAPACITY || self.len.saturating_mul(4) > self.capacity {
            return Ok(false);
        }
        self.resize_storage(self.capacity / 2)?;
        Ok(true)
    }

    /// Called by `push` after the integrity checks have passed.
    pub(crate) fn grow_if_full(&mut self) -> StackResult<()> {
        if self.len < self.capacity {
            return Ok(());
        }
        let target = self.growth_target()?;
        self.resize_storage(target)
    }

    /// Twice the current capacity, capped at `max_capacity`; fails once the
    /// ceiling has been reached.
    fn growth_target(&self) -> StackResult<usize> {
        let doubled = self.capacity.saturating_mul(2);
        if self.capacity >= self.config.max_capacity {
            return Err(StackError::allocation_failure(doubled));
        }
        Ok(doubled.min(self.config.max_capacity))
    }

    fn resize_storage(&mut self, new_capacity: usize) -> StackResult<()> {
        let new_capacity = new_capacity.max(MIN_CAPACITY);
        let old_capacity = self.capacity;
        if new_capacity == old_capacity {
            return Ok(());
        }
        if new_capacity > self.config.max_capacity {
            return Err(StackError::allocation_failure(new_capacity));
        }

        self.buffer.resize(new_capacity)?;

        self.capacity = new_capacity;
        self.len = self.len.min(new_capacity);
        self.generation += 1;
        self.stats.record_resize(old_capacity, new_capacity);
        self.stamp();

        #[cfg(feature = "logging")]
        debug!(
            from = old_capacity,
            to = new_capacity,
            len = self.len,
            generation = self.generation,
            "stack reallocated"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackConfig;
    use crate::layout::{ELEMENT_SIZE, POISON};

    fn filled(capacity: usize, count: u64) -> GuardedStack {
        let mut stack = GuardedStack::with_capacity(capacity).unwrap();
        for value in 0..count {
            stack.push(value).unwrap();
        }
        stack
    }

    #[test]
    fn test_push_past_capacity_doubles() {
        let stack = filled(8, 9);
        assert_eq!(stack.capacity(), 16);
        assert_eq!(stack.stats().generation, 1);
        assert_eq!(stack.stats().grows, 1);
    }

    #[test]
    fn test_reallocate_same_capacity_is_noop() {
        let mut stack = filled(8, 3);
        stack.reallocate(8).unwrap();
        stack.reallocate(2).unwrap();
        assert_eq!(stack.stats().generation, 0);
    }

    #[test]
    fn test_reallocate_below_len_clamps() {
        let mut stack = filled(32, 20);
        stack.reallocate(8).unwrap();

        assert_eq!(stack.capacity(), 8);
        assert_eq!(stack.size(), 8);
        assert_eq!(stack.pop().unwrap(), 7);
        assert!(stack.verify_integrity().is_ok());
    }

    #[test]
    fn test_shrink_keeps_live_prefix_and_poisoned_tail() {
        let mut stack = filled(16, 4);
        stack.shrink().unwrap();
        assert_eq!(stack.capacity(), 8);
        assert_eq!(&stack.buffer.elements()[..4], &[0, 1, 2, 3]);
        assert!(stack.buffer.elements()[4..].iter().all(|&slot| slot == POISON));
    }

    #[test]
    fn test_shrink_never_below_minimum() {
        let mut stack = filled(8, 0);
        stack.shrink().unwrap();
        assert_eq!(stack.capacity(), MIN_CAPACITY);
        assert_eq!(stack.stats().shrinks, 0);
    }

    #[test]
    fn test_shrink_if_sparse() {
        let mut stack = filled(64, 20);
        assert!(!stack.shrink_if_sparse().unwrap());

        for _ in 0..4 {
            stack.pop().unwrap();
        }
        assert!(stack.shrink_if_sparse().unwrap());
        assert_eq!(stack.capacity(), 32);
        assert_eq!(stack.size(), 16);
    }

    #[test]
    fn test_growth_capped_by_ceiling() {
        let config = StackConfig::default().with_max_capacity(12);
        let mut stack = GuardedStack::with_config(8, None, config).unwrap();
        stack.grow().unwrap();
        assert_eq!(stack.capacity(), 12);

        let err = stack.grow().unwrap_err();
        assert!(matches!(err, StackError::AllocationFailure { .. }));
    }

    #[test]
    fn test_failed_growth_leaves_stack_valid() {
        let config = StackConfig::default().with_max_capacity(8);
        let mut stack = GuardedStack::with_config(8, None, config).unwrap();
        for value in 0..8 {
            stack.push(value).unwrap();
        }

        let err = stack.push(8).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(stack.size(), 8);
        assert_eq!(stack.capacity(), 8);
        assert!(stack.verify_integrity().is_ok());
        assert_eq!(stack.pop().unwrap(), 7);
    }

    #[test]
    fn test_allocator_refusal_leaves_stack_valid() {
        // passes validation, but no allocator can hand out that many words
        let huge = isize::MAX as usize / ELEMENT_SIZE;
        let config = StackConfig::default().with_max_capacity(huge);
        assert!(config.validate().is_ok());

        let mut stack = GuardedStack::with_config(8, None, config).unwrap();
        stack.push(1).unwrap();
        stack.push(2).unwrap();

        let err = stack.reallocate(huge).unwrap_err();
        assert!(matches!(err, StackError::AllocationFailure { requested, .. } if requested == huge));
        assert!(err.is_recoverable());

        assert!(stack.verify_integrity().is_ok());
        assert_eq!(stack.capacity(), 8);
        assert_eq!(stack.stats().generation, 0);
        assert_eq!(stack.pop().unwrap(), 2);
    }

    #[test]
    fn test_reallocate_after_corruption_is_refused() {
        let mut stack = filled(8, 2);
        stack.digest ^= 1;
        assert!(stack.reallocate(64).unwrap_err().is_corruption());
        assert_eq!(stack.capacity(), 8);
    }
}
