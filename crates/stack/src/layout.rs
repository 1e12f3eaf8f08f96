//! Memory layout of the guarded buffer
//!
//! A stack owns exactly one buffer split into three logical regions,
//! addressed by offset:
//!
//! ```text
//! word:  0              1 ..= capacity                 capacity + 1
//!        [front guard]  [element 0 .. element cap-1]   [back guard]
//! ```
//!
//! Guards are as wide as an element, so the buffer is a flat run of
//! `capacity + 2` words. Operation logic only ever sees the element slice;
//! guards are written and read exclusively through this module.

use crate::error::{StackError, StackResult};

/// Element stored by the stack.
pub type Element = u64;

/// Guard word type.
pub type Canary = u64;

/// Width of one guard in bytes.
pub const GUARD_SIZE: usize = size_of::<Canary>();

/// Width of one element in bytes.
pub const ELEMENT_SIZE: usize = size_of::<Element>();

/// Fill pattern for slots at or above `len`.
///
/// A caller may legitimately push this exact value; the stack never treats
/// a poison-valued live slot as corruption.
pub const POISON: Element = 0x00ED_EEDE_F0FF;

/// Structural guard ahead of the handle metadata.
pub const STRUCT_GUARD_FRONT: Canary = 0x0DED_EDED;
/// Structural guard after the handle metadata.
pub const STRUCT_GUARD_BACK: Canary = 0x0BCB_AAAC;
/// Guard word before the element array.
pub const DATA_GUARD_FRONT: Canary = 0x0CAA_BDFF;
/// Guard word after the element array.
pub const DATA_GUARD_BACK: Canary = 0x0EEE_BDAA;

/// Bytes needed for a buffer of `capacity` elements plus both guards.
pub(crate) fn buffer_bytes(capacity: usize) -> Option<usize> {
    capacity
        .checked_mul(ELEMENT_SIZE)?
        .checked_add(2 * GUARD_SIZE)
}

/// Single allocation holding both data guards and the element array
#[derive(Debug, Default)]
pub(crate) struct GuardedBuffer {
    words: Vec<u64>,
}

impl GuardedBuffer {
    /// Allocates `capacity` poisoned slots framed by fresh guards.
    pub(crate) fn allocate(capacity: usize) -> StackResult<Self> {
        let total = capacity
            .checked_add(2)
            .ok_or_else(|| StackError::allocation_failure(capacity))?;

        let mut words = Vec::new();
        words
            .try_reserve_exact(total)
            .map_err(|_| StackError::allocation_failure(capacity))?;

        words.push(DATA_GUARD_FRONT);
        words.resize(capacity + 1, POISON);
        words.push(DATA_GUARD_BACK);

        Ok(Self { words })
    }

    /// Element slots actually present in the buffer.
    pub(crate) fn capacity(&self) -> usize {
        self.words.len().saturating_sub(2)
    }

    pub(crate) fn elements(&self) -> &[Element] {
        match self.words.len() {
            0 | 1 => &[],
            n => &self.words[1..n - 1],
        }
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [Element] {
        match self.words.len() {
            0 | 1 => &mut [],
            n => &mut self.words[1..n - 1],
        }
    }

    /// Front data guard as currently stored (0 when nothing is allocated).
    pub(crate) fn front_guard(&self) -> Canary {
        self.words.first().copied().unwrap_or(0)
    }

    /// Back data guard located from the caller's view of the capacity.
    ///
    /// The offset is derived from `capacity`, not from the buffer length, so
    /// a damaged capacity field lands on a non-guard word (or past the end)
    /// and reads back as a mismatch.
    pub(crate) fn back_guard_at(&self, capacity: usize) -> Option<Canary> {
        self.words.get(capacity.checked_add(1)?).copied()
    }

    /// Address of the first element, for diagnostics only.
    pub(crate) fn data_ptr(&self) -> *const Element {
        self.elements().as_ptr()
    }

    pub(crate) fn poison_all(&mut self) {
        self.elements_mut().fill(POISON);
    }

    /// Resizes in place to `new_capacity` slots.
    ///
    /// New slots are poisoned on growth; on shrink the discarded slots are
    /// poisoned before truncation. Both guards are rewritten at their new
    /// offsets. On allocation failure the buffer is untouched.
    pub(crate) fn resize(&mut self, new_capacity: usize) -> StackResult<()> {
        let old_capacity = self.capacity();
        if new_capacity == old_capacity {
            return Ok(());
        }

        if new_capacity > old_capacity {
            self.words
                .try_reserve_exact(new_capacity - old_capacity)
                .map_err(|_| StackError::allocation_failure(new_capacity))?;
            // drop the old back guard, extend with poison
            self.words.truncate(old_capacity + 1);
            self.words.resize(new_capacity + 1, POISON);
            self.words.push(DATA_GUARD_BACK);
            self.write_guards();
        } else {
            // the new back guard lands on a poisoned word, then gets rewritten
            self.elements_mut()[new_capacity..].fill(POISON);
            self.words.truncate(new_capacity + 2);
            self.write_guards();
            self.words.shrink_to_fit();
        }

        Ok(())
    }

    pub(crate) fn write_guards(&mut self) {
        if let Some(front) = self.words.first_mut() {
            *front = DATA_GUARD_FRONT;
        }
        if self.words.len() >= 2 {
            if let Some(back) = self.words.last_mut() {
                *back = DATA_GUARD_BACK;
            }
        }
    }

    /// Drops the allocation.
    pub(crate) fn release(&mut self) {
        self.words = Vec::new();
    }

    /// Raw word access including both guards.
    #[cfg(feature = "test-util")]
    pub(crate) fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }
}
