//! Deliberate memory damage for tests
//!
//! Available only with the `test-util` feature. Every write goes straight to
//! the handle or its buffer without re-stamping the digest, which is exactly
//! what a stray pointer or an overrun would do.

use crate::layout::Element;
use crate::stack::GuardedStack;

/// Backdoor into a stack's protected memory
#[derive(Debug)]
pub struct Tamper<'a> {
    stack: &'a mut GuardedStack,
}

impl GuardedStack {
    /// Open a backdoor into this stack.
    pub fn tamper(&mut self) -> Tamper<'_> {
        Tamper { stack: self }
    }
}

impl Tamper<'_> {
    /// Overwrite the structural guard ahead of the metadata.
    pub fn front_struct_guard(&mut self, value: u64) -> &mut Self {
        self.stack.front_guard = value;
        self
    }

    /// Overwrite the structural guard after the metadata.
    pub fn back_struct_guard(&mut self, value: u64) -> &mut Self {
        self.stack.back_guard = value;
        self
    }

    /// Overwrite the guard word before the element array.
    pub fn front_data_guard(&mut self, value: u64) -> &mut Self {
        self.raw_word(0, value)
    }

    /// Overwrite the guard word after the element array.
    pub fn back_data_guard(&mut self, value: u64) -> &mut Self {
        let index = self.stack.buffer.capacity() + 1;
        self.raw_word(index, value)
    }

    /// Overwrite the element count.
    pub fn len(&mut self, value: usize) -> &mut Self {
        self.stack.len = value;
        self
    }

    /// Overwrite the capacity field.
    pub fn capacity(&mut self, value: usize) -> &mut Self {
        self.stack.capacity = value;
        self
    }

    /// Overwrite the stored digest.
    pub fn digest(&mut self, value: u64) -> &mut Self {
        self.stack.digest = value;
        self
    }

    /// Overwrite element slot `index`; out-of-range indices are ignored.
    pub fn slot(&mut self, index: usize, value: Element) -> &mut Self {
        if let Some(slot) = self.stack.buffer.elements_mut().get_mut(index) {
            *slot = value;
        }
        self
    }

    /// Overwrite word `index` of the whole buffer, guards included (word 0 is
    /// the front data guard); out-of-range indices are ignored.
    pub fn raw_word(&mut self, index: usize, value: u64) -> &mut Self {
        if let Some(word) = self.stack.buffer.words_mut().get_mut(index) {
            *word = value;
        }
        self
    }

    /// Flip one byte of the element region, as an off-by-one memset would.
    pub fn flip_byte(&mut self, byte_offset: usize) -> &mut Self {
        let index = byte_offset / size_of::<Element>();
        let shift = (byte_offset % size_of::<Element>()) * 8;
        if let Some(slot) = self.stack.buffer.elements_mut().get_mut(index) {
            *slot ^= 0xFF << shift;
        }
        self
    }
}
