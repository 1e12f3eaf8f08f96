//! Reallocation history

/// Snapshot of a stack's reallocation history
///
/// `generation` is the counter folded into the digest in place of the buffer
/// address; `grows` and `shrinks` are informational and outside the digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackStats {
    /// Reallocations since `init`
    pub generation: u64,
    /// Reallocations that increased capacity
    pub grows: u64,
    /// Reallocations that decreased capacity
    pub shrinks: u64,
}

impl StackStats {
    pub(crate) fn record_resize(&mut self, old_capacity: usize, new_capacity: usize) {
        if new_capacity > old_capacity {
            self.grows += 1;
        } else {
            self.shrinks += 1;
        }
    }
}
