//! Guard and digest verification
//!
//! Every public operation runs `ensure_intact` before touching
//! the stack and every mutation finishes with `stamp`, so
//! damage done between two calls is reported at the start of the second one.
//! Nothing here ever repairs state: once a check fails it keeps failing.
//!
//! The digest is a positional running sum, not a cryptographic hash. It is
//! sensitive to every byte in scope and costs O(capacity) per check.

use crate::error::{IntegrityFault, StackError, StackResult};
use crate::layout::{
    Element, DATA_GUARD_BACK, DATA_GUARD_FRONT, ELEMENT_SIZE, STRUCT_GUARD_BACK,
    STRUCT_GUARD_FRONT,
};
use crate::stack::GuardedStack;

/// Added once per byte so that runs of zero bytes still move the sum.
const BYTE_BIAS: u64 = 111;

/// Positional checksum of a byte run.
///
/// For byte `b` at index `i` of an `n`-byte run: `sum += b + BYTE_BIAS + n * i`.
pub(crate) fn checksum(bytes: &[u8]) -> u64 {
    checksum_iter(bytes.iter().copied(), bytes.len())
}

/// Same as [`checksum`] over the native byte image of an element run.
fn checksum_elements(elements: &[Element]) -> u64 {
    let bytes = elements.iter().flat_map(|element| element.to_ne_bytes());
    checksum_iter(bytes, elements.len() * ELEMENT_SIZE)
}

fn checksum_iter(bytes: impl Iterator<Item = u8>, len: usize) -> u64 {
    let len = len as u64;
    bytes.zip(0u64..).fold(0u64, |sum, (byte, index)| {
        sum.wrapping_add(u64::from(byte))
            .wrapping_add(BYTE_BIAS)
            .wrapping_add(len.wrapping_mul(index))
    })
}

fn check_guard(fault: IntegrityFault, expected: u64, found: u64) -> StackResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(StackError::corrupted(fault, expected, found))
    }
}

impl GuardedStack {
    /// Compare both structural guards and both data guards against their
    /// constants.
    pub fn verify_guards(&self) -> StackResult<()> {
        check_guard(
            IntegrityFault::FrontStructGuard,
            STRUCT_GUARD_FRONT,
            self.front_guard,
        )?;
        check_guard(
            IntegrityFault::BackStructGuard,
            STRUCT_GUARD_BACK,
            self.back_guard,
        )?;
        check_guard(
            IntegrityFault::FrontDataGuard,
            DATA_GUARD_FRONT,
            self.buffer.front_guard(),
        )?;
        check_guard(
            IntegrityFault::BackDataGuard,
            DATA_GUARD_BACK,
            self.buffer.back_guard_at(self.capacity).unwrap_or(0),
        )
    }

    /// Fold the full element region and every scalar metadata field into one
    /// digest value.
    ///
    /// Covers all `capacity` slots (the poisoned tail included), `capacity`,
    /// `len`, the reallocation generation, the initialized flag and the
    /// identity of the default diagnostic sink.
    pub fn compute_digest(&self) -> u64 {
        let sink_identity = self.sink.as_ref().map_or(0, |sink| sink.identity());

        checksum_elements(self.buffer.elements())
            .wrapping_add(checksum(&self.capacity.to_ne_bytes()))
            .wrapping_add(checksum(&self.len.to_ne_bytes()))
            .wrapping_add(checksum(&self.generation.to_ne_bytes()))
            .wrapping_add(checksum(&[u8::from(self.initialized)]))
            .wrapping_add(checksum(&sink_identity.to_ne_bytes()))
    }

    /// Recompute the digest and compare it with the stored one.
    pub fn verify_digest(&self) -> StackResult<()> {
        let computed = self.compute_digest();
        if computed == self.digest {
            Ok(())
        } else {
            Err(StackError::corrupted(
                IntegrityFault::Digest,
                self.digest,
                computed,
            ))
        }
    }

    /// Run every check an operation performs before acting: handle state,
    /// guards, bounds, digest.
    pub fn verify_integrity(&self) -> StackResult<()> {
        self.ensure_intact()
    }

    pub(crate) fn ensure_initialized(&self) -> StackResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(StackError::NotInitialized)
        }
    }

    pub(crate) fn ensure_intact(&self) -> StackResult<()> {
        self.ensure_initialized()?;
        self.verify_guards()?;
        self.verify_bounds()?;
        self.verify_digest()
    }

    /// `len ≤ capacity` and `capacity` matches the buffer.
    ///
    /// Element indexing relies on this check, not on the digest.
    fn verify_bounds(&self) -> StackResult<()> {
        let slots = self.buffer.capacity();
        if self.capacity != slots {
            return Err(StackError::corrupted(
                IntegrityFault::Bounds,
                slots as u64,
                self.capacity as u64,
            ));
        }
        if self.len > self.capacity {
            return Err(StackError::corrupted(
                IntegrityFault::Bounds,
                self.capacity as u64,
                self.len as u64,
            ));
        }
        Ok(())
    }

    /// Store a fresh digest reflecting the current state.
    pub(crate) fn stamp(&mut self) {
        self.digest = self.compute_digest();
    }
}
