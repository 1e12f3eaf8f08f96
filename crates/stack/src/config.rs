//! Guarded stack configuration

use crate::error::{StackError, StackResult};

/// Smallest number of element slots a stack ever holds.
pub const MIN_CAPACITY: usize = 8;

/// Default ceiling on element slots (2^28 slots, 2 GiB of elements).
pub const DEFAULT_MAX_CAPACITY: usize = 1 << 28;

/// Configuration for [`GuardedStack`](crate::GuardedStack)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StackConfig {
    /// Re-poison the vacated slot on `pop`
    pub poison_on_pop: bool,

    /// Append addresses and guard values to dumps
    pub verbose_dump: bool,

    /// Hard upper bound on element slots; larger requests fail with
    /// `AllocationFailure`
    pub max_capacity: usize,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            poison_on_pop: true,
            verbose_dump: cfg!(debug_assertions),
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl StackConfig {
    /// Production configuration - terse dumps
    pub fn production() -> Self {
        Self {
            verbose_dump: false,
            ..Self::default()
        }
    }

    /// Debug configuration - verbose dumps
    pub fn debug() -> Self {
        Self {
            verbose_dump: true,
            ..Self::default()
        }
    }

    /// Hardened configuration - verbose dumps and a bounded footprint
    pub fn hardened(max_capacity: usize) -> Self {
        Self {
            poison_on_pop: true,
            verbose_dump: true,
            max_capacity,
        }
    }

    /// Set the slot ceiling
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Toggle verbose dumps
    #[must_use = "builder methods must be chained or built"]
    pub fn with_verbose_dump(mut self, verbose: bool) -> Self {
        self.verbose_dump = verbose;
        self
    }

    /// Toggle poisoning of popped slots
    #[must_use = "builder methods must be chained or built"]
    pub fn with_poison_on_pop(mut self, poison: bool) -> Self {
        self.poison_on_pop = poison;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> StackResult<()> {
        if self.max_capacity < MIN_CAPACITY {
            return Err(StackError::invalid_config(&format!(
                "max_capacity {} is below the minimum capacity {MIN_CAPACITY}",
                self.max_capacity
            )));
        }
        if crate::layout::buffer_bytes(self.max_capacity).is_none() {
            return Err(StackError::invalid_config(
                "max_capacity overflows the addressable buffer size",
            ));
        }
        Ok(())
    }
}
