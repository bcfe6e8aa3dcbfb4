//! Reproducible randomness per logical request
//!
//! A request carries an `RngContext` keyed by a caller-supplied label. The
//! label is hashed into a 64-bit seed, and every component that needs
//! randomness forks its own generator from it by scope name. Two requests
//! with the same label therefore make the same random choices even when
//! they run concurrently on different workers, and the choices of one
//! component do not depend on how many values another one drew.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

/// Request-scoped source of deterministic random generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngContext {
    label: String,
    seed: u64,
}

impl RngContext {
    /// Create a context whose seed is derived from `label`
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let seed = xxh3_64(label.as_bytes());
        Self { label, seed }
    }

    /// Create a context with a fresh random label.
    ///
    /// The label is kept so the run can be reproduced later.
    pub fn random() -> Self {
        let label = format!("{:016x}", rand::thread_rng().gen::<u64>());
        Self::new(label)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent generator for the component named `scope`
    pub fn fork(&self, scope: &str) -> StdRng {
        StdRng::seed_from_u64(xxh3_64_with_seed(scope.as_bytes(), self.seed))
    }
}
