//! Generation limits and defaults.

use crate::{Error, Result};

/// Upper bound on concurrently running derivation workers.
pub const DEFAULT_MAX_PARALLELISM: usize = 4;

/// Largest number of wallets a single request may ask for.
pub const DEFAULT_MAX_COUNT: u32 = 20;

/// Largest accepted PBKDF2 iteration count.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1_000_000;

/// PBKDF2 iteration count used when the caller does not pick one.
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Limits applied to every generation request.
///
/// Requests are checked against these bounds before any derivation work
/// starts, so an out-of-range request never spawns a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of parallel workers per batch.
    pub max_parallelism: usize,
    /// Maximum wallet count per batch.
    pub max_count: u32,
    /// Maximum PBKDF2 iterations.
    pub max_iterations: u32,
    /// Iterations used when none are given.
    pub default_iterations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_parallelism: DEFAULT_MAX_PARALLELISM,
            max_count: DEFAULT_MAX_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            default_iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl Config {
    /// Set the worker cap.
    pub const fn with_max_parallelism(mut self, workers: usize) -> Self {
        self.max_parallelism = workers;
        self
    }

    /// Set the wallet count cap.
    pub const fn with_max_count(mut self, count: u32) -> Self {
        self.max_count = count;
        self
    }

    /// Set the iteration cap.
    pub const fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the default iteration count.
    pub const fn with_default_iterations(mut self, iterations: u32) -> Self {
        self.default_iterations = iterations;
        self
    }

    /// Check that the limits themselves are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_parallelism == 0 {
            return Err(Error::InvalidParallelism);
        }
        if self.max_count == 0 {
            return Err(Error::InvalidCount {
                count: 0,
                max: self.max_count,
            });
        }
        self.check_iterations(self.default_iterations)
    }

    /// Reject a wallet count outside `1..=max_count`.
    pub fn check_count(&self, count: u32) -> Result<()> {
        if count == 0 || count > self.max_count {
            return Err(Error::InvalidCount {
                count,
                max: self.max_count,
            });
        }
        Ok(())
    }

    /// Reject an iteration count outside `1..=max_iterations`.
    pub fn check_iterations(&self, iterations: u32) -> Result<()> {
        if iterations == 0 || iterations > self.max_iterations {
            return Err(Error::InvalidIterations {
                iterations,
                max: self.max_iterations,
            });
        }
        Ok(())
    }

    /// Number of workers a batch of `count` tasks runs on.
    pub fn worker_count(&self, count: u32) -> usize {
        self.max_parallelism.min(count as usize)
    }
}
