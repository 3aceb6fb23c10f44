//! Rayon thread pool configuration for deck sweeps.
//!
//! Use [WorkerPool::install] to run the optimizer with a fixed number of threads, or rely
//! on Rayon's default (all CPU cores).

use rayon::ThreadPoolBuilder;

/// Configures how many worker threads evaluate decks in parallel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the global Rayon pool.
    pub workers: usize,
}

impl WorkerPool {
    /// Use all available CPU cores (Rayon default).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run `f` on a pool with this worker count. A pool that fails to build falls back to
    /// the global pool; results do not depend on the thread count.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                tracing::warn!(
                    workers = self.workers,
                    "thread pool unavailable, using global pool: {err}"
                );
                f()
            }
        }
    }
}
