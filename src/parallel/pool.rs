//! Rayon thread pool configuration for simulation workloads.
//!
//! [`WorkerPool::install`] runs parallel trial batches with a fixed thread
//! count, or on the global Rayon pool (all CPU cores) when none is set.

use rayon::ThreadPoolBuilder;

/// Worker thread count for parallel trial execution. Zero means the global
/// Rayon pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Global Rayon pool (all CPU cores).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Exactly `n` worker threads; `0` falls back to the global pool.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Runs `f` with this pool's parallelism. A fixed worker count builds a
    /// scoped pool for the call; zero runs on the global pool.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            f()
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .expect("Rayon thread pool");
            pool.install(f)
        }
    }
}
