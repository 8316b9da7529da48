//! Bounded worker pools for I/O-bound fan-out.
//!
//! A [`WorkerPool`] owns a fixed number of named rayon threads. `run_all`
//! submits one task per item, waits for every task, and returns one outcome
//! per item in submission order. A task that panics is contained and
//! reported as a [`TaskFailure`]; its siblings keep running.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use rayon::prelude::*;

use crate::error::{PoolError, PoolResult};

/// A task that did not run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Submission index of the failed task.
    pub index: usize,
    pub message: String,
}

impl std::fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task {} failed: {}", self.index, self.message)
    }
}

/// Fixed-size thread pool.
pub struct WorkerPool {
    name: String,
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Build a pool of `size` threads named `{name}-{i}`.
    pub fn new(name: &str, size: usize) -> PoolResult<Self> {
        if size == 0 {
            return Err(PoolError::ZeroWorkers { name: name.into() });
        }

        let thread_prefix = name.to_string();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(move |i| format!("{thread_prefix}-{i}"))
            .build()
            .map_err(|e| PoolError::Build {
                name: name.into(),
                message: e.to_string(),
            })?;

        Ok(Self {
            name: name.into(),
            pool,
        })
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `task` once per item and collect every outcome, indexed like `items`.
    ///
    /// Blocks the caller until all tasks finish. The output always has
    /// `items.len()` entries.
    pub fn run_all<T, R, F>(&self, items: Vec<T>, task: F) -> Vec<Result<R, TaskFailure>>
    where
        T: Send,
        R: Send,
        F: Fn(usize, T) -> R + Send + Sync,
    {
        self.pool.install(|| {
            items
                .into_par_iter()
                .enumerate()
                .map(|(index, item)| {
                    catch_unwind(AssertUnwindSafe(|| task(index, item))).map_err(|payload| {
                        TaskFailure {
                            index,
                            message: panic_message(payload.as_ref()),
                        }
                    })
                })
                .collect()
        })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.name)
            .field("size", &self.size())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
