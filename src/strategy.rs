//! Execution strategies for the point-indexed passes of k-means.
//!
//! The assignment, update and accuracy passes are written once against
//! [`Executor`]. [`Sequential`] runs them in index order on the calling
//! thread; [`Parallel`] splits the index range into one contiguous block per
//! worker of a rayon thread pool.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::ops::Range;
use std::sync::{Mutex, PoisonError};

pub trait Executor: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Number of workers a pass is split across.
    fn workers(&self) -> usize;

    /// Set every slot to `value`.
    fn fill<T>(&self, slots: &mut [T], value: T)
    where
        T: Copy + Send + Sync;

    /// Apply `op(i, &mut slots[i])` to every slot and return how many calls
    /// reported a change. Each slot is touched by exactly one worker.
    fn count_changes<T, F>(&self, slots: &mut [T], op: F) -> usize
    where
        T: Send,
        F: Fn(usize, &mut T) -> bool + Sync;

    /// Sum `f(i)` over `0..len`.
    fn sum<F>(&self, len: usize, f: F) -> f64
    where
        F: Fn(usize) -> f64 + Sync;

    /// Fold every index in `0..len` into a private accumulator per worker,
    /// then merge the partial accumulators into one.
    fn fold_merge<A, I, F, M>(&self, len: usize, identity: I, fold: F, merge: M) -> A
    where
        A: Send,
        I: Fn() -> A + Sync,
        F: Fn(&mut A, usize) + Sync,
        M: Fn(&mut A, A) + Sync;
}

/// Single-threaded baseline.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequential;

impl Executor for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn workers(&self) -> usize {
        1
    }

    fn fill<T>(&self, slots: &mut [T], value: T)
    where
        T: Copy + Send + Sync,
    {
        slots.fill(value);
    }

    fn count_changes<T, F>(&self, slots: &mut [T], op: F) -> usize
    where
        T: Send,
        F: Fn(usize, &mut T) -> bool + Sync,
    {
        let mut changes = 0;
        for (i, slot) in slots.iter_mut().enumerate() {
            if op(i, slot) {
                changes += 1;
            }
        }
        changes
    }

    fn sum<F>(&self, len: usize, f: F) -> f64
    where
        F: Fn(usize) -> f64 + Sync,
    {
        (0..len).map(f).sum()
    }

    fn fold_merge<A, I, F, M>(&self, len: usize, identity: I, fold: F, _merge: M) -> A
    where
        A: Send,
        I: Fn() -> A + Sync,
        F: Fn(&mut A, usize) + Sync,
        M: Fn(&mut A, A) + Sync,
    {
        let mut acc = identity();
        for i in 0..len {
            fold(&mut acc, i);
        }
        acc
    }
}

/// Thread-team strategy backed by a dedicated rayon pool.
pub struct Parallel {
    pool: ThreadPool,
}

impl Parallel {
    /// Build a pool of `threads` workers, or one per available core when `None`.
    pub fn new(threads: Option<usize>) -> Result<Self, rayon::ThreadPoolBuildError> {
        let threads = threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("kmeans-worker-{i}"))
            .build()?;
        Ok(Parallel { pool })
    }

    /// Static partition: one contiguous block per worker.
    #[inline]
    fn block_len(&self, len: usize) -> usize {
        len.div_ceil(self.workers()).max(1)
    }

    #[inline]
    fn blocks(&self, len: usize) -> (usize, usize) {
        let block = self.block_len(len);
        (block, len.div_ceil(block))
    }
}

#[inline]
fn block_range(b: usize, block: usize, len: usize) -> Range<usize> {
    b * block..((b + 1) * block).min(len)
}

impl Executor for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn fill<T>(&self, slots: &mut [T], value: T)
    where
        T: Copy + Send + Sync,
    {
        let block = self.block_len(slots.len());
        self.pool
            .install(|| slots.par_chunks_mut(block).for_each(|chunk| chunk.fill(value)));
    }

    fn count_changes<T, F>(&self, slots: &mut [T], op: F) -> usize
    where
        T: Send,
        F: Fn(usize, &mut T) -> bool + Sync,
    {
        let block = self.block_len(slots.len());
        self.pool.install(|| {
            slots
                .par_chunks_mut(block)
                .enumerate()
                .map(|(b, chunk)| {
                    let base = b * block;
                    let mut changes = 0;
                    for (j, slot) in chunk.iter_mut().enumerate() {
                        if op(base + j, slot) {
                            changes += 1;
                        }
                    }
                    changes
                })
                .sum()
        })
    }

    fn sum<F>(&self, len: usize, f: F) -> f64
    where
        F: Fn(usize) -> f64 + Sync,
    {
        let (block, n_blocks) = self.blocks(len);
        self.pool.install(|| {
            (0..n_blocks)
                .into_par_iter()
                .map(|b| block_range(b, block, len).map(&f).sum::<f64>())
                .sum()
        })
    }

    fn fold_merge<A, I, F, M>(&self, len: usize, identity: I, fold: F, merge: M) -> A
    where
        A: Send,
        I: Fn() -> A + Sync,
        F: Fn(&mut A, usize) + Sync,
        M: Fn(&mut A, A) + Sync,
    {
        let (block, n_blocks) = self.blocks(len);
        let global = Mutex::new(identity());

        self.pool.install(|| {
            (0..n_blocks).into_par_iter().for_each(|b| {
                let mut local = identity();
                for i in block_range(b, block, len) {
                    fold(&mut local, i);
                }
                // Only the merge is serialized.
                let mut global = global.lock().unwrap_or_else(PoisonError::into_inner);
                merge(&mut *global, local);
            });
        });

        global.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
