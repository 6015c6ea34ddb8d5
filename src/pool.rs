//! Fixed-size worker pool that quantizes one pixel range per worker.

use crate::quantize::Quantized;
use crate::{BramError, Result};
use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

/// Everything the workers produced for one buffer.
pub struct PoolOutput {
    /// Preview colors, indexed like the input buffer.
    pub preview: Vec<u32>,
    /// Listing text per worker, in worker order. Every line ends in `\n`.
    pub records: Vec<String>,
}

pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: NonZeroUsize,
    exits: Receiver<usize>,
}

impl WorkerPool {
    /// Build a pool with exactly `workers` threads.
    pub fn new(workers: NonZeroUsize) -> Result<Self> {
        let (exit_tx, exits) = mpsc::channel();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|i| format!("bram-worker-{i}"))
            .exit_handler(move |i| {
                let _ = exit_tx.send(i);
            })
            .build()?;
        tracing::debug!(workers = workers.get(), "worker pool started");
        Ok(Self { pool, workers, exits })
    }

    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Quantize `pixels`, one task per range, and block until every task is done.
    ///
    /// Ranges must be contiguous and cover `pixels` from index 0; anything
    /// else is a bug in the caller and panics.
    pub fn run(&self, pixels: &[u32], ranges: &[Range<usize>]) -> PoolOutput {
        let mut preview = vec![0u32; pixels.len()];
        let mut records = vec![String::new(); ranges.len()];
        let slots = split_disjoint(&mut preview, ranges);
        let completed = AtomicUsize::new(0);

        // Ranges are fixed here; an idle thread may pick up another range's task whole.
        self.pool.scope(|s| {
            for (worker, ((range, out), text)) in
                ranges.iter().zip(slots).zip(records.iter_mut()).enumerate()
            {
                let input = &pixels[range.clone()];
                let completed = &completed;
                s.spawn(move |_| {
                    tracing::debug!(worker, start = range.start, end = range.end, "worker started");
                    convert_range(input, out, text);
                    completed.fetch_add(1, Ordering::Release);
                });
            }
        });

        // The scope only returns once every spawned task has finished.
        assert_eq!(completed.load(Ordering::Acquire), ranges.len());
        PoolOutput { preview, records }
    }

    /// Stop the pool and wait up to `grace` for all of its threads to exit.
    pub fn shutdown(self, grace: Duration) -> Result<()> {
        let expected = self.workers.get();
        drop(self.pool);

        let deadline = Instant::now() + grace;
        let mut exited = 0;
        while exited < expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.exits.recv_timeout(remaining) {
                Ok(_) => exited += 1,
                Err(_) => return Err(BramError::ShutdownTimeout { expected, exited, grace }),
            }
        }
        tracing::debug!(exited, "worker pool stopped");
        Ok(())
    }

    /// Occupy one pool thread until the returned sender fires or is dropped.
    /// Returns only once that thread is actually blocked.
    #[cfg(test)]
    pub(crate) fn stall_one_worker(&self) -> mpsc::Sender<()> {
        let (release, wait) = mpsc::channel::<()>();
        let (started_tx, started) = mpsc::channel::<()>();
        self.pool.spawn(move || {
            let _ = started_tx.send(());
            let _ = wait.recv();
        });
        let _ = started.recv();
        release
    }
}

fn convert_range(input: &[u32], preview: &mut [u32], text: &mut String) {
    text.reserve(input.len() * 4);
    for (&color, out) in input.iter().zip(preview.iter_mut()) {
        let q = Quantized::from_rgb(color);
        *out = q.preview();
        q.push_record(text);
    }
}

/// Carve `buf` into one exclusive slice per range.
fn split_disjoint<'a>(buf: &'a mut [u32], ranges: &[Range<usize>]) -> Vec<&'a mut [u32]> {
    let len = buf.len();
    let mut rest = buf;
    let mut offset = 0;
    let mut slots = Vec::with_capacity(ranges.len());
    for range in ranges {
        assert!(
            range.start == offset && range.start <= range.end && range.end <= len,
            "range {range:?} does not continue partition at {offset} of {len}"
        );
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        slots.push(head);
        rest = tail;
        offset = range.end;
    }
    assert_eq!(offset, len, "ranges do not cover the whole buffer");
    slots
}
