//! Exhaustive chunked scan with per-chunk top-K and a single-threaded merge.

use rayon::ThreadPool;
use rayon::prelude::*;

use super::topk::{Scored, TopK};

/// Build the scan pool, or `None` to scan on the calling thread.
pub fn build_pool(workers: usize) -> Option<ThreadPool> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("eqs-scan-{i}"))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(err) => {
            tracing::warn!(error = %err, "scan pool unavailable; scanning sequentially");
            None
        }
    }
}

fn scan_chunk<F>(keys: &[&str], capacity: usize, score: &F) -> TopK
where
    F: Fn(&str) -> Option<f64>,
{
    let mut top = TopK::new(capacity);
    for key in keys {
        if let Some(s) = score(key) {
            top.push(Scored::new(*key, s));
        }
    }
    top
}

/// Score every key and keep the best `capacity`, best first.
///
/// `score` returns `None` for keys that are not admitted. Chunks are scored
/// independently; the result does not depend on chunking or pool size.
pub fn top_k<F>(
    keys: &[&str],
    chunk_size: usize,
    capacity: usize,
    pool: Option<&ThreadPool>,
    score: F,
) -> Vec<Scored>
where
    F: Fn(&str) -> Option<f64> + Sync,
{
    let chunk_size = chunk_size.max(1);

    let partials: Vec<TopK> = match pool {
        Some(pool) => pool.install(|| {
            keys.par_chunks(chunk_size)
                .map(|chunk| scan_chunk(chunk, capacity, &score))
                .collect()
        }),
        None => keys
            .chunks(chunk_size)
            .map(|chunk| scan_chunk(chunk, capacity, &score))
            .collect(),
    };

    tracing::trace!(chunks = partials.len(), keys = keys.len(), "scan complete");

    let mut merged = TopK::new(capacity);
    for partial in partials {
        merged.merge(partial);
    }
    merged.into_ranked()
}
