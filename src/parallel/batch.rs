//! Trial chunking for parallel runs.
//!
//! Chunk boundaries depend on the trial count alone, so the layout (and each chunk's RNG stream)
//! is the same whatever the worker count.

/// Trials per chunk when running in parallel.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Splits trials `0..total` into consecutive `[start, end)` ranges of `chunk_size` trials.
/// Only the last chunk may be shorter.
///
/// # Example
/// ```
/// # use dpsim::parallel::trial_chunks;
/// assert_eq!(trial_chunks(600, 256), vec![(0, 256), (256, 512), (512, 600)]);
/// ```
pub fn trial_chunks(total: usize, chunk_size: usize) -> Vec<(usize, usize)> {
    let chunk_size = chunk_size.max(1);
    (0..total)
        .step_by(chunk_size)
        .map(|start| (start, (start + chunk_size).min(total)))
        .collect()
}
