use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress callback invoked with `(done, total)` trials.
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Sync + 'a;

/// Counts finished trials across workers and forwards each tick to an optional callback.
pub struct Progress<'a> {
    done: AtomicUsize,
    total: usize,
    callback: Option<&'a ProgressFn<'a>>,
}

impl<'a> Progress<'a> {
    pub fn new(total: usize, callback: Option<&'a ProgressFn<'a>>) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            callback,
        }
    }

    /// Marks one trial finished and returns the new count.
    pub fn tick(&self) -> usize {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(callback) = self.callback {
            callback(done, self.total);
        }
        done
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
