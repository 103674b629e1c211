pub mod batch;
pub mod cancel;
pub mod pool;
pub mod progress;

pub use batch::{trial_chunks, DEFAULT_CHUNK_SIZE};
pub use cancel::CancelToken;
pub use pool::WorkerPool;
pub use progress::{Progress, ProgressFn};
