pub mod cli;
pub mod combat;
pub mod data;
pub mod error;
pub mod parallel;
pub mod simulator;

pub use error::{ConfigError, InvariantViolation, SimError};
pub use simulator::{run, run_parallel, run_with, RunOptions, SimulationConfig, SimulationReport};
