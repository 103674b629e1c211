pub mod config;
pub mod engine;
pub mod report;

pub use config::{SimulationConfig, DEFAULT_SEED};
pub use engine::{run, run_parallel, run_with, RunOptions, Simulator};
pub use report::{
    percentage, AbilityBreakdown, AggregateReport, AuraBreakdown, AuraTotals, SimulationReport,
    TrialResult,
};
