//! Run the same simulation on one worker and on all cores, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup

use std::process;
use std::time::Instant;

use dpsim::parallel::WorkerPool;
use dpsim::simulator::{run_parallel, RunOptions, SimulationConfig};

fn main() {
    let config = SimulationConfig {
        trials: 4000,
        seed: Some(12345),
        ..SimulationConfig::default()
    };
    println!(
        "Monte Carlo: {} trials of {}-{} s",
        config.trials, config.min_time, config.max_time
    );
    println!();

    let options = RunOptions::default();

    // Single worker
    let t0 = Instant::now();
    let single = match run_parallel(&config, &WorkerPool::with_workers(1), &options) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("single-worker run failed: {err}");
            process::exit(1);
        }
    };
    let single_ms = t0.elapsed().as_secs_f64() * 1000.0;
    println!(
        "1 worker:    {:.2} ms  ({:.1} trials/s)",
        single_ms,
        f64::from(config.trials) / (single_ms / 1000.0)
    );

    // All cores
    let t0 = Instant::now();
    let all = match run_parallel(&config, &WorkerPool::default_workers(), &options) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("parallel run failed: {err}");
            process::exit(1);
        }
    };
    let all_ms = t0.elapsed().as_secs_f64() * 1000.0;
    println!(
        "All cores:   {:.2} ms  ({:.1} trials/s)",
        all_ms,
        f64::from(config.trials) / (all_ms / 1000.0)
    );

    println!();
    println!("Speedup:     {:.2}x faster (all cores vs one worker)", single_ms / all_ms);

    if single.totals != all.totals {
        eprintln!("results differ between worker counts");
        process::exit(1);
    }
    println!("(Results match across worker counts)");
}
