//! Run the trial loop for a fixed wall-clock budget and optionally append one line to a log file
//! for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, trials_per_sec, trials_per_min, steps_per_sec, fight_seconds).

use std::fs::OpenOptions;
use std::io::Write;
use std::process;
use std::time::Instant;

use dpsim::combat::TraceMode;
use dpsim::simulator::{SimulationConfig, Simulator};

// Run for at least this long or this many trials
const MIN_DURATION_MS: u128 = 2000;
const MIN_TRIALS: u32 = 200;
const FIGHT_SECONDS: u32 = 180;

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let config = SimulationConfig {
        min_time: FIGHT_SECONDS,
        max_time: FIGHT_SECONDS,
        seed: Some(7),
        ..SimulationConfig::default()
    };
    let mut simulator = match Simulator::new(&config) {
        Ok(simulator) => simulator,
        Err(err) => {
            eprintln!("benchmark config rejected: {err}");
            process::exit(1);
        }
    };

    let start = Instant::now();
    let mut trials: u32 = 0;
    let mut steps: u64 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || trials < MIN_TRIALS {
        simulator.begin_trial(TraceMode::Off);
        while simulator.actor().is_fight_running() {
            if let Err(err) = simulator.step() {
                eprintln!("trial failed: {err}");
                process::exit(1);
            }
            steps += 1;
        }
        trials += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let trials_per_sec = f64::from(trials) / elapsed_secs;
    let trials_per_min = trials_per_sec * 60.0;
    let steps_per_sec = steps as f64 / elapsed_secs;

    println!("Simulator benchmark ({FIGHT_SECONDS} s fights):");
    println!("  Trials:      {}", trials);
    println!("  Duration:    {:.2} s", elapsed_secs);
    println!("  Trials/s:    {:.2}", trials_per_sec);
    println!("  Trials/min:  {:.2}", trials_per_min);
    println!("  Steps/s:     {:.2}", steps_per_sec);

    if log {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!(
            "{},{:.4},{:.4},{:.4},{}\n",
            date, trials_per_sec, trials_per_min, steps_per_sec, FIGHT_SECONDS
        );
        let path = "benchmark_log.csv";
        if let Err(err) = append_log_line(path, &line) {
            eprintln!("failed to append to {path}: {err}");
            process::exit(1);
        }
        println!("Appended to {}", path);
    }
}

fn append_log_line(path: &str, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,trials_per_sec,trials_per_min,steps_per_sec,fight_seconds\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}
