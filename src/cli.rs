use std::io;

use serde::Serialize;

use crate::data::loader::{load_config, read_config};
use crate::parallel::WorkerPool;
use crate::simulator::{
    run_parallel, run_with, AbilityBreakdown, RunOptions, SimulationConfig, SimulationReport,
};

const USAGE: &str = "usage: dpsim <simulate|validate|config>";
const SIMULATE_USAGE: &str =
    "usage: dpsim simulate <config.json> [--seed N] [--workers N] [--progress] [--table|--csv]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Validate,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("validate") => Some(Command::Validate),
        Some("config") => Some(Command::Config),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Config) => handle_config(),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_simulate(args: &[String]) -> i32 {
    let Some(path) = positional(args) else {
        eprintln!("{SIMULATE_USAGE}");
        return 2;
    };
    let seed_override = match flag_value::<u64>(args, "--seed") {
        Ok(seed) => seed,
        Err(message) => {
            eprintln!("{message}");
            return 2;
        }
    };
    let workers = match flag_value::<usize>(args, "--workers") {
        Ok(workers) => workers,
        Err(message) => {
            eprintln!("{message}");
            return 2;
        }
    };
    let format = if args.iter().any(|arg| arg == "--csv") {
        OutputFormat::Csv
    } else if args.iter().any(|arg| arg == "--table") {
        OutputFormat::Table
    } else {
        OutputFormat::Json
    };
    let show_progress = args.iter().any(|arg| arg == "--progress");

    let mut config = match load_config(path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    if let Some(seed) = seed_override {
        config.seed = Some(seed);
    }
    if config.seed.is_none() {
        match entropy_seed() {
            Ok(seed) => config.seed = Some(seed),
            Err(err) => {
                eprintln!("failed to draw a random seed: {err}");
                return 1;
            }
        }
    }

    let report_progress = |done: usize, total: usize| {
        let step = (total / 10).max(1);
        if done % step == 0 || done == total {
            eprintln!("progress: {done}/{total}");
        }
    };
    let mut options = RunOptions::default();
    if show_progress {
        options = options.with_progress(&report_progress);
    }

    let outcome = match workers {
        Some(workers) => run_parallel(&config, &WorkerPool::with_workers(workers), &options),
        None => run_with(&config, &options),
    };
    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return 1;
        }
    };

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize simulation report: {err}");
                return 1;
            }
        },
        OutputFormat::Table => print_table(&report),
        OutputFormat::Csv => {
            if let Err(err) = write_csv(&report, io::stdout()) {
                eprintln!("failed to write csv: {err}");
                return 1;
            }
        }
    }
    0
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = positional(args) else {
        eprintln!("usage: dpsim validate <config.json>");
        return 2;
    };
    let config = match read_config(path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    match config.validate() {
        Ok(()) => {
            println!("validation passed: {path}");
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_config() -> i32 {
    match serde_json::to_string_pretty(&SimulationConfig::default()) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize default config: {err}");
            1
        }
    }
}

fn print_table(report: &SimulationReport) {
    println!("trials\tseed\tavg_dps\tmin_dps\tmax_dps\tavg_fight_length\tduration_s\tcancelled");
    println!(
        "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.3}\t{}",
        report.trials_completed,
        report.seed,
        report.avg_dps,
        report.min_dps,
        report.max_dps,
        report.avg_fight_length,
        report.run_duration_secs,
        report.cancelled
    );
    println!();
    println!("ability\tcasts\tavg_cast\tcrit%\tmiss%\tdamage%\tmana%\tdps");
    for row in &report.abilities {
        println!(
            "{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
            row.name,
            row.casts_per_trial,
            row.avg_damage_per_cast,
            row.crit_percent,
            row.miss_percent,
            row.damage_percent,
            row.mana_percent,
            row.dps
        );
    }
    if !report.auras.is_empty() {
        println!();
        println!("aura\tcount\tuptime%");
        for row in &report.auras {
            println!(
                "{}\t{:.2}\t{:.2}",
                row.name, row.count_per_trial, row.uptime_percent
            );
        }
    }
}

/// Flat CSV record; every row carries every column so the header stays aligned.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    ability: &'a str,
    casts_per_trial: f64,
    avg_damage_per_cast: f64,
    crit_percent: f64,
    miss_percent: f64,
    dodge_percent: Option<f64>,
    glancing_percent: Option<f64>,
    damage_percent: f64,
    mana_percent: f64,
    dps: f64,
}

impl<'a> From<&'a AbilityBreakdown> for CsvRow<'a> {
    fn from(row: &'a AbilityBreakdown) -> Self {
        Self {
            ability: row.name,
            casts_per_trial: row.casts_per_trial,
            avg_damage_per_cast: row.avg_damage_per_cast,
            crit_percent: row.crit_percent,
            miss_percent: row.miss_percent,
            dodge_percent: row.dodge_percent,
            glancing_percent: row.glancing_percent,
            damage_percent: row.damage_percent,
            mana_percent: row.mana_percent,
            dps: row.dps,
        }
    }
}

/// Writes the per-ability breakdown as CSV, one row per ability.
pub fn write_csv<W: io::Write>(report: &SimulationReport, out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    for row in &report.abilities {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

fn entropy_seed() -> Result<u64, getrandom::Error> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

/// First argument after the command that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<&str> {
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--seed" | "--workers" => {
                rest.next();
            }
            value if value.starts_with("--") => {}
            value => return Some(value),
        }
    }
    None
}

fn flag_value<T: std::str::FromStr>(args: &[String], name: &str) -> Result<Option<T>, String> {
    let Some(index) = args.iter().position(|arg| arg == name) else {
        return Ok(None);
    };
    let Some(raw) = args.get(index + 1) else {
        return Err(format!("{name} needs a value"));
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| format!("invalid {name} '{raw}'"))
}
