//! Trial orchestration.
//!
//! A trial draws its fight length, resets the actor and then loops: decide if the actor is free,
//! take the largest safe step, advance. [run_with] runs every trial on one RNG stream;
//! [run_parallel] splits the trials into fixed chunks, each with its own derived stream, so its
//! results depend on the seed and trial count only.

use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::combat::actor::Actor;
use crate::combat::trace::{CombatLogEntry, TraceMode};
use crate::combat::rng::{stream_seed, Rng};
use crate::error::SimError;
use crate::parallel::{
    trial_chunks, CancelToken, Progress, ProgressFn, WorkerPool, DEFAULT_CHUNK_SIZE,
};
use crate::simulator::config::SimulationConfig;
use crate::simulator::report::{AggregateReport, SimulationReport, TrialResult};

type ChunkOutcome = Result<(AggregateReport, Vec<CombatLogEntry>), SimError>;

/// Optional hooks for a run.
#[derive(Clone, Copy, Default)]
pub struct RunOptions<'a> {
    pub cancel: Option<&'a CancelToken>,
    /// Called with `(done, total)` after every trial.
    pub progress: Option<&'a ProgressFn<'a>>,
}

impl<'a> RunOptions<'a> {
    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_progress(mut self, progress: &'a ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }
}

/// One actor and one RNG stream running trials back to back.
#[derive(Debug, Clone)]
pub struct Simulator {
    actor: Actor,
    rng: Rng,
    min_time: u32,
    max_time: u32,
}

impl Simulator {
    pub fn new(config: &SimulationConfig) -> Result<Self, SimError> {
        Self::with_seed(config, config.effective_seed())
    }

    pub fn with_seed(config: &SimulationConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            actor: Actor::new(&config.actor)?,
            rng: Rng::new(seed),
            min_time: config.min_time,
            max_time: config.max_time,
        })
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Draws the fight length and resets the actor. Returns the fight length.
    pub fn begin_trial(&mut self, trace: TraceMode) -> f64 {
        let fight_length = f64::from(self.rng.range_inclusive(self.min_time, self.max_time));
        self.actor.reset(fight_length, trace);
        fight_length
    }

    /// Lets a free actor act, then advances by the largest safe step. Returns the step taken.
    pub fn step(&mut self) -> Result<f64, SimError> {
        if self.actor.is_free() {
            self.actor.act(&mut self.rng)?;
        }
        let step = self.actor.next_step();
        self.actor.advance(step)?;
        Ok(step)
    }

    pub fn run_trial(&mut self, trace: TraceMode) -> Result<TrialResult, SimError> {
        let fight_length = self.begin_trial(trace);
        while self.actor.is_fight_running() {
            self.step()?;
        }
        let result = TrialResult::new(self.actor.damage(), fight_length);
        debug!(
            "trial finished: {:.0} damage over {:.0}s ({:.2} dps)",
            result.damage, result.fight_length, result.dps
        );
        Ok(result)
    }

    /// Runs trials `start..end` into `aggregate`, stopping early on cancellation.
    /// Returns the combat log of `log_trial` if it was among them.
    fn run_range(
        &mut self,
        start: usize,
        end: usize,
        log_trial: Option<usize>,
        options: &RunOptions<'_>,
        progress: &Progress<'_>,
        aggregate: &mut AggregateReport,
    ) -> Result<Vec<CombatLogEntry>, SimError> {
        let mut combat_log = Vec::new();
        for trial in start..end {
            if options.is_cancelled() {
                aggregate.cancelled = true;
                break;
            }
            let trace = if log_trial == Some(trial) {
                TraceMode::Events
            } else {
                TraceMode::Off
            };
            let result = self.run_trial(trace)?;
            if trace == TraceMode::Events {
                combat_log = self.actor.take_combat_log();
            }
            aggregate.record_trial(&result, &self.actor);
            progress.tick();
        }
        Ok(combat_log)
    }
}

pub fn run(config: &SimulationConfig) -> Result<SimulationReport, SimError> {
    run_with(config, &RunOptions::default())
}

/// Runs every trial in order on the run's single RNG stream.
pub fn run_with(
    config: &SimulationConfig,
    options: &RunOptions<'_>,
) -> Result<SimulationReport, SimError> {
    let started = Instant::now();
    let seed = config.effective_seed();
    let mut simulator = Simulator::with_seed(config, seed)?;
    let trials = config.trials as usize;
    info!(
        "simulating {trials} trials of {}-{}s (seed {seed})",
        config.min_time, config.max_time
    );

    let progress = Progress::new(trials, options.progress);
    let mut aggregate = AggregateReport::new();
    let log_trial = config.combat_log_trial.map(|trial| trial as usize);
    let combat_log =
        simulator.run_range(0, trials, log_trial, options, &progress, &mut aggregate)?;

    finish(aggregate, seed, started, combat_log)
}

/// Runs fixed-size trial chunks on `pool`. Chunk `k` uses `stream_seed(seed, k)` and chunks merge
/// in order, so the report does not depend on the worker count.
pub fn run_parallel(
    config: &SimulationConfig,
    pool: &WorkerPool,
    options: &RunOptions<'_>,
) -> Result<SimulationReport, SimError> {
    let started = Instant::now();
    config.validate()?;
    let seed = config.effective_seed();
    let trials = config.trials as usize;
    let chunks = trial_chunks(trials, DEFAULT_CHUNK_SIZE);
    info!(
        "simulating {trials} trials in {} chunks on {} workers (seed {seed})",
        chunks.len(),
        pool.thread_count()
    );

    let progress = Progress::new(trials, options.progress);
    let log_trial = config.combat_log_trial.map(|trial| trial as usize);
    let partials: Vec<ChunkOutcome> = pool
        .install(|| {
            chunks
                .par_iter()
                .enumerate()
                .map(|(index, (start, end))| -> ChunkOutcome {
                    let chunk_seed = stream_seed(seed, index as u64);
                    let mut simulator = Simulator::with_seed(config, chunk_seed)?;
                    let mut aggregate = AggregateReport::new();
                    let log = simulator.run_range(
                        *start,
                        *end,
                        log_trial,
                        options,
                        &progress,
                        &mut aggregate,
                    )?;
                    Ok((aggregate, log))
                })
                .collect()
        })
        .map_err(|err| SimError::WorkerPool(err.to_string()))?;

    let mut aggregate = AggregateReport::new();
    let mut combat_log = Vec::new();
    for partial in partials {
        let (chunk, log) = partial?;
        aggregate.merge(&chunk);
        if !log.is_empty() {
            combat_log = log;
        }
    }
    finish(aggregate, seed, started, combat_log)
}

fn finish(
    aggregate: AggregateReport,
    seed: u64,
    started: Instant,
    combat_log: Vec<CombatLogEntry>,
) -> Result<SimulationReport, SimError> {
    if aggregate.cancelled {
        warn!("simulation cancelled after {} trials", aggregate.trials);
    }
    let report = SimulationReport::finalize(aggregate, seed, started.elapsed(), combat_log);
    info!(
        "finished {} trials in {:.3}s: {:.2} dps (min {:.2}, max {:.2})",
        report.trials_completed,
        report.run_duration_secs,
        report.avg_dps,
        report.min_dps,
        report.max_dps
    );
    Ok(report)
}
