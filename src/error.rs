use thiserror::Error;

use crate::combat::ids::{AbilityId, AuraId};

/// Rejected before any trial runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("trial count must be positive")]
    NoTrials,
    #[error("fight length must be positive, got a minimum of {min}s")]
    NonPositiveFightLength { min: u32 },
    #[error("minimum fight length {min}s exceeds maximum fight length {max}s")]
    InvertedFightLength { min: u32, max: u32 },
    #[error("no filler ability configured")]
    MissingFiller,
    #[error("filler {ability} costs {cost} mana but the actor only has {max_mana}")]
    UnaffordableFiller {
        ability: AbilityId,
        cost: f64,
        max_mana: f64,
    },
    #[error("{0} cannot be both the filler and the recovery ability")]
    FillerIsRecovery(AbilityId),
    #[error("recovery ability {0} must have no mana cost and no cooldown")]
    GatedRecovery(AbilityId),
    #[error("maintenance entry {0} has no damage-over-time component")]
    MaintenanceWithoutDot(AbilityId),
    #[error("cooldown entry {0} must be instant and off the global cooldown")]
    BlockingCooldown(AbilityId),
    #[error("{0} has a dot whose duration is not a whole, positive number of tick intervals")]
    InvalidDot(AbilityId),
    #[error("maintenance entries {first} and {second} apply auras that replace each other")]
    ConflictingMaintenance { first: AbilityId, second: AbilityId },
    #[error("global cooldown and regen interval must be positive")]
    InvalidTiming,
    #[error("{0} is not a static buff and cannot be selected")]
    NotAStaticBuff(AuraId),
}

/// A defect in the simulator, never a runtime condition to recover from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("{ability} cast at {time:.4}s while not ready (cooldown {cooldown:.4}s, mana {mana:.1}/{cost:.1})")]
    UnreadyCast {
        ability: AbilityId,
        time: f64,
        cooldown: f64,
        mana: f64,
        cost: f64,
    },
    #[error("{0} is not part of this actor")]
    UnknownAbility(AbilityId),
    #[error("invalid time step {step} at {time:.4}s")]
    InvalidStep { step: f64, time: f64 },
    #[error("mana went negative ({mana}) at {time:.4}s")]
    NegativeMana { mana: f64, time: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("could not start worker pool: {0}")]
    WorkerPool(String),
}
