pub mod ability;
pub mod actor;
pub mod aura;
pub mod ids;
pub mod rng;
pub mod rotation;
pub mod stats;
pub mod timer;
pub mod trace;

pub use ability::{
    Ability, AbilityCounters, AbilitySpec, DotSpec, ManaGain, Outcome, CRIT_MULTIPLIER,
    GLANCING_MULTIPLIER,
};
pub use actor::{Actor, ActorConfig, DEFAULT_GCD, DEFAULT_REGEN_INTERVAL};
pub use aura::{resolve_selection, Aura, AuraSet, AuraSpec, CategoryIndex};
pub use ids::{AbilityId, AttackKind, AuraCategory, AuraId, School};
pub use trace::{CombatLog, CombatLogEntry, TraceMode};
pub use rng::{stream_seed, Rng};
pub use rotation::{choose_action, RotationConfig, RotationView};
pub use stats::{Stacking, StatContribution, StatKey, Stats};
pub use timer::{EPSILON, MIN_STEP};
