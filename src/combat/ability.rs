//! Castable actions: static [AbilitySpec]s plus the per-trial [Ability] state built from them.

use serde::{Deserialize, Serialize};

use crate::combat::aura::Aura;
use crate::combat::ids::{AbilityId, AttackKind, AuraId, School};
use crate::combat::rng::Rng;
use crate::combat::stats::Stats;
use crate::combat::timer::{decay, is_expired, EPSILON};

pub const CRIT_MULTIPLIER: f64 = 2.0;
pub const GLANCING_MULTIPLIER: f64 = 0.75;

/// Damage-over-time component. Damage is the total over the full duration before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotSpec {
    pub aura: AuraId,
    pub duration: f64,
    pub tick_interval: f64,
    pub damage: f64,
    #[serde(default)]
    pub coefficient: f64,
}

impl DotSpec {
    pub fn tick_count(&self) -> f64 {
        (self.duration / self.tick_interval).round().max(1.0)
    }

    /// The aura ticks `floor(duration / tick_interval)` times, so only a duration that is a
    /// whole, non-zero number of intervals pays out the full damage.
    pub fn has_whole_ticks(&self) -> bool {
        if !(self.duration.is_finite() && self.tick_interval.is_finite()) {
            return false;
        }
        if self.duration <= 0.0 || self.tick_interval <= 0.0 {
            return false;
        }
        let ticks = self.duration / self.tick_interval;
        ticks >= 1.0 - EPSILON && (ticks - ticks.round()).abs() <= EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManaGain {
    /// `base + coefficient * power`
    Scaling { base: f64, coefficient: f64 },
    /// Uniform integer amount, inclusive.
    Range { min: u32, max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitySpec {
    pub school: School,
    pub kind: AttackKind,
    pub cast_time: f64,
    pub cooldown: f64,
    pub mana_cost: f64,
    pub base_damage: f64,
    pub coefficient: f64,
    pub can_crit: bool,
    pub can_miss: bool,
    pub on_gcd: bool,
    pub mana_gain: Option<ManaGain>,
    pub dot: Option<DotSpec>,
    pub applies_aura: Option<AuraId>,
}

impl Default for AbilitySpec {
    fn default() -> Self {
        Self {
            school: School::Shadow,
            kind: AttackKind::Spell,
            cast_time: 0.0,
            cooldown: 0.0,
            mana_cost: 0.0,
            base_damage: 0.0,
            coefficient: 0.0,
            can_crit: true,
            can_miss: true,
            on_gcd: true,
            mana_gain: None,
            dot: None,
            applies_aura: None,
        }
    }
}

impl AbilitySpec {
    fn dot_spell(school: School, cast_time: f64, mana_cost: f64, dot: DotSpec) -> Self {
        Self {
            school,
            cast_time,
            mana_cost,
            can_crit: false,
            dot: Some(dot),
            ..Self::default()
        }
    }

    fn consumable() -> Self {
        Self {
            school: School::None,
            kind: AttackKind::Utility,
            cooldown: 120.0,
            can_crit: false,
            can_miss: false,
            on_gcd: false,
            ..Self::default()
        }
    }

    /// Rank-max values for a level 70 character. Callers may override any entry.
    pub fn catalog(id: AbilityId) -> Self {
        match id {
            AbilityId::ShadowBolt => Self {
                cast_time: 2.5,
                mana_cost: 420.0,
                base_damage: 575.5,
                coefficient: 0.8571,
                ..Self::default()
            },
            AbilityId::Incinerate => Self {
                school: School::Fire,
                cast_time: 2.5,
                mana_cost: 355.0,
                base_damage: 479.0,
                coefficient: 0.7143,
                ..Self::default()
            },
            AbilityId::SearingPain => Self {
                school: School::Fire,
                cast_time: 1.5,
                mana_cost: 205.0,
                base_damage: 295.0,
                coefficient: 0.4286,
                ..Self::default()
            },
            AbilityId::Shadowburn => Self {
                cooldown: 15.0,
                mana_cost: 515.0,
                base_damage: 631.0,
                coefficient: 0.4286,
                ..Self::default()
            },
            AbilityId::Corruption => Self::dot_spell(
                School::Shadow,
                0.0,
                370.0,
                DotSpec {
                    aura: AuraId::Corruption,
                    duration: 18.0,
                    tick_interval: 3.0,
                    damage: 900.0,
                    coefficient: 0.936,
                },
            ),
            AbilityId::UnstableAffliction => Self::dot_spell(
                School::Shadow,
                1.5,
                400.0,
                DotSpec {
                    aura: AuraId::UnstableAffliction,
                    duration: 18.0,
                    tick_interval: 3.0,
                    damage: 1050.0,
                    coefficient: 1.2,
                },
            ),
            AbilityId::SiphonLife => Self::dot_spell(
                School::Shadow,
                0.0,
                410.0,
                DotSpec {
                    aura: AuraId::SiphonLife,
                    duration: 30.0,
                    tick_interval: 3.0,
                    damage: 630.0,
                    coefficient: 1.0,
                },
            ),
            AbilityId::Immolate => Self {
                base_damage: 332.0,
                coefficient: 0.2,
                can_crit: true,
                ..Self::dot_spell(
                    School::Fire,
                    2.0,
                    445.0,
                    DotSpec {
                        aura: AuraId::Immolate,
                        duration: 15.0,
                        tick_interval: 3.0,
                        damage: 615.0,
                        coefficient: 0.65,
                    },
                )
            },
            AbilityId::CurseOfAgony => Self::dot_spell(
                School::Shadow,
                0.0,
                265.0,
                DotSpec {
                    aura: AuraId::CurseOfAgony,
                    duration: 24.0,
                    tick_interval: 2.0,
                    damage: 1356.0,
                    coefficient: 1.2,
                },
            ),
            AbilityId::CurseOfDoom => Self {
                cooldown: 60.0,
                ..Self::dot_spell(
                    School::Shadow,
                    0.0,
                    380.0,
                    DotSpec {
                        aura: AuraId::CurseOfDoom,
                        duration: 60.0,
                        tick_interval: 60.0,
                        damage: 4200.0,
                        coefficient: 2.0,
                    },
                )
            },
            AbilityId::LifeTap => Self {
                kind: AttackKind::Utility,
                can_crit: false,
                can_miss: false,
                mana_gain: Some(ManaGain::Scaling {
                    base: 582.0,
                    coefficient: 0.8,
                }),
                ..Self::default()
            },
            AbilityId::DestructionPotion => Self {
                applies_aura: Some(AuraId::DestructionPotion),
                ..Self::consumable()
            },
            AbilityId::SuperManaPotion => Self {
                mana_gain: Some(ManaGain::Range {
                    min: 1800,
                    max: 3000,
                }),
                ..Self::consumable()
            },
            AbilityId::Melee => Self {
                school: School::Physical,
                kind: AttackKind::Melee,
                base_damage: 150.0,
                coefficient: 2.0 / 14.0,
                ..Self::default()
            },
        }
    }

    /// Largest mana amount this ability can restore.
    pub fn max_mana_gain(&self, stats: &Stats) -> f64 {
        match self.mana_gain {
            Some(ManaGain::Scaling { base, coefficient }) => {
                base + coefficient * stats.power_for(self.school)
            }
            Some(ManaGain::Range { max, .. }) => f64::from(max),
            None => 0.0,
        }
    }
}

/// Hit table result of one cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Crit,
    Glancing,
    Miss,
    Dodge,
}

impl Outcome {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Hit => 1.0,
            Self::Crit => CRIT_MULTIPLIER,
            Self::Glancing => GLANCING_MULTIPLIER,
            Self::Miss | Self::Dodge => 0.0,
        }
    }

    pub fn landed(self) -> bool {
        !matches!(self, Self::Miss | Self::Dodge)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hit => "hits",
            Self::Crit => "crits",
            Self::Glancing => "glances",
            Self::Miss => "misses",
            Self::Dodge => "is dodged",
        }
    }
}

/// Cumulative per-trial counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AbilityCounters {
    pub casts: u64,
    pub crits: u64,
    pub misses: u64,
    pub dodges: u64,
    pub glancing: u64,
    pub damage: f64,
    pub dot_damage: f64,
    pub mana_gain: f64,
}

impl AbilityCounters {
    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.casts += 1;
        match outcome {
            Outcome::Crit => self.crits += 1,
            Outcome::Miss => self.misses += 1,
            Outcome::Dodge => self.dodges += 1,
            Outcome::Glancing => self.glancing += 1,
            Outcome::Hit => {}
        }
    }

    pub fn absorb(&mut self, other: &Self) {
        self.casts += other.casts;
        self.crits += other.crits;
        self.misses += other.misses;
        self.dodges += other.dodges;
        self.glancing += other.glancing;
        self.damage += other.damage;
        self.dot_damage += other.dot_damage;
        self.mana_gain += other.mana_gain;
    }
}

#[derive(Debug, Clone)]
pub struct Ability {
    pub id: AbilityId,
    pub spec: AbilitySpec,
    cooldown_remaining: f64,
    dot_tick_damage: f64,
    pub counters: AbilityCounters,
}

impl Ability {
    pub fn new(id: AbilityId, spec: AbilitySpec) -> Self {
        Self {
            id,
            spec,
            cooldown_remaining: 0.0,
            dot_tick_damage: 0.0,
            counters: AbilityCounters::default(),
        }
    }

    pub fn reset(&mut self) {
        self.cooldown_remaining = 0.0;
        self.dot_tick_damage = 0.0;
        self.counters = AbilityCounters::default();
    }

    pub fn cooldown_remaining(&self) -> f64 {
        self.cooldown_remaining
    }

    /// Off cooldown and affordable.
    pub fn is_ready(&self, mana: f64) -> bool {
        is_expired(self.cooldown_remaining) && mana >= self.spec.mana_cost
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_remaining = self.spec.cooldown;
    }

    /// Rolls the hit table. Consumes draws in the documented order: hit, dodge, crit, glancing.
    pub fn roll_outcome(&self, stats: &Stats, rng: &mut Rng) -> Outcome {
        let melee = self.spec.kind == AttackKind::Melee;
        if self.spec.kind == AttackKind::Utility {
            return Outcome::Hit;
        }
        if self.spec.can_miss && !rng.roll_percent(stats.total_hit_chance()) {
            return Outcome::Miss;
        }
        if melee && rng.roll_percent(stats.enemy_dodge_chance) {
            return Outcome::Dodge;
        }
        if self.spec.can_crit && rng.roll_percent(stats.total_crit_chance()) {
            return Outcome::Crit;
        }
        if melee && rng.roll_percent(stats.glancing_chance) {
            return Outcome::Glancing;
        }
        Outcome::Hit
    }

    pub fn direct_damage(&self, stats: &Stats, outcome: Outcome) -> f64 {
        let school = self.spec.school;
        let raw = self.spec.base_damage + self.spec.coefficient * stats.power_for(school);
        raw * stats.school_modifier(school) * outcome.multiplier()
    }

    /// Locks in per-tick damage from the stats at application time.
    pub fn snapshot_dot(&mut self, stats: &Stats) {
        if let Some(dot) = self.spec.dot {
            let school = self.spec.school;
            let total = dot.damage + dot.coefficient * stats.power_for(school);
            self.dot_tick_damage = total * stats.school_modifier(school) / dot.tick_count();
        }
    }

    pub fn dot_tick_damage(&self) -> f64 {
        self.dot_tick_damage
    }

    /// Advances cooldowns and pays out a dot tick when the linked aura ticks during this step.
    pub fn tick(&mut self, elapsed: f64, dot_aura: Option<&Aura>) -> f64 {
        self.cooldown_remaining = decay(self.cooldown_remaining, elapsed);
        match dot_aura {
            Some(aura) if aura.tick_due(elapsed) => {
                let damage = self.dot_tick_damage;
                self.counters.damage += damage;
                self.counters.dot_damage += damage;
                damage
            }
            _ => 0.0,
        }
    }
}
