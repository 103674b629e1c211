//! Per-trial results, the mergeable [AggregateReport] and the final [SimulationReport].

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::combat::ability::AbilityCounters;
use crate::combat::actor::Actor;
use crate::combat::ids::{AbilityId, AttackKind, AuraId};
use crate::combat::trace::CombatLogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialResult {
    pub damage: f64,
    pub fight_length: f64,
    pub dps: f64,
}

impl TrialResult {
    pub fn new(damage: f64, fight_length: f64) -> Self {
        let dps = if fight_length > 0.0 {
            damage / fight_length
        } else {
            0.0
        };
        Self {
            damage,
            fight_length,
            dps,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AuraTotals {
    pub count: u64,
    pub uptime: f64,
}

/// Running totals over completed trials. Two reports over disjoint trials merge into one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    pub trials: u64,
    pub total_damage: f64,
    pub total_duration: f64,
    pub min_dps: Option<f64>,
    pub max_dps: Option<f64>,
    pub regen_mana: f64,
    pub abilities: BTreeMap<AbilityId, AbilityCounters>,
    /// Attack kind each ability actually ran with, overrides included.
    pub kinds: BTreeMap<AbilityId, AttackKind>,
    pub auras: BTreeMap<AuraId, AuraTotals>,
    pub cancelled: bool,
}

impl AggregateReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one finished trial together with the actor's per-ability and per-aura counters.
    pub fn record_trial(&mut self, result: &TrialResult, actor: &Actor) {
        self.trials += 1;
        self.total_damage += result.damage;
        self.total_duration += result.fight_length;
        self.min_dps = Some(self.min_dps.map_or(result.dps, |min| min.min(result.dps)));
        self.max_dps = Some(self.max_dps.map_or(result.dps, |max| max.max(result.dps)));
        self.regen_mana += actor.regen_mana();

        for ability in actor.abilities() {
            self.abilities
                .entry(ability.id)
                .or_default()
                .absorb(&ability.counters);
            self.kinds.insert(ability.id, ability.spec.kind);
        }
        for aura in actor.auras().iter() {
            let totals = self.auras.entry(aura.id).or_default();
            totals.count += u64::from(aura.count);
            totals.uptime += aura.uptime;
        }
    }

    pub fn merge(&mut self, other: &AggregateReport) {
        self.trials += other.trials;
        self.total_damage += other.total_damage;
        self.total_duration += other.total_duration;
        self.min_dps = merge_extreme(self.min_dps, other.min_dps, f64::min);
        self.max_dps = merge_extreme(self.max_dps, other.max_dps, f64::max);
        self.regen_mana += other.regen_mana;
        for (id, counters) in &other.abilities {
            self.abilities.entry(*id).or_default().absorb(counters);
        }
        self.kinds.extend(other.kinds.iter().map(|(id, kind)| (*id, *kind)));
        for (id, totals) in &other.auras {
            let entry = self.auras.entry(*id).or_default();
            entry.count += totals.count;
            entry.uptime += totals.uptime;
        }
        self.cancelled |= other.cancelled;
    }

    /// Damage over all trials divided by time over all trials.
    pub fn avg_dps(&self) -> f64 {
        if self.total_duration > 0.0 {
            self.total_damage / self.total_duration
        } else {
            0.0
        }
    }

    pub fn total_mana_gained(&self) -> f64 {
        self.regen_mana
            + self
                .abilities
                .values()
                .map(|counters| counters.mana_gain)
                .sum::<f64>()
    }
}

fn merge_extreme(a: Option<f64>, b: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a percentage with two decimals; zero when `whole` is zero.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole * 10_000.0).round() / 100.0
    } else {
        0.0
    }
}

fn per_trial(total: f64, trials: u64) -> f64 {
    if trials == 0 {
        0.0
    } else {
        total / trials as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityBreakdown {
    pub ability: AbilityId,
    pub name: &'static str,
    pub casts_per_trial: f64,
    pub avg_damage_per_cast: f64,
    pub crit_percent: f64,
    pub miss_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dodge_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glancing_percent: Option<f64>,
    pub damage_percent: f64,
    pub mana_percent: f64,
    pub dps: f64,
    pub damage: f64,
    pub dot_damage: f64,
    pub mana_gain: f64,
}

impl AbilityBreakdown {
    fn from_counters(id: AbilityId, counters: &AbilityCounters, totals: &AggregateReport) -> Self {
        let casts = counters.casts as f64;
        let melee = totals.kinds.get(&id) == Some(&AttackKind::Melee);
        Self {
            ability: id,
            name: id.name(),
            casts_per_trial: round2(per_trial(casts, totals.trials)),
            avg_damage_per_cast: if counters.casts == 0 {
                0.0
            } else {
                round2(counters.damage / casts)
            },
            crit_percent: percentage(counters.crits as f64, casts),
            miss_percent: percentage(counters.misses as f64, casts),
            dodge_percent: melee.then(|| percentage(counters.dodges as f64, casts)),
            glancing_percent: melee.then(|| percentage(counters.glancing as f64, casts)),
            damage_percent: percentage(counters.damage, totals.total_damage),
            mana_percent: percentage(counters.mana_gain, totals.total_mana_gained()),
            dps: if totals.total_duration > 0.0 {
                round2(counters.damage / totals.total_duration)
            } else {
                0.0
            },
            damage: counters.damage,
            dot_damage: counters.dot_damage,
            mana_gain: counters.mana_gain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuraBreakdown {
    pub aura: AuraId,
    pub name: &'static str,
    pub count_per_trial: f64,
    pub uptime_percent: f64,
}

/// Finalized view of a run, rounded for presentation. [SimulationReport::totals] keeps the raw
/// sums for comparisons and further merging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub avg_dps: f64,
    pub min_dps: f64,
    pub max_dps: f64,
    pub trials_completed: u64,
    pub cancelled: bool,
    pub seed: u64,
    pub run_duration_secs: f64,
    pub avg_fight_length: f64,
    pub regen_mana_per_trial: f64,
    pub regen_mana_percent: f64,
    pub abilities: Vec<AbilityBreakdown>,
    pub auras: Vec<AuraBreakdown>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub combat_log: Vec<CombatLogEntry>,
    #[serde(skip)]
    pub totals: AggregateReport,
}

impl SimulationReport {
    pub fn finalize(
        totals: AggregateReport,
        seed: u64,
        run_duration: Duration,
        combat_log: Vec<CombatLogEntry>,
    ) -> Self {
        let mut abilities: Vec<AbilityBreakdown> = totals
            .abilities
            .iter()
            .filter(|(_, counters)| {
                counters.casts > 0 || counters.damage > 0.0 || counters.mana_gain > 0.0
            })
            .map(|(id, counters)| AbilityBreakdown::from_counters(*id, counters, &totals))
            .collect();
        abilities.sort_by(|a, b| b.damage.total_cmp(&a.damage));

        let auras = totals
            .auras
            .iter()
            .filter(|(_, aura)| aura.count > 0)
            .map(|(id, aura)| AuraBreakdown {
                aura: *id,
                name: id.name(),
                count_per_trial: round2(per_trial(aura.count as f64, totals.trials)),
                uptime_percent: percentage(aura.uptime, totals.total_duration),
            })
            .collect();

        Self {
            avg_dps: round2(totals.avg_dps()),
            min_dps: round2(totals.min_dps.unwrap_or(0.0)),
            max_dps: round2(totals.max_dps.unwrap_or(0.0)),
            trials_completed: totals.trials,
            cancelled: totals.cancelled,
            seed,
            run_duration_secs: run_duration.as_secs_f64(),
            avg_fight_length: round2(per_trial(totals.total_duration, totals.trials)),
            regen_mana_per_trial: round2(per_trial(totals.regen_mana, totals.trials)),
            regen_mana_percent: percentage(totals.regen_mana, totals.total_mana_gained()),
            abilities,
            auras,
            combat_log,
            totals,
        }
    }

    pub fn ability(&self, id: AbilityId) -> Option<&AbilityBreakdown> {
        self.abilities.iter().find(|row| row.ability == id)
    }
}
