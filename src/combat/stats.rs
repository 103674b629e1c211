//! Numeric stat totals and the values derived from them.
//!
//! Gear, talents and static buffs are resolved by the caller into a [Stats] value. Auras that are
//! active during a trial add [StatContribution]s on top, composed with the `A * (1 + B) + C`
//! stacking model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::ids::School;

pub const HIT_RATING_PER_PERCENT: f64 = 12.62;
pub const CRIT_RATING_PER_PERCENT: f64 = 22.08;
pub const HASTE_RATING_PER_PERCENT: f64 = 15.77;
/// Spell hit can never exceed this, there is always a 1% chance to miss.
pub const MAX_HIT_CHANCE: f64 = 99.0;
pub const MINIMUM_GCD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatKey {
    SpellPower,
    ShadowPower,
    FirePower,
    AttackPower,
    CritChance,
    CritRating,
    HitChance,
    HitRating,
    HasteRating,
    Mp5,
    ShadowModifier,
    FireModifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
    /// Summed into `B` of `A * (1 + B) + C`.
    Modifier,
    /// Summed into `C`.
    Flat,
}

/// One aura's effect on one stat. The stat's current value is the `A` term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatContribution {
    pub key: StatKey,
    pub stacking: Stacking,
    pub value: f64,
}

impl StatContribution {
    pub const fn flat(key: StatKey, value: f64) -> Self {
        Self {
            key,
            stacking: Stacking::Flat,
            value,
        }
    }

    pub const fn modifier(key: StatKey, value: f64) -> Self {
        Self {
            key,
            stacking: Stacking::Modifier,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Layer {
    modifier: f64,
    flat: f64,
}

/// Resolved stat totals. Chances are percentages (0..=100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub spell_power: f64,
    pub shadow_power: f64,
    pub fire_power: f64,
    pub attack_power: f64,
    pub crit_chance: f64,
    pub crit_rating: f64,
    pub hit_chance: f64,
    pub hit_rating: f64,
    pub haste_rating: f64,
    pub max_mana: f64,
    pub mp5: f64,
    pub shadow_modifier: f64,
    pub fire_modifier: f64,
    /// Target's chance to dodge melee attacks.
    pub enemy_dodge_chance: f64,
    pub glancing_chance: f64,
}

impl Default for Stats {
    /// A level 70 caster in entry raid gear against a level 73 target.
    fn default() -> Self {
        Self {
            spell_power: 1000.0,
            shadow_power: 0.0,
            fire_power: 0.0,
            attack_power: 0.0,
            crit_chance: 1.701,
            crit_rating: 150.0,
            hit_chance: 83.0,
            hit_rating: 120.0,
            haste_rating: 0.0,
            max_mana: 9000.0,
            mp5: 50.0,
            shadow_modifier: 1.0,
            fire_modifier: 1.0,
            enemy_dodge_chance: 6.5,
            glancing_chance: 24.0,
        }
    }
}

impl Stats {
    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::SpellPower => self.spell_power,
            StatKey::ShadowPower => self.shadow_power,
            StatKey::FirePower => self.fire_power,
            StatKey::AttackPower => self.attack_power,
            StatKey::CritChance => self.crit_chance,
            StatKey::CritRating => self.crit_rating,
            StatKey::HitChance => self.hit_chance,
            StatKey::HitRating => self.hit_rating,
            StatKey::HasteRating => self.haste_rating,
            StatKey::Mp5 => self.mp5,
            StatKey::ShadowModifier => self.shadow_modifier,
            StatKey::FireModifier => self.fire_modifier,
        }
    }

    fn set(&mut self, key: StatKey, value: f64) {
        let slot = match key {
            StatKey::SpellPower => &mut self.spell_power,
            StatKey::ShadowPower => &mut self.shadow_power,
            StatKey::FirePower => &mut self.fire_power,
            StatKey::AttackPower => &mut self.attack_power,
            StatKey::CritChance => &mut self.crit_chance,
            StatKey::CritRating => &mut self.crit_rating,
            StatKey::HitChance => &mut self.hit_chance,
            StatKey::HitRating => &mut self.hit_rating,
            StatKey::HasteRating => &mut self.haste_rating,
            StatKey::Mp5 => &mut self.mp5,
            StatKey::ShadowModifier => &mut self.shadow_modifier,
            StatKey::FireModifier => &mut self.fire_modifier,
        };
        *slot = value;
    }

    /// Layers contributions on top of these stats. Only keys that receive a contribution change.
    pub fn with_contributions<'a, I>(&self, contributions: I) -> Stats
    where
        I: IntoIterator<Item = &'a StatContribution>,
    {
        let mut layers: BTreeMap<StatKey, Layer> = BTreeMap::new();
        for contribution in contributions {
            let layer = layers.entry(contribution.key).or_default();
            match contribution.stacking {
                Stacking::Modifier => layer.modifier += contribution.value,
                Stacking::Flat => layer.flat += contribution.value,
            }
        }
        let mut out = *self;
        for (key, layer) in layers {
            out.set(key, self.get(key) * (1.0 + layer.modifier) + layer.flat);
        }
        out
    }

    /// Damage power for a school. Physical scales with attack power.
    pub fn power_for(&self, school: School) -> f64 {
        match school {
            School::Shadow => self.spell_power + self.shadow_power,
            School::Fire => self.spell_power + self.fire_power,
            School::Physical => self.attack_power,
            School::None => self.spell_power,
        }
    }

    pub fn school_modifier(&self, school: School) -> f64 {
        match school {
            School::Shadow => self.shadow_modifier,
            School::Fire => self.fire_modifier,
            School::Physical | School::None => 1.0,
        }
    }

    pub fn total_crit_chance(&self) -> f64 {
        self.crit_chance + self.crit_rating / CRIT_RATING_PER_PERCENT
    }

    pub fn total_hit_chance(&self) -> f64 {
        (self.hit_chance + self.hit_rating / HIT_RATING_PER_PERCENT).min(MAX_HIT_CHANCE)
    }

    pub fn haste_multiplier(&self) -> f64 {
        1.0 + self.haste_rating / HASTE_RATING_PER_PERCENT / 100.0
    }

    /// Hasted global cooldown, rounded to four decimals and never below [MINIMUM_GCD].
    pub fn gcd(&self, base_gcd: f64) -> f64 {
        let hasted = ((base_gcd / self.haste_multiplier()) * 10_000.0).round() / 10_000.0;
        hasted.max(MINIMUM_GCD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributions_only_touch_their_keys() {
        let base = Stats::default();
        let boosted = base.with_contributions(&[
            StatContribution::flat(StatKey::SpellPower, 120.0),
            StatContribution::modifier(StatKey::ShadowModifier, 0.2),
        ]);
        assert_eq!(boosted.spell_power, base.spell_power + 120.0);
        assert!((boosted.shadow_modifier - 1.2).abs() < 1e-12);
        assert_eq!(boosted.fire_modifier, base.fire_modifier);
        assert_eq!(boosted.max_mana, base.max_mana);
    }

    #[test]
    fn modifiers_scale_the_base_before_flat_bonuses() {
        let base = Stats {
            spell_power: 100.0,
            ..Stats::default()
        };
        let stacked = base.with_contributions(&[
            StatContribution::modifier(StatKey::SpellPower, 0.1),
            StatContribution::modifier(StatKey::SpellPower, 0.1),
            StatContribution::flat(StatKey::SpellPower, 5.0),
        ]);
        assert!((stacked.spell_power - 125.0).abs() < 1e-12);
    }

    #[test]
    fn hit_chance_is_capped() {
        let stats = Stats {
            hit_chance: 95.0,
            hit_rating: 500.0,
            ..Stats::default()
        };
        assert_eq!(stats.total_hit_chance(), MAX_HIT_CHANCE);
    }

    #[test]
    fn gcd_scales_with_haste_and_respects_floor() {
        let plain = Stats {
            haste_rating: 0.0,
            ..Stats::default()
        };
        assert_eq!(plain.gcd(1.5), 1.5);

        let hasted = Stats {
            haste_rating: 157.7,
            ..Stats::default()
        };
        assert!((hasted.gcd(1.5) - 1.3636).abs() < 1e-9);

        let extreme = Stats {
            haste_rating: 5000.0,
            ..Stats::default()
        };
        assert_eq!(extreme.gcd(1.5), MINIMUM_GCD);
    }

    #[test]
    fn power_depends_on_school() {
        let stats = Stats {
            spell_power: 100.0,
            shadow_power: 20.0,
            fire_power: 5.0,
            attack_power: 900.0,
            ..Stats::default()
        };
        assert_eq!(stats.power_for(School::Shadow), 120.0);
        assert_eq!(stats.power_for(School::Fire), 105.0);
        assert_eq!(stats.power_for(School::Physical), 900.0);
    }
}
