//! Timed buffs and debuffs.
//!
//! An [Aura] is either permanent for the whole fight (selected consumables), a plain timed effect
//! (potions, Improved Shadow Bolt) or a periodic effect whose ticks are paid out by the ability
//! that applied it. Exclusivity between auras is driven by [AuraCategory] tags through an explicit
//! [CategoryIndex].

use std::collections::BTreeMap;

use crate::combat::ids::{AbilityId, AuraCategory, AuraId};
use crate::combat::stats::{StatContribution, StatKey};
use crate::combat::timer::{decay, is_expired, EPSILON};

const NO_CATEGORIES: &[AuraCategory] = &[];
const CURSE: &[AuraCategory] = &[AuraCategory::Curse];
const BATTLE_ELIXIR: &[AuraCategory] = &[AuraCategory::BattleElixir];
const GUARDIAN_ELIXIR: &[AuraCategory] = &[AuraCategory::GuardianElixir];
const FLASK: &[AuraCategory] = &[AuraCategory::BattleElixir, AuraCategory::GuardianElixir];
const FOOD: &[AuraCategory] = &[AuraCategory::Food];
const WEAPON_OIL: &[AuraCategory] = &[AuraCategory::WeaponOil];
const POTION: &[AuraCategory] = &[AuraCategory::Potion];

const DESTRUCTION_POTION_STATS: &[StatContribution] = &[
    StatContribution::flat(StatKey::SpellPower, 120.0),
    StatContribution::flat(StatKey::CritChance, 2.0),
];
const IMPROVED_SHADOW_BOLT_STATS: &[StatContribution] =
    &[StatContribution::modifier(StatKey::ShadowModifier, 0.2)];
const FLASK_OF_PURE_DEATH_STATS: &[StatContribution] = &[
    StatContribution::flat(StatKey::ShadowPower, 80.0),
    StatContribution::flat(StatKey::FirePower, 80.0),
];
const MAJOR_SHADOW_POWER_STATS: &[StatContribution] =
    &[StatContribution::flat(StatKey::ShadowPower, 55.0)];
const MAJOR_FIREPOWER_STATS: &[StatContribution] =
    &[StatContribution::flat(StatKey::FirePower, 55.0)];
const ADEPTS_ELIXIR_STATS: &[StatContribution] = &[
    StatContribution::flat(StatKey::SpellPower, 24.0),
    StatContribution::flat(StatKey::CritRating, 24.0),
];
const MAJOR_MAGEBLOOD_STATS: &[StatContribution] = &[StatContribution::flat(StatKey::Mp5, 16.0)];
const SUPERIOR_WIZARD_OIL_STATS: &[StatContribution] =
    &[StatContribution::flat(StatKey::SpellPower, 42.0)];
const BRILLIANT_WIZARD_OIL_STATS: &[StatContribution] = &[
    StatContribution::flat(StatKey::SpellPower, 36.0),
    StatContribution::flat(StatKey::CritRating, 14.0),
];
const BLACKENED_BASILISK_STATS: &[StatContribution] =
    &[StatContribution::flat(StatKey::SpellPower, 23.0)];
const SKULLFISH_SOUP_STATS: &[StatContribution] =
    &[StatContribution::flat(StatKey::CritRating, 20.0)];

/// Static description of an aura.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuraSpec {
    /// `None` lasts for the whole fight once applied.
    pub duration: Option<f64>,
    pub tick_interval: Option<f64>,
    pub categories: &'static [AuraCategory],
    pub stats: &'static [StatContribution],
    /// Consumed by direct shadow damage; the aura fades when the last one is used.
    pub charges: Option<u32>,
}

impl AuraSpec {
    const fn timed(duration: f64, categories: &'static [AuraCategory]) -> Self {
        Self {
            duration: Some(duration),
            tick_interval: None,
            categories,
            stats: &[],
            charges: None,
        }
    }

    const fn periodic(duration: f64, tick_interval: f64, categories: &'static [AuraCategory]) -> Self {
        Self {
            duration: Some(duration),
            tick_interval: Some(tick_interval),
            categories,
            stats: &[],
            charges: None,
        }
    }

    const fn permanent(categories: &'static [AuraCategory], stats: &'static [StatContribution]) -> Self {
        Self {
            duration: None,
            tick_interval: None,
            categories,
            stats,
            charges: None,
        }
    }

    /// Default description for each aura. Periodic timings are replaced by the applying ability's
    /// dot timings when an actor is built.
    pub const fn catalog(id: AuraId) -> Self {
        match id {
            AuraId::Corruption => Self::periodic(18.0, 3.0, NO_CATEGORIES),
            AuraId::UnstableAffliction => Self::periodic(18.0, 3.0, NO_CATEGORIES),
            AuraId::SiphonLife => Self::periodic(30.0, 3.0, NO_CATEGORIES),
            AuraId::Immolate => Self::periodic(15.0, 3.0, NO_CATEGORIES),
            AuraId::CurseOfAgony => Self::periodic(24.0, 2.0, CURSE),
            AuraId::CurseOfDoom => Self::periodic(60.0, 60.0, CURSE),
            AuraId::ImprovedShadowBolt => Self {
                stats: IMPROVED_SHADOW_BOLT_STATS,
                charges: Some(4),
                ..Self::timed(12.0, NO_CATEGORIES)
            },
            AuraId::DestructionPotion => Self {
                stats: DESTRUCTION_POTION_STATS,
                ..Self::timed(15.0, POTION)
            },
            AuraId::FlaskOfPureDeath => Self::permanent(FLASK, FLASK_OF_PURE_DEATH_STATS),
            AuraId::ElixirOfMajorShadowPower => {
                Self::permanent(BATTLE_ELIXIR, MAJOR_SHADOW_POWER_STATS)
            }
            AuraId::ElixirOfMajorFirepower => Self::permanent(BATTLE_ELIXIR, MAJOR_FIREPOWER_STATS),
            AuraId::AdeptsElixir => Self::permanent(BATTLE_ELIXIR, ADEPTS_ELIXIR_STATS),
            AuraId::ElixirOfMajorMageblood => {
                Self::permanent(GUARDIAN_ELIXIR, MAJOR_MAGEBLOOD_STATS)
            }
            AuraId::SuperiorWizardOil => Self::permanent(WEAPON_OIL, SUPERIOR_WIZARD_OIL_STATS),
            AuraId::BrilliantWizardOil => Self::permanent(WEAPON_OIL, BRILLIANT_WIZARD_OIL_STATS),
            AuraId::BlackenedBasilisk => Self::permanent(FOOD, BLACKENED_BASILISK_STATS),
            AuraId::SkullfishSoup => Self::permanent(FOOD, SKULLFISH_SOUP_STATS),
        }
    }

    pub fn with_periodic(self, duration: f64, tick_interval: f64) -> Self {
        Self {
            duration: Some(duration),
            tick_interval: Some(tick_interval),
            ..self
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }
}

/// What happened to an aura during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuraTick {
    pub faded: bool,
}

#[derive(Debug, Clone)]
pub struct Aura {
    pub id: AuraId,
    pub spec: AuraSpec,
    active: bool,
    duration_remaining: f64,
    tick_timer_remaining: f64,
    charges: u32,
    source: Option<AbilityId>,
    /// Applications (including refreshes) this trial.
    pub count: u32,
    /// Seconds active this trial, bounded by the fight length.
    pub uptime: f64,
}

impl Aura {
    pub fn new(id: AuraId, spec: AuraSpec) -> Self {
        Self {
            id,
            spec,
            active: false,
            duration_remaining: 0.0,
            tick_timer_remaining: 0.0,
            charges: 0,
            source: None,
            count: 0,
            uptime: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.duration_remaining = 0.0;
        self.tick_timer_remaining = 0.0;
        self.charges = 0;
        self.source = None;
        self.count = 0;
        self.uptime = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn duration_remaining(&self) -> f64 {
        self.duration_remaining
    }

    pub fn tick_timer_remaining(&self) -> f64 {
        self.tick_timer_remaining
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    /// Ability that applied the current instance; `None` for static buffs and inactive auras.
    pub fn source(&self) -> Option<AbilityId> {
        self.source
    }

    /// Activates or refreshes the aura with its full duration.
    pub fn apply(&mut self) {
        self.active = true;
        self.duration_remaining = self.spec.duration.unwrap_or(0.0);
        self.tick_timer_remaining = self.spec.tick_interval.unwrap_or(0.0);
        self.charges = self.spec.charges.unwrap_or(0);
        self.count += 1;
    }

    pub fn fade(&mut self) {
        self.active = false;
        self.duration_remaining = 0.0;
        self.tick_timer_remaining = 0.0;
        self.charges = 0;
        self.source = None;
    }

    /// Whether a periodic tick lands within the next `elapsed` seconds.
    pub fn tick_due(&self, elapsed: f64) -> bool {
        self.active && self.spec.tick_interval.is_some() && self.tick_timer_remaining <= elapsed + EPSILON
    }

    /// Timers that bound the next time step while the aura is active.
    pub fn pending_timers(&self) -> impl Iterator<Item = f64> {
        let duration = (self.active && !self.spec.is_permanent()).then_some(self.duration_remaining);
        let tick = (self.active && self.spec.tick_interval.is_some()).then_some(self.tick_timer_remaining);
        duration.into_iter().chain(tick)
    }

    /// Advances the aura by `elapsed`; `in_fight` is the part of that step before the fight ended.
    pub fn tick(&mut self, elapsed: f64, in_fight: f64) -> AuraTick {
        if !self.active {
            return AuraTick::default();
        }
        let counted = match self.spec.duration {
            Some(_) => in_fight.min(self.duration_remaining),
            None => in_fight,
        };
        self.uptime += counted.max(0.0);

        if let Some(interval) = self.spec.tick_interval {
            let timer = decay(self.tick_timer_remaining, elapsed);
            self.tick_timer_remaining = if is_expired(timer) { interval } else { timer };
        }

        if self.spec.is_permanent() {
            return AuraTick::default();
        }
        self.duration_remaining = decay(self.duration_remaining, elapsed);
        if is_expired(self.duration_remaining) {
            self.fade();
            return AuraTick { faded: true };
        }
        AuraTick::default()
    }

    /// Uses one charge. Returns true when that was the last one and the aura faded.
    pub fn consume_charge(&mut self) -> bool {
        if !self.active || self.spec.charges.is_none() {
            return false;
        }
        self.charges = self.charges.saturating_sub(1);
        if self.charges == 0 {
            self.fade();
            return true;
        }
        false
    }
}

/// Category → member auras, built once.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    members: BTreeMap<AuraCategory, Vec<AuraId>>,
}

impl CategoryIndex {
    pub fn build<I>(auras: I) -> Self
    where
        I: IntoIterator<Item = (AuraId, &'static [AuraCategory])>,
    {
        let mut members: BTreeMap<AuraCategory, Vec<AuraId>> = BTreeMap::new();
        for (id, categories) in auras {
            for category in categories {
                let entry = members.entry(*category).or_default();
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
        }
        Self { members }
    }

    /// Every other aura sharing at least one category with `id`.
    pub fn rivals(&self, id: AuraId) -> Vec<AuraId> {
        let mut rivals = Vec::new();
        for category in AuraSpec::catalog(id).categories {
            if let Some(members) = self.members.get(category) {
                for member in members {
                    if *member != id && !rivals.contains(member) {
                        rivals.push(*member);
                    }
                }
            }
        }
        rivals
    }

    pub fn members(&self, category: AuraCategory) -> &[AuraId] {
        self.members.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Resolves a selection of static buffs: a later pick replaces earlier picks it conflicts with.
pub fn resolve_selection(selected: &[AuraId]) -> Vec<AuraId> {
    let index = CategoryIndex::build(
        selected
            .iter()
            .map(|id| (*id, AuraSpec::catalog(*id).categories)),
    );
    let mut kept: Vec<AuraId> = Vec::with_capacity(selected.len());
    for id in selected {
        let rivals = index.rivals(*id);
        kept.retain(|existing| existing != id && !rivals.contains(existing));
        kept.push(*id);
    }
    kept
}

/// All auras an actor can carry, keyed by id, with the exclusivity index over them.
#[derive(Debug, Clone, Default)]
pub struct AuraSet {
    auras: BTreeMap<AuraId, Aura>,
    index: CategoryIndex,
}

impl AuraSet {
    pub fn new(auras: Vec<Aura>) -> Self {
        let index = CategoryIndex::build(auras.iter().map(|aura| (aura.id, aura.spec.categories)));
        Self {
            auras: auras.into_iter().map(|aura| (aura.id, aura)).collect(),
            index,
        }
    }

    pub fn get(&self, id: AuraId) -> Option<&Aura> {
        self.auras.get(&id)
    }

    pub fn get_mut(&mut self, id: AuraId) -> Option<&mut Aura> {
        self.auras.get_mut(&id)
    }

    pub fn is_active(&self, id: AuraId) -> bool {
        self.auras.get(&id).is_some_and(Aura::is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aura> {
        self.auras.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Aura> {
        self.auras.values_mut()
    }

    pub fn reset(&mut self) {
        for aura in self.auras.values_mut() {
            aura.reset();
        }
    }

    /// Applies `id` on behalf of `source`, fading every active aura that shares a category with it.
    /// Returns the auras that were displaced.
    pub fn activate(&mut self, id: AuraId, source: Option<AbilityId>) -> Vec<AuraId> {
        if !self.auras.contains_key(&id) {
            return Vec::new();
        }
        let mut displaced = Vec::new();
        for rival in self.index.rivals(id) {
            if let Some(aura) = self.auras.get_mut(&rival) {
                if aura.is_active() {
                    aura.fade();
                    displaced.push(rival);
                }
            }
        }
        if let Some(aura) = self.auras.get_mut(&id) {
            aura.apply();
            aura.source = source;
        }
        displaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(duration: f64, interval: f64) -> Aura {
        Aura::new(
            AuraId::Corruption,
            AuraSpec::catalog(AuraId::Corruption).with_periodic(duration, interval),
        )
    }

    #[test]
    fn periodic_aura_ticks_and_fades_on_schedule() {
        let mut aura = dot(6.0, 3.0);
        aura.apply();
        assert!(!aura.tick_due(1.0));
        assert!(aura.tick_due(3.0));

        assert_eq!(aura.tick(3.0, 3.0), AuraTick { faded: false });
        assert_eq!(aura.tick_timer_remaining(), 3.0);
        assert_eq!(aura.duration_remaining(), 3.0);

        assert!(aura.tick_due(3.0));
        assert_eq!(aura.tick(3.0, 3.0), AuraTick { faded: true });
        assert!(!aura.is_active());
        assert_eq!(aura.uptime, 6.0);
        assert_eq!(aura.count, 1);
    }

    #[test]
    fn uptime_is_bounded_by_fight_time() {
        let mut aura = Aura::new(
            AuraId::FlaskOfPureDeath,
            AuraSpec::catalog(AuraId::FlaskOfPureDeath),
        );
        aura.apply();
        aura.tick(1.5, 0.5);
        assert_eq!(aura.uptime, 0.5);
        assert!(aura.is_active());
        assert_eq!(aura.pending_timers().count(), 0);
    }

    #[test]
    fn charges_fade_the_aura() {
        let mut aura = Aura::new(
            AuraId::ImprovedShadowBolt,
            AuraSpec::catalog(AuraId::ImprovedShadowBolt),
        );
        aura.apply();
        assert_eq!(aura.charges(), 4);
        assert!(!aura.consume_charge());
        assert!(!aura.consume_charge());
        assert!(!aura.consume_charge());
        assert!(aura.consume_charge());
        assert!(!aura.is_active());
    }

    #[test]
    fn activating_a_curse_displaces_the_other_curse() {
        let mut set = AuraSet::new(vec![
            Aura::new(AuraId::CurseOfAgony, AuraSpec::catalog(AuraId::CurseOfAgony)),
            Aura::new(AuraId::CurseOfDoom, AuraSpec::catalog(AuraId::CurseOfDoom)),
            Aura::new(AuraId::Corruption, AuraSpec::catalog(AuraId::Corruption)),
        ]);
        set.activate(AuraId::Corruption, Some(AbilityId::Corruption));
        assert!(set
            .activate(AuraId::CurseOfAgony, Some(AbilityId::CurseOfAgony))
            .is_empty());
        let displaced = set.activate(AuraId::CurseOfDoom, Some(AbilityId::CurseOfDoom));
        assert_eq!(displaced, vec![AuraId::CurseOfAgony]);
        assert!(!set.is_active(AuraId::CurseOfAgony));
        assert!(set.is_active(AuraId::CurseOfDoom));
        assert!(set.is_active(AuraId::Corruption));

        let doom = set.get(AuraId::CurseOfDoom).map(Aura::source);
        assert_eq!(doom, Some(Some(AbilityId::CurseOfDoom)));
        let agony = set.get(AuraId::CurseOfAgony).map(Aura::source);
        assert_eq!(agony, Some(None));
    }

    #[test]
    fn flask_conflicts_with_both_elixir_kinds() {
        let resolved = resolve_selection(&[
            AuraId::ElixirOfMajorShadowPower,
            AuraId::ElixirOfMajorMageblood,
            AuraId::BlackenedBasilisk,
            AuraId::FlaskOfPureDeath,
        ]);
        assert_eq!(
            resolved,
            vec![AuraId::BlackenedBasilisk, AuraId::FlaskOfPureDeath]
        );
    }

    #[test]
    fn later_selection_in_same_category_wins() {
        let resolved = resolve_selection(&[
            AuraId::SuperiorWizardOil,
            AuraId::SkullfishSoup,
            AuraId::BrilliantWizardOil,
            AuraId::SkullfishSoup,
        ]);
        assert_eq!(
            resolved,
            vec![AuraId::BrilliantWizardOil, AuraId::SkullfishSoup]
        );
    }

    #[test]
    fn index_lists_members_per_category() {
        let index = CategoryIndex::build(
            AuraId::ALL
                .iter()
                .map(|id| (*id, AuraSpec::catalog(*id).categories)),
        );
        assert_eq!(
            index.members(AuraCategory::Curse),
            &[AuraId::CurseOfAgony, AuraId::CurseOfDoom]
        );
        assert_eq!(index.members(AuraCategory::BattleElixir).len(), 4);
    }
}
