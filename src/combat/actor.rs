//! The simulated character.
//!
//! [Actor] owns every [Ability] and [Aura] of one character plus the shared timers (cast, GCD,
//! regen) and the mana pool. The simulator drives it with [Actor::next_step], [Actor::advance]
//! and [Actor::act]; nothing here owns an RNG or decides when a trial ends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::ability::{Ability, AbilitySpec, ManaGain, Outcome};
use crate::combat::aura::{resolve_selection, Aura, AuraSet, AuraSpec};
use crate::combat::ids::{AbilityId, AttackKind, AuraId, School};
use crate::combat::trace::{CombatLog, CombatLogEntry, TraceMode};
use crate::combat::rng::Rng;
use crate::combat::rotation::{choose_action, RotationConfig, RotationView};
use crate::combat::stats::Stats;
use crate::combat::timer::{decay, is_expired, MIN_STEP};
use crate::error::{ConfigError, InvariantViolation};

pub const DEFAULT_GCD: f64 = 1.5;
/// Mana per five seconds is granted in one lump every interval.
pub const DEFAULT_REGEN_INTERVAL: f64 = 5.0;

/// Fully resolved character: stat totals, rotation and the runtime-relevant talent flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub stats: Stats,
    pub rotation: RotationConfig,
    /// Static buffs (flask, elixirs, food, weapon oil) active for the whole fight.
    pub auras: Vec<AuraId>,
    pub improved_shadow_bolt: bool,
    pub ability_overrides: BTreeMap<AbilityId, AbilitySpec>,
    pub base_gcd: f64,
    pub regen_interval: f64,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            stats: Stats::default(),
            rotation: RotationConfig::default(),
            auras: Vec::new(),
            improved_shadow_bolt: false,
            ability_overrides: BTreeMap::new(),
            base_gcd: DEFAULT_GCD,
            regen_interval: DEFAULT_REGEN_INTERVAL,
        }
    }
}

impl ActorConfig {
    pub fn spec_for(&self, id: AbilityId) -> AbilitySpec {
        self.ability_overrides
            .get(&id)
            .copied()
            .unwrap_or_else(|| AbilitySpec::catalog(id))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing_ok = |value: f64| value.is_finite() && value > 0.0;
        if !timing_ok(self.base_gcd) || !timing_ok(self.regen_interval) {
            return Err(ConfigError::InvalidTiming);
        }

        let rotation = &self.rotation;
        let filler = rotation.filler.ok_or(ConfigError::MissingFiller)?;
        if filler == rotation.recovery {
            return Err(ConfigError::FillerIsRecovery(filler));
        }
        let filler_cost = self.spec_for(filler).mana_cost;
        if filler_cost > self.stats.max_mana {
            return Err(ConfigError::UnaffordableFiller {
                ability: filler,
                cost: filler_cost,
                max_mana: self.stats.max_mana,
            });
        }

        let recovery = self.spec_for(rotation.recovery);
        if recovery.mana_cost > 0.0 || recovery.cooldown > 0.0 {
            return Err(ConfigError::GatedRecovery(rotation.recovery));
        }

        let mut maintained: Vec<(AbilityId, AuraId)> =
            Vec::with_capacity(rotation.maintain.len());
        for id in &rotation.maintain {
            let Some(dot) = self.spec_for(*id).dot else {
                return Err(ConfigError::MaintenanceWithoutDot(*id));
            };
            let categories = AuraSpec::catalog(dot.aura).categories;
            let rival = maintained.iter().find(|(_, aura)| {
                AuraSpec::catalog(*aura)
                    .categories
                    .iter()
                    .any(|category| categories.contains(category))
            });
            if let Some((first, _)) = rival {
                return Err(ConfigError::ConflictingMaintenance {
                    first: *first,
                    second: *id,
                });
            }
            maintained.push((*id, dot.aura));
        }
        for id in &rotation.cooldowns {
            let spec = self.spec_for(*id);
            if spec.on_gcd || spec.cast_time > 0.0 {
                return Err(ConfigError::BlockingCooldown(*id));
            }
        }
        for id in rotation.ability_ids() {
            if let Some(dot) = self.spec_for(id).dot {
                if !dot.has_whole_ticks() {
                    return Err(ConfigError::InvalidDot(id));
                }
            }
        }
        for id in &self.auras {
            if !AuraSpec::catalog(*id).is_permanent() {
                return Err(ConfigError::NotAStaticBuff(*id));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    base_stats: Stats,
    stats: Stats,
    rotation: RotationConfig,
    base_gcd: f64,
    regen_interval: f64,
    improved_shadow_bolt: bool,
    static_auras: Vec<AuraId>,
    abilities: BTreeMap<AbilityId, Ability>,
    auras: AuraSet,
    fight_time: f64,
    fight_length: f64,
    cast_time_remaining: f64,
    gcd_remaining: f64,
    mana: f64,
    regen_timer: f64,
    damage: f64,
    regen_mana: f64,
    log: CombatLog,
}

impl Actor {
    pub fn new(config: &ActorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut abilities = BTreeMap::new();
        let mut auras: Vec<Aura> = Vec::new();
        let mut add_aura = |aura: Aura| {
            if !auras.iter().any(|existing| existing.id == aura.id) {
                auras.push(aura);
            }
        };

        for id in config.rotation.ability_ids() {
            let spec = config.spec_for(id);
            if let Some(dot) = spec.dot {
                let aura_spec =
                    AuraSpec::catalog(dot.aura).with_periodic(dot.duration, dot.tick_interval);
                add_aura(Aura::new(dot.aura, aura_spec));
            }
            if let Some(aura) = spec.applies_aura {
                add_aura(Aura::new(aura, AuraSpec::catalog(aura)));
            }
            abilities.insert(id, Ability::new(id, spec));
        }

        let improved_shadow_bolt =
            config.improved_shadow_bolt && abilities.contains_key(&AbilityId::ShadowBolt);
        if improved_shadow_bolt {
            add_aura(Aura::new(
                AuraId::ImprovedShadowBolt,
                AuraSpec::catalog(AuraId::ImprovedShadowBolt),
            ));
        }

        let static_auras = resolve_selection(&config.auras);
        for id in &static_auras {
            add_aura(Aura::new(*id, AuraSpec::catalog(*id)));
        }

        let mut actor = Self {
            base_stats: config.stats,
            stats: config.stats,
            rotation: config.rotation.clone(),
            base_gcd: config.base_gcd,
            regen_interval: config.regen_interval,
            improved_shadow_bolt,
            static_auras,
            abilities,
            auras: AuraSet::new(auras),
            fight_time: 0.0,
            fight_length: 0.0,
            cast_time_remaining: 0.0,
            gcd_remaining: 0.0,
            mana: config.stats.max_mana,
            regen_timer: config.regen_interval,
            damage: 0.0,
            regen_mana: 0.0,
            log: CombatLog::default(),
        };
        actor.reset(0.0, TraceMode::Off);
        Ok(actor)
    }

    /// Returns the actor to its start-of-trial state for a fight of `fight_length` seconds.
    pub fn reset(&mut self, fight_length: f64, trace: TraceMode) {
        self.fight_time = 0.0;
        self.fight_length = fight_length;
        self.cast_time_remaining = 0.0;
        self.gcd_remaining = 0.0;
        self.regen_timer = self.regen_interval;
        self.damage = 0.0;
        self.regen_mana = 0.0;
        for ability in self.abilities.values_mut() {
            ability.reset();
        }
        self.auras.reset();
        self.log.clear();
        self.log.set_mode(trace);

        for index in 0..self.static_auras.len() {
            let id = self.static_auras[index];
            self.auras.activate(id, None);
        }
        self.refresh_stats();
        self.mana = self.stats.max_mana;
    }

    pub fn fight_time(&self) -> f64 {
        self.fight_time
    }

    pub fn fight_length(&self) -> f64 {
        self.fight_length
    }

    pub fn is_fight_running(&self) -> bool {
        self.fight_time < self.fight_length
    }

    pub fn damage(&self) -> f64 {
        self.damage
    }

    pub fn mana(&self) -> f64 {
        self.mana
    }

    pub fn regen_mana(&self) -> f64 {
        self.regen_mana
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn cast_time_remaining(&self) -> f64 {
        self.cast_time_remaining
    }

    pub fn gcd_remaining(&self) -> f64 {
        self.gcd_remaining
    }

    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.get(&id)
    }

    pub fn abilities(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }

    pub fn auras(&self) -> &AuraSet {
        &self.auras
    }

    pub fn combat_log(&self) -> &[CombatLogEntry] {
        self.log.entries()
    }

    pub fn take_combat_log(&mut self) -> Vec<CombatLogEntry> {
        self.log.take_entries()
    }

    /// Neither casting nor waiting on the global cooldown.
    pub fn is_free(&self) -> bool {
        is_expired(self.cast_time_remaining) && is_expired(self.gcd_remaining)
    }

    /// Every running timer: cast, GCD, regen and each active aura's duration and next tick.
    pub fn pending_timers(&self) -> Vec<f64> {
        let mut timers = vec![self.cast_time_remaining, self.gcd_remaining, self.regen_timer];
        for aura in self.auras.iter() {
            timers.extend(aura.pending_timers());
        }
        timers.retain(|timer| *timer > 0.0);
        timers
    }

    /// Largest step that does not skip over any pending event.
    pub fn next_step(&self) -> f64 {
        let candidate = if self.cast_time_remaining > 0.0 {
            self.cast_time_remaining
        } else {
            self.gcd_remaining.max(MIN_STEP)
        };
        self.pending_timers()
            .into_iter()
            .fold(candidate, f64::min)
    }

    /// Moves the fight forward by `step` seconds, paying out dot ticks and mana regen.
    pub fn advance(&mut self, step: f64) -> Result<(), InvariantViolation> {
        if !step.is_finite() || step <= 0.0 {
            return Err(InvariantViolation::InvalidStep {
                step,
                time: self.fight_time,
            });
        }
        let start = self.fight_time;
        self.fight_time += step;
        let now = self.fight_time;
        let in_fight = (self.fight_length - start).clamp(0.0, step);

        self.cast_time_remaining = decay(self.cast_time_remaining, step);

        for ability in self.abilities.values_mut() {
            let dot_aura = ability.spec.dot.and_then(|dot| self.auras.get(dot.aura));
            let tick = ability.tick(step, dot_aura);
            if tick > 0.0 {
                self.damage += tick;
                let id = ability.id;
                self.log.record(now, || format!("{id} ticks for {tick:.0}"));
            }
        }

        let mut stats_changed = false;
        for aura in self.auras.iter_mut() {
            if aura.tick(step, in_fight).faded {
                stats_changed |= !aura.spec.stats.is_empty();
                let id = aura.id;
                self.log.record(now, || format!("{id} fades"));
            }
        }
        if stats_changed {
            self.refresh_stats();
        }

        self.gcd_remaining = decay(self.gcd_remaining, step);
        self.regen_timer = decay(self.regen_timer, step);
        if is_expired(self.regen_timer) {
            let amount = self.stats.mp5 * self.regen_interval / DEFAULT_REGEN_INTERVAL;
            if amount > 0.0 {
                let gained = self.restore_mana(amount);
                self.regen_mana += gained;
                self.log.record(now, || {
                    format!("{gained:.0} mana gained from MP5 ({:.0}/{:.0})", self.mana, self.stats.max_mana)
                });
            }
            self.regen_timer = self.regen_interval;
        }
        Ok(())
    }

    /// Fires ready off-GCD cooldowns, then casts exactly one rotation ability.
    pub fn act(&mut self, rng: &mut Rng) -> Result<AbilityId, InvariantViolation> {
        self.use_cooldowns(rng)?;
        let choice = choose_action(&self.rotation, &*self);
        self.cast(choice, rng)?;
        Ok(choice)
    }

    pub fn use_cooldowns(&mut self, rng: &mut Rng) -> Result<(), InvariantViolation> {
        for index in 0..self.rotation.cooldowns.len() {
            let id = self.rotation.cooldowns[index];
            if self.wants_cooldown(id) {
                self.cast(id, rng)?;
            }
        }
        Ok(())
    }

    fn wants_cooldown(&self, id: AbilityId) -> bool {
        let Some(ability) = self.abilities.get(&id) else {
            return false;
        };
        if !ability.is_ready(self.mana) {
            return false;
        }
        if let Some(aura) = ability.spec.applies_aura {
            if self.auras.is_active(aura) {
                return false;
            }
        }
        if ability.spec.mana_gain.is_some() {
            return self.stats.max_mana - self.mana >= ability.spec.max_mana_gain(&self.stats);
        }
        true
    }

    /// Executes one ability. The caller must only cast ready, affordable abilities.
    pub fn cast(&mut self, id: AbilityId, rng: &mut Rng) -> Result<(), InvariantViolation> {
        let stats = self.stats;
        let now = self.fight_time;
        let ability = self
            .abilities
            .get_mut(&id)
            .ok_or(InvariantViolation::UnknownAbility(id))?;
        if !ability.is_ready(self.mana) {
            return Err(InvariantViolation::UnreadyCast {
                ability: id,
                time: now,
                cooldown: ability.cooldown_remaining(),
                mana: self.mana,
                cost: ability.spec.mana_cost,
            });
        }
        let spec = ability.spec;

        self.mana -= spec.mana_cost;
        if self.mana < 0.0 {
            return Err(InvariantViolation::NegativeMana {
                mana: self.mana,
                time: now,
            });
        }
        self.cast_time_remaining = spec.cast_time / stats.haste_multiplier();
        if spec.on_gcd {
            self.gcd_remaining = stats.gcd(self.base_gcd);
        }
        ability.start_cooldown();

        let outcome = ability.roll_outcome(&stats, rng);
        let damage = ability.direct_damage(&stats, outcome);
        ability.counters.record_outcome(outcome);
        ability.counters.damage += damage;
        if outcome.landed() && spec.dot.is_some() {
            ability.snapshot_dot(&stats);
        }
        self.damage += damage;

        if spec.kind == AttackKind::Utility {
            self.log.record(now, || format!("Casting {id}"));
        } else {
            self.log
                .record(now, || format!("{id} {} for {damage:.0}", outcome.label()));
        }

        if outcome.landed() && spec.school == School::Shadow && damage > 0.0 {
            self.consume_improved_shadow_bolt();
        }
        if self.improved_shadow_bolt
            && id == AbilityId::ShadowBolt
            && outcome == Outcome::Crit
        {
            self.apply_aura(AuraId::ImprovedShadowBolt, id);
        }
        if outcome.landed() {
            if let Some(dot) = spec.dot {
                self.apply_aura(dot.aura, id);
            }
        }
        if let Some(aura) = spec.applies_aura {
            self.apply_aura(aura, id);
        }

        if let Some(gain) = spec.mana_gain {
            let amount = match gain {
                ManaGain::Scaling { base, coefficient } => {
                    base + coefficient * stats.power_for(spec.school)
                }
                ManaGain::Range { min, max } => f64::from(rng.range_inclusive(min, max)),
            };
            let gained = self.restore_mana(amount);
            if let Some(ability) = self.abilities.get_mut(&id) {
                ability.counters.mana_gain += gained;
            }
            self.log.record(now, || {
                format!("{gained:.0} mana gained from {id} ({:.0}/{:.0})", self.mana, self.stats.max_mana)
            });
        }
        Ok(())
    }

    fn restore_mana(&mut self, amount: f64) -> f64 {
        let gained = amount.min(self.stats.max_mana - self.mana).max(0.0);
        self.mana += gained;
        gained
    }

    fn consume_improved_shadow_bolt(&mut self) {
        let faded = self
            .auras
            .get_mut(AuraId::ImprovedShadowBolt)
            .is_some_and(Aura::consume_charge);
        if faded {
            self.log
                .record(self.fight_time, || format!("{} fades", AuraId::ImprovedShadowBolt));
            self.refresh_stats();
        }
    }

    fn apply_aura(&mut self, id: AuraId, source: AbilityId) {
        let displaced = self.auras.activate(id, Some(source));
        let now = self.fight_time;
        for rival in &displaced {
            self.log
                .record(now, || format!("{rival} is replaced by {id}"));
        }
        self.log.record(now, || format!("{id} applied by {source}"));

        let carries_stats = |aura: AuraId| {
            self.auras
                .get(aura)
                .is_some_and(|aura| !aura.spec.stats.is_empty())
        };
        if carries_stats(id) || displaced.iter().any(|rival| carries_stats(*rival)) {
            self.refresh_stats();
        }
    }

    fn refresh_stats(&mut self) {
        self.stats = self.base_stats.with_contributions(
            self.auras
                .iter()
                .filter(|aura| aura.is_active())
                .flat_map(|aura| aura.spec.stats.iter()),
        );
    }
}

impl RotationView for Actor {
    fn is_ready(&self, ability: AbilityId) -> bool {
        self.abilities
            .get(&ability)
            .is_some_and(|ability| ability.is_ready(self.mana))
    }

    fn is_maintained(&self, ability: AbilityId) -> bool {
        self.abilities
            .get(&ability)
            .and_then(|ability| ability.spec.dot)
            .is_some_and(|dot| self.auras.is_active(dot.aura))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ability::DotSpec;

    fn sure_stats() -> Stats {
        Stats {
            crit_chance: 0.0,
            crit_rating: 0.0,
            haste_rating: 0.0,
            mp5: 0.0,
            ..Stats::default()
        }
    }

    fn sure_spell(base_damage: f64, cast_time: f64) -> AbilitySpec {
        AbilitySpec {
            cast_time,
            base_damage,
            coefficient: 0.0,
            can_crit: false,
            can_miss: false,
            ..AbilitySpec::default()
        }
    }

    fn config_with(filler: AbilitySpec) -> ActorConfig {
        ActorConfig {
            stats: sure_stats(),
            rotation: RotationConfig {
                maintain: Vec::new(),
                filler: Some(AbilityId::ShadowBolt),
                recovery: AbilityId::LifeTap,
                cooldowns: Vec::new(),
            },
            ability_overrides: BTreeMap::from([(AbilityId::ShadowBolt, filler)]),
            ..ActorConfig::default()
        }
    }

    #[test]
    fn rejects_filler_that_is_also_recovery() {
        let mut config = ActorConfig::default();
        config.rotation.filler = Some(AbilityId::LifeTap);
        assert_eq!(
            config.validate(),
            Err(ConfigError::FillerIsRecovery(AbilityId::LifeTap))
        );
    }

    #[test]
    fn rejects_unaffordable_filler_and_dotless_maintenance() {
        let mut config = ActorConfig::default();
        config.stats.max_mana = 100.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnaffordableFiller { .. })
        ));

        let mut config = ActorConfig::default();
        config.rotation.maintain = vec![AbilityId::Incinerate];
        assert_eq!(
            config.validate(),
            Err(ConfigError::MaintenanceWithoutDot(AbilityId::Incinerate))
        );
    }

    #[test]
    fn rejects_maintaining_two_curses() {
        let mut config = ActorConfig::default();
        config.rotation.maintain = vec![
            AbilityId::CurseOfAgony,
            AbilityId::Corruption,
            AbilityId::CurseOfDoom,
        ];
        assert_eq!(
            config.validate(),
            Err(ConfigError::ConflictingMaintenance {
                first: AbilityId::CurseOfAgony,
                second: AbilityId::CurseOfDoom,
            })
        );

        config.rotation.maintain = vec![AbilityId::CurseOfDoom, AbilityId::Corruption];
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_dots_that_cannot_pay_out_in_full() {
        let mut config = ActorConfig::default();
        config.ability_overrides.insert(
            AbilityId::Corruption,
            AbilitySpec {
                dot: Some(DotSpec {
                    aura: AuraId::Corruption,
                    duration: 11.0,
                    tick_interval: 3.0,
                    damage: 90.0,
                    coefficient: 0.0,
                }),
                ..AbilitySpec::catalog(AbilityId::Corruption)
            },
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDot(AbilityId::Corruption))
        );
    }

    #[test]
    fn cast_spends_mana_and_starts_timers() {
        let mut actor = Actor::new(&config_with(AbilitySpec {
            mana_cost: 400.0,
            ..sure_spell(100.0, 2.5)
        }))
        .expect("valid config");
        actor.reset(60.0, TraceMode::Off);
        let mut rng = Rng::new(3);

        let full = actor.mana();
        assert_eq!(actor.act(&mut rng), Ok(AbilityId::ShadowBolt));
        assert_eq!(actor.mana(), full - 400.0);
        assert_eq!(actor.cast_time_remaining(), 2.5);
        assert_eq!(actor.gcd_remaining(), 1.5);
        assert_eq!(actor.damage(), 100.0);
        assert!(!actor.is_free());
        assert_eq!(actor.next_step(), 1.5);
    }

    #[test]
    fn casting_an_unready_ability_is_an_invariant_violation() {
        let mut actor = Actor::new(&config_with(AbilitySpec {
            cooldown: 10.0,
            ..sure_spell(100.0, 0.0)
        }))
        .expect("valid config");
        actor.reset(60.0, TraceMode::Off);
        let mut rng = Rng::new(3);
        actor.cast(AbilityId::ShadowBolt, &mut rng).expect("first cast");
        assert!(matches!(
            actor.cast(AbilityId::ShadowBolt, &mut rng),
            Err(InvariantViolation::UnreadyCast { .. })
        ));
        assert_eq!(
            actor.cast(AbilityId::Incinerate, &mut rng),
            Err(InvariantViolation::UnknownAbility(AbilityId::Incinerate))
        );
    }

    #[test]
    fn advance_rejects_non_positive_steps() {
        let mut actor = Actor::new(&ActorConfig::default()).expect("valid config");
        actor.reset(60.0, TraceMode::Off);
        assert!(actor.advance(0.0).is_err());
        assert!(actor.advance(f64::NAN).is_err());
    }

    #[test]
    fn step_is_clamped_to_the_next_dot_tick() {
        let mut config = config_with(sure_spell(100.0, 2.5));
        config.rotation.maintain = vec![AbilityId::Corruption];
        config.ability_overrides.insert(
            AbilityId::Corruption,
            AbilitySpec {
                can_miss: false,
                can_crit: false,
                dot: Some(DotSpec {
                    aura: AuraId::Corruption,
                    duration: 18.0,
                    tick_interval: 1.0,
                    damage: 180.0,
                    coefficient: 0.0,
                }),
                ..AbilitySpec::default()
            },
        );
        let mut actor = Actor::new(&config).expect("valid config");
        actor.reset(60.0, TraceMode::Off);
        let mut rng = Rng::new(1);

        assert_eq!(actor.act(&mut rng), Ok(AbilityId::Corruption));
        let step = actor.next_step();
        assert_eq!(step, 1.0);
        actor.advance(step).expect("advance");
        assert_eq!(actor.damage(), 10.0);
        assert!(actor
            .pending_timers()
            .iter()
            .all(|timer| actor.next_step() <= *timer));
    }

    #[test]
    fn regen_grants_mp5_and_restarts_timer() {
        let mut config = config_with(AbilitySpec {
            mana_cost: 400.0,
            ..sure_spell(100.0, 0.0)
        });
        config.stats.mp5 = 50.0;
        let mut actor = Actor::new(&config).expect("valid config");
        actor.reset(60.0, TraceMode::Events);
        let mut rng = Rng::new(1);
        actor.act(&mut rng).expect("cast");
        let after_cast = actor.mana();

        let mut elapsed = 0.0;
        while elapsed < 5.0 {
            let step = actor.next_step();
            actor.advance(step).expect("advance");
            elapsed += step;
        }
        assert!(after_cast < actor.stats().max_mana - 50.0);
        assert_eq!(actor.regen_mana(), 50.0);
        assert!(actor
            .combat_log()
            .iter()
            .any(|entry| entry.message.contains("mana gained from MP5")));
    }

    #[test]
    fn static_buffs_are_active_from_the_start() {
        let mut config = ActorConfig::default();
        config.auras = vec![AuraId::ElixirOfMajorShadowPower, AuraId::FlaskOfPureDeath];
        let mut actor = Actor::new(&config).expect("valid config");
        actor.reset(60.0, TraceMode::Off);
        assert!(actor.auras().is_active(AuraId::FlaskOfPureDeath));
        assert_eq!(
            actor.auras().get(AuraId::FlaskOfPureDeath).and_then(Aura::source),
            None
        );
        assert!(actor.auras().get(AuraId::ElixirOfMajorShadowPower).is_none());
        assert_eq!(
            actor.stats().shadow_power,
            config.stats.shadow_power + 80.0
        );
    }

    #[test]
    fn temporary_aura_is_rejected_as_a_static_buff() {
        let mut config = ActorConfig::default();
        config.auras = vec![AuraId::DestructionPotion];
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotAStaticBuff(AuraId::DestructionPotion))
        );
    }

    #[test]
    fn mana_potion_waits_for_a_full_deficit() {
        let mut config = config_with(AbilitySpec {
            mana_cost: 1000.0,
            ..sure_spell(100.0, 0.0)
        });
        config.stats.max_mana = 10_000.0;
        config.rotation.cooldowns = vec![AbilityId::SuperManaPotion];
        let mut actor = Actor::new(&config).expect("valid config");
        actor.reset(600.0, TraceMode::Off);
        let mut rng = Rng::new(11);

        actor.act(&mut rng).expect("cast");
        actor.act(&mut rng).expect("cast");
        let potion = actor.ability(AbilityId::SuperManaPotion).expect("potion");
        assert_eq!(potion.counters.casts, 0);

        actor.cast(AbilityId::ShadowBolt, &mut rng).expect("cast");
        actor.cast(AbilityId::ShadowBolt, &mut rng).expect("cast");
        assert_eq!(actor.mana(), 6000.0);
        let before = actor.mana();
        actor.use_cooldowns(&mut rng).expect("potion");
        let potion = actor.ability(AbilityId::SuperManaPotion).expect("potion");
        assert_eq!(potion.counters.casts, 1);
        let gained = actor.mana() - before;
        assert!((1800.0..=3000.0).contains(&gained));
        assert_eq!(potion.counters.mana_gain, gained);
    }

    #[test]
    fn curse_of_doom_replaces_curse_of_agony() {
        let mut config = config_with(sure_spell(100.0, 0.0));
        config.rotation.maintain = vec![AbilityId::CurseOfAgony];
        config.rotation.filler = Some(AbilityId::CurseOfDoom);
        for id in [AbilityId::CurseOfAgony, AbilityId::CurseOfDoom] {
            config.ability_overrides.insert(
                id,
                AbilitySpec {
                    can_miss: false,
                    ..AbilitySpec::catalog(id)
                },
            );
        }
        let mut actor = Actor::new(&config).expect("valid config");
        actor.reset(120.0, TraceMode::Off);
        let mut rng = Rng::new(5);

        actor.cast(AbilityId::CurseOfAgony, &mut rng).expect("agony");
        assert!(actor.auras().is_active(AuraId::CurseOfAgony));
        actor.cast(AbilityId::CurseOfDoom, &mut rng).expect("doom");
        assert!(actor.auras().is_active(AuraId::CurseOfDoom));
        assert_eq!(
            actor.auras().get(AuraId::CurseOfDoom).and_then(Aura::source),
            Some(AbilityId::CurseOfDoom)
        );
        assert!(!actor.auras().is_active(AuraId::CurseOfAgony));
    }

    #[test]
    fn shadow_bolt_crit_applies_improved_shadow_bolt() {
        let mut config = config_with(AbilitySpec {
            can_crit: true,
            ..sure_spell(1000.0, 0.0)
        });
        config.stats.crit_chance = 100.0;
        config.improved_shadow_bolt = true;
        let mut actor = Actor::new(&config).expect("valid config");
        actor.reset(60.0, TraceMode::Off);
        let mut rng = Rng::new(2);

        actor.cast(AbilityId::ShadowBolt, &mut rng).expect("first bolt");
        let first = actor.damage();
        assert_eq!(first, 2000.0);
        assert!(actor.auras().is_active(AuraId::ImprovedShadowBolt));
        assert!((actor.stats().shadow_modifier - 1.2).abs() < 1e-12);

        actor.advance(1.5).expect("advance");
        actor.cast(AbilityId::ShadowBolt, &mut rng).expect("second bolt");
        let second = actor.damage() - first;
        assert!((second - 2400.0).abs() < 1e-9);
        let isb = actor.auras().get(AuraId::ImprovedShadowBolt).expect("isb");
        assert_eq!(isb.charges(), 4);
        assert_eq!(isb.count, 2);
    }
}
