use serde::{Deserialize, Serialize};

use crate::combat::ids::AbilityId;

/// Priority configuration consulted whenever the actor is free to act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Dots kept up in this order.
    pub maintain: Vec<AbilityId>,
    pub filler: Option<AbilityId>,
    /// Cast unconditionally when nothing else is ready.
    pub recovery: AbilityId,
    /// Instant, off-GCD actions fired before the policy runs.
    pub cooldowns: Vec<AbilityId>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            maintain: vec![AbilityId::CurseOfAgony, AbilityId::Corruption],
            filler: Some(AbilityId::ShadowBolt),
            recovery: AbilityId::LifeTap,
            cooldowns: Vec::new(),
        }
    }
}

impl RotationConfig {
    /// Every ability the rotation can reach, first mention wins, order preserved.
    pub fn ability_ids(&self) -> Vec<AbilityId> {
        let mut ids = Vec::new();
        let all = self
            .cooldowns
            .iter()
            .chain(self.maintain.iter())
            .chain(self.filler.iter())
            .chain(std::iter::once(&self.recovery));
        for id in all {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }
}

/// What the policy can see about the actor.
pub trait RotationView {
    fn is_ready(&self, ability: AbilityId) -> bool;
    /// Whether the aura maintained by `ability` is currently up.
    fn is_maintained(&self, ability: AbilityId) -> bool;
}

/// Picks exactly one ability: first missing maintenance dot that is ready, else the filler if
/// ready, else the recovery ability.
pub fn choose_action<V: RotationView>(rotation: &RotationConfig, view: &V) -> AbilityId {
    if let Some(id) = rotation
        .maintain
        .iter()
        .find(|id| !view.is_maintained(**id) && view.is_ready(**id))
    {
        return *id;
    }
    match rotation.filler {
        Some(filler) if view.is_ready(filler) => filler,
        _ => rotation.recovery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeView {
        ready: Vec<AbilityId>,
        maintained: Vec<AbilityId>,
    }

    impl RotationView for FakeView {
        fn is_ready(&self, ability: AbilityId) -> bool {
            self.ready.contains(&ability)
        }

        fn is_maintained(&self, ability: AbilityId) -> bool {
            self.maintained.contains(&ability)
        }
    }

    #[test]
    fn first_missing_dot_wins_in_configured_order() {
        let rotation = RotationConfig {
            maintain: vec![AbilityId::Immolate, AbilityId::Corruption],
            ..RotationConfig::default()
        };
        let view = FakeView {
            ready: vec![AbilityId::Immolate, AbilityId::Corruption, AbilityId::ShadowBolt],
            maintained: vec![],
        };
        assert_eq!(choose_action(&rotation, &view), AbilityId::Immolate);

        let view = FakeView {
            maintained: vec![AbilityId::Immolate],
            ..view
        };
        assert_eq!(choose_action(&rotation, &view), AbilityId::Corruption);
    }

    #[test]
    fn unready_dot_falls_through_to_filler() {
        let rotation = RotationConfig::default();
        let view = FakeView {
            ready: vec![AbilityId::ShadowBolt],
            maintained: vec![],
        };
        assert_eq!(choose_action(&rotation, &view), AbilityId::ShadowBolt);
    }

    #[test]
    fn recovery_when_nothing_is_ready() {
        let rotation = RotationConfig::default();
        let view = FakeView {
            ready: vec![],
            maintained: vec![],
        };
        assert_eq!(choose_action(&rotation, &view), AbilityId::LifeTap);
    }

    #[test]
    fn ability_ids_are_deduplicated() {
        let rotation = RotationConfig {
            maintain: vec![AbilityId::Corruption, AbilityId::Corruption],
            filler: Some(AbilityId::ShadowBolt),
            recovery: AbilityId::LifeTap,
            cooldowns: vec![AbilityId::DestructionPotion],
        };
        assert_eq!(
            rotation.ability_ids(),
            vec![
                AbilityId::DestructionPotion,
                AbilityId::Corruption,
                AbilityId::ShadowBolt,
                AbilityId::LifeTap
            ]
        );
    }
}
