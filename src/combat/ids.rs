use std::fmt;

use serde::{Deserialize, Serialize};

/// Every castable action the simulator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityId {
    ShadowBolt,
    Incinerate,
    SearingPain,
    Shadowburn,
    Corruption,
    UnstableAffliction,
    SiphonLife,
    Immolate,
    CurseOfAgony,
    CurseOfDoom,
    LifeTap,
    DestructionPotion,
    SuperManaPotion,
    Melee,
}

impl AbilityId {
    pub const ALL: [AbilityId; 14] = [
        Self::ShadowBolt,
        Self::Incinerate,
        Self::SearingPain,
        Self::Shadowburn,
        Self::Corruption,
        Self::UnstableAffliction,
        Self::SiphonLife,
        Self::Immolate,
        Self::CurseOfAgony,
        Self::CurseOfDoom,
        Self::LifeTap,
        Self::DestructionPotion,
        Self::SuperManaPotion,
        Self::Melee,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ShadowBolt => "Shadow Bolt",
            Self::Incinerate => "Incinerate",
            Self::SearingPain => "Searing Pain",
            Self::Shadowburn => "Shadowburn",
            Self::Corruption => "Corruption",
            Self::UnstableAffliction => "Unstable Affliction",
            Self::SiphonLife => "Siphon Life",
            Self::Immolate => "Immolate",
            Self::CurseOfAgony => "Curse of Agony",
            Self::CurseOfDoom => "Curse of Doom",
            Self::LifeTap => "Life Tap",
            Self::DestructionPotion => "Destruction Potion",
            Self::SuperManaPotion => "Super Mana Potion",
            Self::Melee => "Melee",
        }
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every timed buff or debuff, including the static consumables a character can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuraId {
    Corruption,
    UnstableAffliction,
    SiphonLife,
    Immolate,
    CurseOfAgony,
    CurseOfDoom,
    ImprovedShadowBolt,
    DestructionPotion,
    FlaskOfPureDeath,
    ElixirOfMajorShadowPower,
    ElixirOfMajorFirepower,
    AdeptsElixir,
    ElixirOfMajorMageblood,
    SuperiorWizardOil,
    BrilliantWizardOil,
    BlackenedBasilisk,
    SkullfishSoup,
}

impl AuraId {
    pub const ALL: [AuraId; 17] = [
        Self::Corruption,
        Self::UnstableAffliction,
        Self::SiphonLife,
        Self::Immolate,
        Self::CurseOfAgony,
        Self::CurseOfDoom,
        Self::ImprovedShadowBolt,
        Self::DestructionPotion,
        Self::FlaskOfPureDeath,
        Self::ElixirOfMajorShadowPower,
        Self::ElixirOfMajorFirepower,
        Self::AdeptsElixir,
        Self::ElixirOfMajorMageblood,
        Self::SuperiorWizardOil,
        Self::BrilliantWizardOil,
        Self::BlackenedBasilisk,
        Self::SkullfishSoup,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Corruption => "Corruption",
            Self::UnstableAffliction => "Unstable Affliction",
            Self::SiphonLife => "Siphon Life",
            Self::Immolate => "Immolate",
            Self::CurseOfAgony => "Curse of Agony",
            Self::CurseOfDoom => "Curse of Doom",
            Self::ImprovedShadowBolt => "Improved Shadow Bolt",
            Self::DestructionPotion => "Destruction Potion",
            Self::FlaskOfPureDeath => "Flask of Pure Death",
            Self::ElixirOfMajorShadowPower => "Elixir of Major Shadow Power",
            Self::ElixirOfMajorFirepower => "Elixir of Major Firepower",
            Self::AdeptsElixir => "Adept's Elixir",
            Self::ElixirOfMajorMageblood => "Elixir of Major Mageblood",
            Self::SuperiorWizardOil => "Superior Wizard Oil",
            Self::BrilliantWizardOil => "Brilliant Wizard Oil",
            Self::BlackenedBasilisk => "Blackened Basilisk",
            Self::SkullfishSoup => "Skullfish Soup",
        }
    }
}

impl fmt::Display for AuraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum School {
    Shadow,
    Fire,
    Physical,
    /// Utility actions (mana gain, consumables) that deal no damage.
    None,
}

/// Determines which outcome rolls a cast consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Spell,
    /// Also rolls dodge and glancing blows.
    Melee,
    /// Never rolls: always lands, never crits.
    Utility,
}

/// Exclusivity tags: activating an aura removes every active aura sharing a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuraCategory {
    Curse,
    BattleElixir,
    GuardianElixir,
    Food,
    WeaponOil,
    Potion,
}
