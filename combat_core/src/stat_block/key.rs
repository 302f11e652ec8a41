//! Typed access to StatBlock fields
//!
//! Calibration and the override layer address stats by key rather than by
//! field, so both get one exhaustive enum instead of stringly-typed names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::StatBlock;
use crate::config::ConfigError;

/// Identifies one numeric field of a `StatBlock`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Hp,
    Damage,
    Armor,
    Resistance,
    Txc,
    Evasion,
    CritChance,
    CritMult,
    CritTxcBonus,
    FailChance,
    FailMult,
    FailTxcMalus,
    ArmorPen,
    PenPercent,
    Lifesteal,
    Regen,
    Agility,
}

impl StatKey {
    /// Every key, in declaration order
    pub const ALL: [StatKey; 17] = [
        StatKey::Hp,
        StatKey::Damage,
        StatKey::Armor,
        StatKey::Resistance,
        StatKey::Txc,
        StatKey::Evasion,
        StatKey::CritChance,
        StatKey::CritMult,
        StatKey::CritTxcBonus,
        StatKey::FailChance,
        StatKey::FailMult,
        StatKey::FailTxcMalus,
        StatKey::ArmorPen,
        StatKey::PenPercent,
        StatKey::Lifesteal,
        StatKey::Regen,
        StatKey::Agility,
    ];

    /// The snake_case name used in config files and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            StatKey::Hp => "hp",
            StatKey::Damage => "damage",
            StatKey::Armor => "armor",
            StatKey::Resistance => "resistance",
            StatKey::Txc => "txc",
            StatKey::Evasion => "evasion",
            StatKey::CritChance => "crit_chance",
            StatKey::CritMult => "crit_mult",
            StatKey::CritTxcBonus => "crit_txc_bonus",
            StatKey::FailChance => "fail_chance",
            StatKey::FailMult => "fail_mult",
            StatKey::FailTxcMalus => "fail_txc_malus",
            StatKey::ArmorPen => "armor_pen",
            StatKey::PenPercent => "pen_percent",
            StatKey::Lifesteal => "lifesteal",
            StatKey::Regen => "regen",
            StatKey::Agility => "agility",
        }
    }

    /// Read this stat from a block
    pub fn get(&self, block: &StatBlock) -> f64 {
        match self {
            StatKey::Hp => block.hp,
            StatKey::Damage => block.damage,
            StatKey::Armor => block.armor,
            StatKey::Resistance => block.resistance,
            StatKey::Txc => block.txc,
            StatKey::Evasion => block.evasion,
            StatKey::CritChance => block.crit_chance,
            StatKey::CritMult => block.crit_mult,
            StatKey::CritTxcBonus => block.crit_txc_bonus,
            StatKey::FailChance => block.fail_chance,
            StatKey::FailMult => block.fail_mult,
            StatKey::FailTxcMalus => block.fail_txc_malus,
            StatKey::ArmorPen => block.armor_pen,
            StatKey::PenPercent => block.pen_percent,
            StatKey::Lifesteal => block.lifesteal,
            StatKey::Regen => block.regen,
            StatKey::Agility => block.agility,
        }
    }

    /// Write this stat on a block
    pub fn set(&self, block: &mut StatBlock, value: f64) {
        match self {
            StatKey::Hp => block.hp = value,
            StatKey::Damage => block.damage = value,
            StatKey::Armor => block.armor = value,
            StatKey::Resistance => block.resistance = value,
            StatKey::Txc => block.txc = value,
            StatKey::Evasion => block.evasion = value,
            StatKey::CritChance => block.crit_chance = value,
            StatKey::CritMult => block.crit_mult = value,
            StatKey::CritTxcBonus => block.crit_txc_bonus = value,
            StatKey::FailChance => block.fail_chance = value,
            StatKey::FailMult => block.fail_mult = value,
            StatKey::FailTxcMalus => block.fail_txc_malus = value,
            StatKey::ArmorPen => block.armor_pen = value,
            StatKey::PenPercent => block.pen_percent = value,
            StatKey::Lifesteal => block.lifesteal = value,
            StatKey::Regen => block.regen = value,
            StatKey::Agility => block.agility = value,
        }
    }

    /// Shift this stat on a block by a delta
    pub fn add(&self, block: &mut StatBlock, delta: f64) {
        self.set(block, self.get(block) + delta);
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = StatKey::ALL.iter().map(|k| k.name()).collect();
                ConfigError::ValidationError(format!(
                    "unknown stat key '{}', expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}
