//! Entity descriptors - external stat overrides resolved onto a baseline

use serde::{Deserialize, Serialize};

use super::{StatBlock, StatKey};
use crate::combat::Spell;

/// External description of a combatant: a name, sparse stat overrides, and
/// an optional spell list.
///
/// Only the provided fields override the baseline during [`resolve`]; unset
/// fields inherit the baseline value, never zero. Each simulation resolves a
/// fresh `StatBlock` from this descriptor, so no state leaks across combats.
///
/// [`resolve`]: EntityStats::resolve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub name: String,
    #[serde(default)]
    pub hp: Option<f64>,
    #[serde(default)]
    pub damage: Option<f64>,
    #[serde(default)]
    pub armor: Option<f64>,
    #[serde(default)]
    pub resistance: Option<f64>,
    #[serde(default)]
    pub txc: Option<f64>,
    #[serde(default)]
    pub evasion: Option<f64>,
    #[serde(default)]
    pub crit_chance: Option<f64>,
    #[serde(default)]
    pub crit_mult: Option<f64>,
    #[serde(default)]
    pub crit_txc_bonus: Option<f64>,
    #[serde(default)]
    pub fail_chance: Option<f64>,
    #[serde(default)]
    pub fail_mult: Option<f64>,
    #[serde(default)]
    pub fail_txc_malus: Option<f64>,
    #[serde(default)]
    pub armor_pen: Option<f64>,
    #[serde(default)]
    pub pen_percent: Option<f64>,
    #[serde(default)]
    pub lifesteal: Option<f64>,
    #[serde(default)]
    pub regen: Option<f64>,
    #[serde(default)]
    pub agility: Option<f64>,
    #[serde(default)]
    pub armor_before_resistance: Option<bool>,
    #[serde(default)]
    pub spells: Vec<Spell>,
}

impl EntityStats {
    /// Create a descriptor with no overrides
    pub fn new(name: impl Into<String>) -> Self {
        EntityStats {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_hp(mut self, hp: f64) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_damage(mut self, damage: f64) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_armor(mut self, armor: f64) -> Self {
        self.armor = Some(armor);
        self
    }

    pub fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = Some(resistance);
        self
    }

    pub fn with_txc(mut self, txc: f64) -> Self {
        self.txc = Some(txc);
        self
    }

    pub fn with_evasion(mut self, evasion: f64) -> Self {
        self.evasion = Some(evasion);
        self
    }

    pub fn with_lifesteal(mut self, lifesteal: f64) -> Self {
        self.lifesteal = Some(lifesteal);
        self
    }

    pub fn with_regen(mut self, regen: f64) -> Self {
        self.regen = Some(regen);
        self
    }

    pub fn with_agility(mut self, agility: f64) -> Self {
        self.agility = Some(agility);
        self
    }

    /// Set the override for an arbitrary key
    pub fn with_stat(mut self, key: StatKey, value: f64) -> Self {
        self.set_override(key, value);
        self
    }

    pub fn with_spell(mut self, spell: Spell) -> Self {
        self.spells.push(spell);
        self
    }

    /// Write the override slot for `key`
    pub fn set_override(&mut self, key: StatKey, value: f64) {
        let slot = match key {
            StatKey::Hp => &mut self.hp,
            StatKey::Damage => &mut self.damage,
            StatKey::Armor => &mut self.armor,
            StatKey::Resistance => &mut self.resistance,
            StatKey::Txc => &mut self.txc,
            StatKey::Evasion => &mut self.evasion,
            StatKey::CritChance => &mut self.crit_chance,
            StatKey::CritMult => &mut self.crit_mult,
            StatKey::CritTxcBonus => &mut self.crit_txc_bonus,
            StatKey::FailChance => &mut self.fail_chance,
            StatKey::FailMult => &mut self.fail_mult,
            StatKey::FailTxcMalus => &mut self.fail_txc_malus,
            StatKey::ArmorPen => &mut self.armor_pen,
            StatKey::PenPercent => &mut self.pen_percent,
            StatKey::Lifesteal => &mut self.lifesteal,
            StatKey::Regen => &mut self.regen,
            StatKey::Agility => &mut self.agility,
        };
        *slot = Some(value);
    }

    /// Read the override slot for `key`
    pub fn get_override(&self, key: StatKey) -> Option<f64> {
        match key {
            StatKey::Hp => self.hp,
            StatKey::Damage => self.damage,
            StatKey::Armor => self.armor,
            StatKey::Resistance => self.resistance,
            StatKey::Txc => self.txc,
            StatKey::Evasion => self.evasion,
            StatKey::CritChance => self.crit_chance,
            StatKey::CritMult => self.crit_mult,
            StatKey::CritTxcBonus => self.crit_txc_bonus,
            StatKey::FailChance => self.fail_chance,
            StatKey::FailMult => self.fail_mult,
            StatKey::FailTxcMalus => self.fail_txc_malus,
            StatKey::ArmorPen => self.armor_pen,
            StatKey::PenPercent => self.pen_percent,
            StatKey::Lifesteal => self.lifesteal,
            StatKey::Regen => self.regen,
            StatKey::Agility => self.agility,
        }
    }

    /// Build a concrete `StatBlock` by overriding the baseline with the
    /// fields this descriptor provides
    pub fn resolve(&self, baseline: &StatBlock) -> StatBlock {
        let mut block = baseline.clone();
        for key in StatKey::ALL {
            if let Some(value) = self.get_override(key) {
                key.set(&mut block, value);
            }
        }
        if let Some(flag) = self.armor_before_resistance {
            block.armor_before_resistance = flag;
        }
        block
    }
}
