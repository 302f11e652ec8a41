//! Combatants and the spells they carry

use serde::{Deserialize, Serialize};

use crate::effect::{Buff, PeriodicEffect, StatusEffect};
use crate::stat_block::{StatBlock, StatKey};

/// Which side a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

/// Whether a spell helps the caster or hinders an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellKind {
    Buff,
    Debuff,
}

/// A castable spell that applies a multiplicative stat modifier.
///
/// Buff spells raise the caster's `target_stat` by `effect` percent,
/// debuff spells lower an enemy's by the same amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub kind: SpellKind,
    pub target_stat: StatKey,
    /// Percent strength of the modifier
    pub effect: f64,
    /// Turns the resulting modifier lasts
    #[serde(alias = "eco")]
    pub duration: u32,
}

/// One fighter in an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub team: Team,
    pub stats: StatBlock,
    pub current_hp: f64,
    #[serde(default)]
    pub spells: Vec<Spell>,
    #[serde(default)]
    pub periodic: Vec<PeriodicEffect>,
    #[serde(default)]
    pub buffs: Vec<Buff>,
    #[serde(default)]
    pub statuses: Vec<StatusEffect>,
}

impl Combatant {
    /// Create a combatant at full health with no active effects
    pub fn new(id: String, name: String, team: Team, stats: StatBlock) -> Self {
        let current_hp = stats.hp;
        Combatant {
            id,
            name,
            team,
            stats,
            current_hp,
            spells: Vec::new(),
            periodic: Vec::new(),
            buffs: Vec::new(),
            statuses: Vec::new(),
        }
    }

    pub fn with_spells(mut self, spells: Vec<Spell>) -> Self {
        self.spells = spells;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_full_health() {
        let combatant = Combatant::new(
            "hero".to_string(),
            "Hero".to_string(),
            Team::A,
            StatBlock::default(),
        );
        assert!((combatant.current_hp - combatant.stats.hp).abs() < f64::EPSILON);
        assert!(combatant.is_alive());
        assert!(combatant.periodic.is_empty());
        assert!(combatant.buffs.is_empty());
        assert!(combatant.statuses.is_empty());
    }

    #[test]
    fn test_dead_at_zero() {
        let mut combatant = Combatant::new(
            "hero".to_string(),
            "Hero".to_string(),
            Team::A,
            StatBlock::default(),
        );
        combatant.current_hp = 0.0;
        assert!(!combatant.is_alive());
    }

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::A.opponent(), Team::B);
        assert_eq!(Team::B.opponent(), Team::A);
    }

    #[test]
    fn test_spell_duration_accepts_eco_alias() {
        let spell: Spell = serde_json::from_str(
            "{\"kind\":\"buff\",\"target_stat\":\"damage\",\"effect\":20.0,\"eco\":3}",
        )
        .unwrap();
        assert_eq!(spell.duration, 3);
        assert_eq!(spell.kind, SpellKind::Buff);
    }
}
