//! Buffs: stat modifiers, absorb shields, and named status markers
//!
//! Stat math is `(base + sum of additive values) * product of multipliers`,
//! with every contribution pre-multiplied by the buff's stack count.
//! Multiplicative values are percent units: a value of 25 contributes a
//! 1.25 factor, a value of -30 contributes 0.7.

use serde::{Deserialize, Serialize};

use crate::combat::{Spell, SpellKind};
use crate::stat_block::StatKey;

/// How a stat modifier combines with the base value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierMode {
    Additive,
    Multiplicative,
}

/// What a buff does, one payload per kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuffEffect {
    /// Adjust one stat while active
    StatModifier {
        stat: StatKey,
        value: f64,
        mode: ModifierMode,
    },
    /// Absorb incoming damage until the pool runs dry
    Shield { amount: f64, current: f64 },
    /// Named marker with no mechanical payload of its own
    Status { name: String },
}

/// One active buff instance on an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub id: String,
    /// Who applied it
    pub source: String,
    pub effect: BuffEffect,
    /// Turns remaining
    pub duration: u32,
    pub stackable: bool,
    pub stacks: u32,
}

impl Buff {
    /// Stat-adjusting buff
    pub fn stat_modifier(
        id: String,
        source: String,
        stat: StatKey,
        value: f64,
        mode: ModifierMode,
        duration: u32,
    ) -> Self {
        Buff {
            id,
            source,
            effect: BuffEffect::StatModifier { stat, value, mode },
            duration,
            stackable: false,
            stacks: 1,
        }
    }

    /// Absorb shield with a full pool
    pub fn shield(id: String, source: String, amount: f64, duration: u32) -> Self {
        Buff {
            id,
            source,
            effect: BuffEffect::Shield {
                amount,
                current: amount,
            },
            duration,
            stackable: false,
            stacks: 1,
        }
    }

    /// Named status marker
    pub fn status(id: String, source: String, name: String, duration: u32) -> Self {
        Buff {
            id,
            source,
            effect: BuffEffect::Status { name },
            duration,
            stackable: false,
            stacks: 1,
        }
    }

    /// Multiplicative stat modifier built from a cast spell. Buff spells
    /// carry their effect as-is, debuff spells negate it.
    pub fn from_spell(spell: &Spell, source: String) -> Self {
        let value = match spell.kind {
            SpellKind::Buff => spell.effect,
            SpellKind::Debuff => -spell.effect,
        };
        Buff::stat_modifier(
            format!("spell_{}", spell.target_stat.name()),
            source,
            spell.target_stat,
            value,
            ModifierMode::Multiplicative,
            spell.duration,
        )
    }

    /// Mark the buff as stackable
    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    /// Same logical buff: matching source and id
    fn matches(&self, other: &Buff) -> bool {
        self.source == other.source && self.id == other.id
    }
}

/// Add a buff to an active list. A matching entry refreshes to the longer
/// duration; stackable entries also gain a stack.
pub fn apply_buff(buffs: &mut Vec<Buff>, new: Buff) {
    if let Some(existing) = buffs.iter_mut().find(|b| b.matches(&new)) {
        if existing.stackable {
            existing.stacks += 1;
        }
        existing.duration = existing.duration.max(new.duration);
    } else {
        buffs.push(new);
    }
}

/// Decrement every duration by one turn and drop expired buffs
pub fn tick_buffs(buffs: &mut Vec<Buff>) {
    for buff in buffs.iter_mut() {
        buff.duration = buff.duration.saturating_sub(1);
    }
    buffs.retain(|b| b.duration > 0);
}

/// Fold one stat's buff modifiers over a base value.
///
/// `(base + sum of additives) * product of (1 + value/100)`, each value
/// pre-multiplied by the buff's stacks.
pub fn apply_stat_modifiers(base: f64, buffs: &[Buff], stat: StatKey) -> f64 {
    let mut additive = 0.0;
    let mut multiplier = 1.0;
    for buff in buffs {
        if let BuffEffect::StatModifier {
            stat: target,
            value,
            mode,
        } = &buff.effect
        {
            if *target != stat {
                continue;
            }
            let stacked = value * buff.stacks as f64;
            match mode {
                ModifierMode::Additive => additive += stacked,
                ModifierMode::Multiplicative => multiplier *= 1.0 + stacked / 100.0,
            }
        }
    }
    (base + additive) * multiplier
}

/// Drain absorb shields front-to-back and return the unabsorbed remainder.
/// Depleted shields leave the list immediately.
pub fn apply_damage_to_shields(damage: f64, buffs: &mut Vec<Buff>) -> f64 {
    if damage <= 0.0 {
        return 0.0;
    }
    let mut remaining = damage;
    for buff in buffs.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        if let BuffEffect::Shield { current, .. } = &mut buff.effect {
            let absorbed = remaining.min(*current);
            *current -= absorbed;
            remaining -= absorbed;
        }
    }
    buffs.retain(|b| !matches!(&b.effect, BuffEffect::Shield { current, .. } if *current <= 0.0));
    remaining
}
