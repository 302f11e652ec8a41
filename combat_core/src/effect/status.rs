//! Status effect manager: actionability, per-turn totals, effective stats
//!
//! Each round the active list is processed (a read-only pass) and then
//! ticked. Processing yields everything the round resolver needs before
//! an entity acts: whether it can act, move, or cast, the damage and
//! healing its effects deal this turn, and the additive stat deltas from
//! buff and debuff effects.

use serde::{Deserialize, Serialize};

use crate::stat_block::{StatBlock, StatKey};

/// What a status effect does, one payload per kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusKind {
    /// Prevents acting, moving, and casting
    Stun,
    /// Prevents moving only
    Root,
    /// Additive stat raise while active
    Buff { stat: StatKey, amount: f64 },
    /// Additive stat drop while active; `amount` carries the sign
    Debuff { stat: StatKey, amount: f64 },
    /// Damage every turn
    Dot { amount_per_turn: f64 },
    /// Healing every turn
    Hot { amount_per_turn: f64 },
    /// Absorb pool consumed at damage-application time, inert here
    Shield { amount: f64 },
}

impl StatusKind {
    /// Kind label used for matching and logs
    pub fn label(&self) -> &'static str {
        match self {
            StatusKind::Stun => "stun",
            StatusKind::Root => "root",
            StatusKind::Buff { .. } => "buff",
            StatusKind::Debuff { .. } => "debuff",
            StatusKind::Dot { .. } => "dot",
            StatusKind::Hot { .. } => "hot",
            StatusKind::Shield { .. } => "shield",
        }
    }
}

/// One active status effect on an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub kind: StatusKind,
    /// Turns remaining
    pub duration: u32,
    pub stackable: bool,
    pub stacks: u32,
}

impl StatusEffect {
    /// Create a fresh non-stackable single-stack effect
    pub fn new(name: String, kind: StatusKind, duration: u32) -> Self {
        StatusEffect {
            name,
            kind,
            duration,
            stackable: false,
            stacks: 1,
        }
    }

    /// Mark the effect as stackable
    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    /// Same logical effect: matching kind label and name
    fn matches(&self, other: &StatusEffect) -> bool {
        self.kind.label() == other.kind.label() && self.name == other.name
    }
}

/// Outcome of the read-only processing pass
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedEffects {
    pub can_act: bool,
    pub can_move: bool,
    pub can_cast: bool,
    /// Non-negative damage magnitude from DoT effects
    pub damage_received: f64,
    /// Signed healing from HoT effects
    pub healing_received: f64,
    /// Additive stat deltas, sign carried by the stored amount
    pub modified_stats: Vec<(StatKey, f64)>,
}

impl Default for ProcessedEffects {
    fn default() -> Self {
        ProcessedEffects {
            can_act: true,
            can_move: true,
            can_cast: true,
            damage_received: 0.0,
            healing_received: 0.0,
            modified_stats: Vec::new(),
        }
    }
}

impl ProcessedEffects {
    fn add_stat_delta(&mut self, stat: StatKey, delta: f64) {
        if let Some(entry) = self.modified_stats.iter_mut().find(|(k, _)| *k == stat) {
            entry.1 += delta;
        } else {
            self.modified_stats.push((stat, delta));
        }
    }

    /// Accumulated delta for one stat, zero when untouched
    pub fn stat_delta(&self, stat: StatKey) -> f64 {
        self.modified_stats
            .iter()
            .find(|(k, _)| *k == stat)
            .map(|(_, d)| *d)
            .unwrap_or(0.0)
    }
}

/// Apply a status effect. A matching entry refreshes to the longer
/// duration; stackable entries also gain a stack.
pub fn apply_status(statuses: &mut Vec<StatusEffect>, new: StatusEffect) {
    if let Some(existing) = statuses.iter_mut().find(|s| s.matches(&new)) {
        if existing.stackable {
            existing.stacks += 1;
        }
        existing.duration = existing.duration.max(new.duration);
    } else {
        statuses.push(new);
    }
}

/// Read-only pass producing this round's actionability and totals
pub fn process_statuses(statuses: &[StatusEffect]) -> ProcessedEffects {
    let mut processed = ProcessedEffects::default();
    for status in statuses {
        let stacks = status.stacks as f64;
        match &status.kind {
            StatusKind::Stun => {
                processed.can_act = false;
                processed.can_move = false;
                processed.can_cast = false;
            }
            StatusKind::Root => {
                processed.can_move = false;
            }
            StatusKind::Buff { stat, amount } | StatusKind::Debuff { stat, amount } => {
                processed.add_stat_delta(*stat, amount * stacks);
            }
            StatusKind::Dot { amount_per_turn } => {
                processed.damage_received += amount_per_turn.abs() * stacks;
            }
            StatusKind::Hot { amount_per_turn } => {
                processed.healing_received += amount_per_turn * stacks;
            }
            StatusKind::Shield { .. } => {}
        }
    }
    processed
}

/// Decrement every duration by one turn and drop expired effects
pub fn tick_statuses(statuses: &mut Vec<StatusEffect>) {
    for status in statuses.iter_mut() {
        status.duration = status.duration.saturating_sub(1);
    }
    statuses.retain(|s| s.duration > 0);
}

/// The stat block with all additive status deltas summed in.
///
/// Multiplicative changes never come from statuses; the buff module
/// layers those separately.
pub fn effective_stats(base: &StatBlock, statuses: &[StatusEffect]) -> StatBlock {
    let processed = process_statuses(statuses);
    let mut block = base.clone();
    for (stat, delta) in &processed.modified_stats {
        stat.add(&mut block, *delta);
    }
    block
}
