//! Periodic damage and healing effects
//!
//! Stacking policy, duration ticking, and per-turn totals for DoT/HoT
//! effects. `apply_effect` is the single entry point for adding an effect
//! to an active list; behavior is keyed by the incoming effect's stack mode.

use serde::{Deserialize, Serialize};

/// Whether a periodic effect damages or heals its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Damage,
    Heal,
}

/// How repeated application of the same effect combines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StackMode {
    /// Reapplication refreshes the duration; stacks stay at 1
    None,
    /// Every application is an independent instance
    Separate,
    /// Reapplication adds a stack and leaves the duration alone
    Increment,
    /// Reapplication adds a stack and keeps the longer duration
    IncrementRefresh,
    /// Like increment_refresh, but stacks clamp at `max_stacks`;
    /// the duration keeps refreshing once the cap is reached
    IncrementCapped { max_stacks: u32 },
}

/// One active DoT or HoT instance on an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicEffect {
    /// Effect identifier (e.g. "poison", "mending")
    pub id: String,
    /// Who applied it
    pub source: String,
    pub kind: EffectKind,
    /// Amount applied per turn per stack; damage uses the magnitude,
    /// healing keeps the sign
    pub amount_per_turn: f64,
    /// Turns remaining; always positive while the effect is listed
    pub duration: u32,
    pub stack_mode: StackMode,
    pub stacks: u32,
}

impl PeriodicEffect {
    /// Create a fresh single-stack instance
    pub fn new(
        id: String,
        source: String,
        kind: EffectKind,
        amount_per_turn: f64,
        duration: u32,
        stack_mode: StackMode,
    ) -> Self {
        PeriodicEffect {
            id,
            source,
            kind,
            amount_per_turn,
            duration,
            stack_mode,
            stacks: 1,
        }
    }

    /// Same logical effect: matching source and id
    fn matches(&self, other: &PeriodicEffect) -> bool {
        self.source == other.source && self.id == other.id
    }
}

/// Per-turn damage and healing contributed by a periodic effect list
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodicTotals {
    /// Non-negative damage magnitude
    pub damage: f64,
    /// Signed healing amount
    pub healing: f64,
}

/// Add an effect to an active list, respecting its stacking policy
pub fn apply_effect(effects: &mut Vec<PeriodicEffect>, new: PeriodicEffect) {
    match new.stack_mode {
        StackMode::Separate => {
            effects.push(new);
        }
        StackMode::None => {
            if let Some(existing) = effects.iter_mut().find(|e| e.matches(&new)) {
                existing.duration = new.duration;
            } else {
                effects.push(new);
            }
        }
        StackMode::Increment => {
            if let Some(existing) = effects.iter_mut().find(|e| e.matches(&new)) {
                existing.stacks += 1;
            } else {
                effects.push(new);
            }
        }
        StackMode::IncrementRefresh => {
            if let Some(existing) = effects.iter_mut().find(|e| e.matches(&new)) {
                existing.stacks += 1;
                existing.duration = existing.duration.max(new.duration);
            } else {
                effects.push(new);
            }
        }
        StackMode::IncrementCapped { max_stacks } => {
            if let Some(existing) = effects.iter_mut().find(|e| e.matches(&new)) {
                existing.stacks = (existing.stacks + 1).min(max_stacks);
                existing.duration = existing.duration.max(new.duration);
            } else {
                effects.push(new);
            }
        }
    }
}

/// Decrement every duration by one turn and drop expired effects
pub fn tick_durations(effects: &mut Vec<PeriodicEffect>) {
    for effect in effects.iter_mut() {
        effect.duration = effect.duration.saturating_sub(1);
    }
    effects.retain(|e| e.duration > 0);
}

/// Sum per-turn amounts, weighting each effect by its stack count
pub fn total_per_turn(effects: &[PeriodicEffect]) -> PeriodicTotals {
    let mut totals = PeriodicTotals::default();
    for effect in effects {
        let amount = effect.amount_per_turn * effect.stacks as f64;
        match effect.kind {
            EffectKind::Damage => totals.damage += amount.abs(),
            EffectKind::Heal => totals.healing += amount,
        }
    }
    totals
}
