//! Attack outcome: critical, normal, or weak hit
//!
//! One uniform draw decides the outcome. Scaled to percent, a draw under
//! `crit_chance` is a critical; a draw at or above `100 - fail_chance` is
//! a weak hit. Criticals win when the two bands overlap.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Quality of a landed hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackOutcome {
    Critical,
    Normal,
    Weak,
}

/// Decide the outcome of a landed hit with a single draw
pub fn roll_attack_outcome(
    crit_chance: f64,
    fail_chance: f64,
    rng: &mut impl Rng,
) -> AttackOutcome {
    let roll = rng.gen::<f64>() * 100.0;
    if roll < crit_chance {
        AttackOutcome::Critical
    } else if roll >= 100.0 - fail_chance {
        AttackOutcome::Weak
    } else {
        AttackOutcome::Normal
    }
}

/// Damage multiplier for an outcome
pub fn outcome_multiplier(outcome: AttackOutcome, crit_mult: f64, fail_mult: f64) -> f64 {
    match outcome {
        AttackOutcome::Critical => crit_mult,
        AttackOutcome::Normal => 1.0,
        AttackOutcome::Weak => fail_mult,
    }
}
