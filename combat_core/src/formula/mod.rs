//! Combat math: hit chance, attack outcomes, damage mitigation

mod crit;
mod hit;
mod mitigation;

pub use crit::{outcome_multiplier, roll_attack_outcome, AttackOutcome};
pub use hit::{calculate_hit_chance, evasion_needed_to_floor, roll_hit};
pub use mitigation::{armor_pen_needed, calculate_mitigation, effective_armor};
