//! Hit chance: attacker accuracy vs defender evasion
//!
//! Formula: hit_chance = clamp(txc - evasion, min, max), in percent.
//! The clamp bounds come from `CombatConstants`.

use rand::Rng;

/// Chance to hit in percent: `clamp(txc - evasion, min, max)`
pub fn calculate_hit_chance(txc: f64, evasion: f64, min: f64, max: f64) -> f64 {
    (txc - evasion).clamp(min, max)
}

/// Evasion required to push an attacker with `txc` accuracy down to the
/// clamp floor
pub fn evasion_needed_to_floor(txc: f64, min_hit_chance: f64) -> f64 {
    txc - min_hit_chance
}

/// Roll to-hit: a uniform draw scaled to percent, hitting on draws at or
/// below the chance
pub fn roll_hit(hit_chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() * 100.0 <= hit_chance
}
