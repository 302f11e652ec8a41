//! StatBlock - the canonical numeric description of a combatant

mod key;
mod overrides;

pub use key::StatKey;
pub use overrides::EntityStats;

use serde::{Deserialize, Serialize};

/// Full numeric record describing one combatant's power level.
///
/// Combat never mutates a `StatBlock`. Effective values are derived per use
/// by layering status deltas and buff modifiers on top, and the default
/// block doubles as the baseline that entity overrides resolve against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    // === Vitals ===
    #[serde(default = "default_hp")]
    pub hp: f64,
    /// Flat HP recovered at the start of every round
    #[serde(default = "default_regen")]
    pub regen: f64,

    // === Offense ===
    #[serde(default = "default_damage")]
    pub damage: f64,
    /// To-hit rating, in percent
    #[serde(default = "default_txc")]
    pub txc: f64,
    #[serde(default = "default_crit_chance")]
    pub crit_chance: f64,
    #[serde(default = "default_crit_mult")]
    pub crit_mult: f64,
    /// To-hit shift granted to critical-capable attacks, in percent
    #[serde(default = "default_crit_txc_bonus")]
    pub crit_txc_bonus: f64,
    /// Chance of a weak (glancing) hit, rolled from the top of the range
    #[serde(default = "default_fail_chance")]
    pub fail_chance: f64,
    #[serde(default = "default_fail_mult")]
    pub fail_mult: f64,
    /// To-hit shift suffered by weak-capable attacks, in percent
    #[serde(default = "default_fail_txc_malus")]
    pub fail_txc_malus: f64,
    /// Flat armor ignored on the target
    #[serde(default = "default_armor_pen")]
    pub armor_pen: f64,
    /// Percentage of the target's armor ignored
    #[serde(default = "default_pen_percent")]
    pub pen_percent: f64,
    /// Percentage of damage dealt returned as healing
    #[serde(default = "default_lifesteal")]
    pub lifesteal: f64,

    // === Defense ===
    #[serde(default = "default_armor")]
    pub armor: f64,
    /// Percent damage reduction, clamped by the mitigation constants
    #[serde(default = "default_resistance")]
    pub resistance: f64,
    #[serde(default = "default_evasion")]
    pub evasion: f64,
    /// Subtract armor before resistance when true, after it when false
    #[serde(default = "default_armor_before_resistance")]
    pub armor_before_resistance: bool,

    // === Tempo ===
    #[serde(default = "default_agility")]
    pub agility: f64,
}

impl Default for StatBlock {
    fn default() -> Self {
        StatBlock {
            hp: 100.0,
            regen: 0.0,
            damage: 20.0,
            txc: 80.0,
            crit_chance: 10.0,
            crit_mult: 1.5,
            crit_txc_bonus: 0.0,
            fail_chance: 10.0,
            fail_mult: 0.5,
            fail_txc_malus: 0.0,
            armor_pen: 0.0,
            pen_percent: 0.0,
            lifesteal: 0.0,
            armor: 5.0,
            resistance: 0.0,
            evasion: 10.0,
            armor_before_resistance: true,
            agility: 10.0,
        }
    }
}

fn default_hp() -> f64 {
    100.0
}
fn default_regen() -> f64 {
    0.0
}
fn default_damage() -> f64 {
    20.0
}
fn default_txc() -> f64 {
    80.0
}
fn default_crit_chance() -> f64 {
    10.0
}
fn default_crit_mult() -> f64 {
    1.5
}
fn default_crit_txc_bonus() -> f64 {
    0.0
}
fn default_fail_chance() -> f64 {
    10.0
}
fn default_fail_mult() -> f64 {
    0.5
}
fn default_fail_txc_malus() -> f64 {
    0.0
}
fn default_armor_pen() -> f64 {
    0.0
}
fn default_pen_percent() -> f64 {
    0.0
}
fn default_lifesteal() -> f64 {
    0.0
}
fn default_armor() -> f64 {
    5.0
}
fn default_resistance() -> f64 {
    0.0
}
fn default_evasion() -> f64 {
    10.0
}
fn default_armor_before_resistance() -> bool {
    true
}
fn default_agility() -> f64 {
    10.0
}
