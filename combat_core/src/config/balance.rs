//! Balance constants configuration
//!
//! Every tunable lives in a caller-owned `BalanceConfig`. Construct one (or
//! load it from TOML) and pass it into the simulation entry points; nothing
//! in this crate reads process-wide defaults.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::combat::SpellKind;
use crate::stat_block::StatBlock;

/// Tunable balance constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub mitigation: MitigationConstants,
    /// Stats every simulated entity inherits unless overridden
    #[serde(default)]
    pub baseline: StatBlock,
    #[serde(default)]
    pub calibration: CalibrationConstants,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        BalanceConfig {
            combat: CombatConstants::default(),
            mitigation: MitigationConstants::default(),
            baseline: StatBlock::default(),
            calibration: CalibrationConstants::default(),
        }
    }
}

impl BalanceConfig {
    /// Check that the constants describe a runnable ruleset
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baseline.hp <= 0.0 {
            return Err(ConfigError::ValidationError(
                "baseline hp must be positive".to_string(),
            ));
        }
        if self.combat.min_hit_chance > self.combat.max_hit_chance {
            return Err(ConfigError::ValidationError(format!(
                "min_hit_chance {} exceeds max_hit_chance {}",
                self.combat.min_hit_chance, self.combat.max_hit_chance
            )));
        }
        if !(0.0..=1.0).contains(&self.combat.cast_chance) {
            return Err(ConfigError::ValidationError(format!(
                "cast_chance must be in [0, 1], got {}",
                self.combat.cast_chance
            )));
        }
        if self.mitigation.min_resistance > self.mitigation.max_resistance {
            return Err(ConfigError::ValidationError(format!(
                "min_resistance {} exceeds max_resistance {}",
                self.mitigation.min_resistance, self.mitigation.max_resistance
            )));
        }
        if self.calibration.equilibrium_low >= self.calibration.equilibrium_high {
            return Err(ConfigError::ValidationError(format!(
                "equilibrium band [{}, {}] is empty",
                self.calibration.equilibrium_low, self.calibration.equilibrium_high
            )));
        }
        if self.calibration.hp_span_multiplier <= 0.0 {
            return Err(ConfigError::ValidationError(
                "hp_span_multiplier must be positive".to_string(),
            ));
        }
        if self.calibration.confidence_passes == 0 {
            return Err(ConfigError::ValidationError(
                "confidence_passes must be at least 1".to_string(),
            ));
        }
        if self.calibration.turn_limit == 0 {
            return Err(ConfigError::ValidationError(
                "calibration turn_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Lowest hit chance an attack can reach, in percent
    #[serde(default = "default_min_hit_chance")]
    pub min_hit_chance: f64,
    /// Highest hit chance an attack can reach, in percent
    #[serde(default = "default_max_hit_chance")]
    pub max_hit_chance: f64,
    /// Probability that an actor with spells casts instead of attacking
    #[serde(default = "default_cast_chance")]
    pub cast_chance: f64,
    /// Spell kinds the round resolver is willing to cast
    #[serde(default = "default_allowed_spell_kinds")]
    pub allowed_spell_kinds: Vec<SpellKind>,
    /// Multiplier on the [0,1) initiative variance draw
    #[serde(default = "default_variance_scale")]
    pub initiative_variance_scale: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            min_hit_chance: 5.0,
            max_hit_chance: 95.0,
            cast_chance: 0.5,
            allowed_spell_kinds: default_allowed_spell_kinds(),
            initiative_variance_scale: 10.0,
        }
    }
}

impl CombatConstants {
    /// Whether the resolver may cast spells of the given kind
    pub fn allows_spell(&self, kind: SpellKind) -> bool {
        self.allowed_spell_kinds.contains(&kind)
    }
}

fn default_min_hit_chance() -> f64 {
    5.0
}
fn default_max_hit_chance() -> f64 {
    95.0
}
fn default_cast_chance() -> f64 {
    0.5
}
fn default_allowed_spell_kinds() -> Vec<SpellKind> {
    vec![SpellKind::Buff, SpellKind::Debuff]
}
fn default_variance_scale() -> f64 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitigationConstants {
    /// Resistance floor (negative values amplify damage)
    #[serde(default = "default_min_resistance")]
    pub min_resistance: f64,
    /// Resistance cap (100 = immunity)
    #[serde(default = "default_max_resistance")]
    pub max_resistance: f64,
}

impl Default for MitigationConstants {
    fn default() -> Self {
        MitigationConstants {
            min_resistance: -200.0,
            max_resistance: 100.0,
        }
    }
}

fn default_min_resistance() -> f64 {
    -200.0
}
fn default_max_resistance() -> f64 {
    100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConstants {
    /// Lower edge of the win-rate band accepted as equilibrium
    #[serde(default = "default_equilibrium_low")]
    pub equilibrium_low: f64,
    /// Upper edge of the win-rate band accepted as equilibrium
    #[serde(default = "default_equilibrium_high")]
    pub equilibrium_high: f64,
    /// The HP search range spans increment * this multiplier
    #[serde(default = "default_hp_span_multiplier")]
    pub hp_span_multiplier: f64,
    /// Independent calibration passes used for the confidence score
    #[serde(default = "default_confidence_passes")]
    pub confidence_passes: u32,
    /// Relative stddev is scaled by this factor when scoring confidence
    #[serde(default = "default_confidence_stddev_factor")]
    pub confidence_stddev_factor: f64,
    /// Turn limit for calibration combats
    #[serde(default = "default_calibration_turn_limit")]
    pub turn_limit: u32,
}

impl Default for CalibrationConstants {
    fn default() -> Self {
        CalibrationConstants {
            equilibrium_low: 0.48,
            equilibrium_high: 0.52,
            hp_span_multiplier: 20.0,
            confidence_passes: 5,
            confidence_stddev_factor: 10.0,
            turn_limit: 50,
        }
    }
}

fn default_equilibrium_low() -> f64 {
    0.48
}
fn default_equilibrium_high() -> f64 {
    0.52
}
fn default_hp_span_multiplier() -> f64 {
    20.0
}
fn default_confidence_passes() -> u32 {
    5
}
fn default_confidence_stddev_factor() -> f64 {
    10.0
}
fn default_calibration_turn_limit() -> u32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_toml;

    #[test]
    fn test_default_constants() {
        let config = BalanceConfig::default();
        assert!((config.combat.min_hit_chance - 5.0).abs() < f64::EPSILON);
        assert!((config.combat.max_hit_chance - 95.0).abs() < f64::EPSILON);
        assert!((config.combat.cast_chance - 0.5).abs() < f64::EPSILON);
        assert!((config.mitigation.max_resistance - 100.0).abs() < f64::EPSILON);
        assert!((config.calibration.equilibrium_low - 0.48).abs() < f64::EPSILON);
        assert_eq!(config.calibration.confidence_passes, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_constants() {
        let toml = r#"
[combat]
min_hit_chance = 10.0
max_hit_chance = 90.0
cast_chance = 0.25
allowed_spell_kinds = ["buff"]
initiative_variance_scale = 10.0

[mitigation]
min_resistance = -100.0
max_resistance = 75.0

[baseline]
hp = 200.0
damage = 25.0

[calibration]
equilibrium_low = 0.45
equilibrium_high = 0.55
"#;

        let config: BalanceConfig = parse_toml(toml).unwrap();
        assert!((config.combat.min_hit_chance - 10.0).abs() < f64::EPSILON);
        assert!((config.combat.cast_chance - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.combat.allowed_spell_kinds, vec![SpellKind::Buff]);
        assert!((config.mitigation.max_resistance - 75.0).abs() < f64::EPSILON);
        assert!((config.baseline.hp - 200.0).abs() < f64::EPSILON);
        assert!((config.baseline.damage - 25.0).abs() < f64::EPSILON);
        // Unlisted baseline fields keep their defaults
        assert!((config.baseline.txc - StatBlock::default().txc).abs() < f64::EPSILON);
        assert!((config.calibration.equilibrium_high - 0.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config: BalanceConfig = parse_toml("").unwrap();
        assert!((config.combat.cast_chance - 0.5).abs() < f64::EPSILON);
        assert!((config.baseline.hp - StatBlock::default().hp).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_bad_cast_chance() {
        let mut config = BalanceConfig::default();
        config.combat.cast_chance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_hit_bounds() {
        let mut config = BalanceConfig::default();
        config.combat.min_hit_chance = 96.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_equilibrium_band() {
        let mut config = BalanceConfig::default();
        config.calibration.equilibrium_low = 0.52;
        assert!(config.validate().is_err());
    }
}
