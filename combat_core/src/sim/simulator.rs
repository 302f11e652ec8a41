//! Single-encounter simulation
//!
//! Resolves a pair of `EntityStats` descriptors into full combatants over
//! the configured baseline and drives the round resolver until one side
//! wins or the turn limit calls the encounter a draw.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{resolve_round, CombatResult, CombatState, Combatant, Team, Winner};
use crate::config::{BalanceConfig, ConfigError};
use crate::stat_block::EntityStats;

/// One encounter between two described entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub entity_a: EntityStats,
    pub entity_b: EntityStats,
    /// Rounds before the encounter is called a draw
    #[serde(default = "default_turn_limit")]
    pub turn_limit: u32,
    #[serde(default)]
    pub detailed_logging: bool,
}

fn default_turn_limit() -> u32 {
    50
}

impl SimulationConfig {
    pub fn new(entity_a: EntityStats, entity_b: EntityStats) -> Self {
        SimulationConfig {
            entity_a,
            entity_b,
            turn_limit: default_turn_limit(),
            detailed_logging: false,
        }
    }

    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    pub fn with_detailed_logging(mut self, enabled: bool) -> Self {
        self.detailed_logging = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_limit == 0 {
            return Err(ConfigError::ValidationError(
                "turn_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn build_combatant(descriptor: &EntityStats, team: Team, balance: &BalanceConfig) -> Combatant {
    let name = if descriptor.name.is_empty() {
        match team {
            Team::A => "Entity A".to_string(),
            Team::B => "Entity B".to_string(),
        }
    } else {
        descriptor.name.clone()
    };
    Combatant::new(
        name.clone(),
        name,
        team,
        descriptor.resolve(&balance.baseline),
    )
    .with_spells(descriptor.spells.clone())
}

/// Run one encounter to completion with the provided RNG
pub fn simulate(
    config: &SimulationConfig,
    balance: &BalanceConfig,
    rng: &mut impl Rng,
) -> Result<CombatResult, ConfigError> {
    config.validate()?;

    let a = build_combatant(&config.entity_a, Team::A, balance);
    let b = build_combatant(&config.entity_b, Team::B, balance);
    let mut state = CombatState::new(vec![a, b], config.detailed_logging);

    for _ in 0..config.turn_limit {
        resolve_round(&mut state, balance, rng);
        if state.finished {
            break;
        }
    }
    if !state.finished {
        state.finished = true;
        state.winner = Winner::Draw;
        state.push_log(format!(
            "Turn limit of {} reached, calling it a draw",
            config.turn_limit
        ));
    }

    Ok(CombatResult::from_state(&state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_block::StatKey;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Config where every attack lands, nothing crits, nobody casts
    fn plain_balance() -> BalanceConfig {
        let mut balance = BalanceConfig::default();
        balance.combat.min_hit_chance = 100.0;
        balance.combat.max_hit_chance = 100.0;
        balance.combat.cast_chance = 0.0;
        balance.baseline.crit_chance = 0.0;
        balance.baseline.fail_chance = 0.0;
        balance.baseline.armor = 0.0;
        balance
    }

    fn pacifist(name: &str) -> EntityStats {
        EntityStats::new(name.to_string()).with_stat(StatKey::Damage, 0.0)
    }

    #[test]
    fn test_turn_limit_exhaustion_is_draw() {
        let config = SimulationConfig::new(pacifist("Left"), pacifist("Right"))
            .with_turn_limit(10)
            .with_detailed_logging(true);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let result = simulate(&config, &plain_balance(), &mut rng).unwrap();

        assert_eq!(result.winner, Winner::Draw);
        assert_eq!(result.turns, 10);
        assert!(result
            .turn_log
            .iter()
            .any(|l| l.contains("Turn limit of 10")));
    }

    #[test]
    fn test_one_sided_matchup_ends_fast() {
        let juggernaut = EntityStats::new("Juggernaut".to_string()).with_damage(500.0);
        let config = SimulationConfig::new(juggernaut, pacifist("Dummy"));
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let result = simulate(&config, &plain_balance(), &mut rng).unwrap();

        assert_eq!(result.winner, Winner::TeamA);
        assert_eq!(result.turns, 1);
        assert!((result.side_b.hp_remaining - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_same_seed_bit_identical() {
        let config = SimulationConfig::new(
            EntityStats::new("Left".to_string()),
            EntityStats::new("Right".to_string()),
        )
        .with_detailed_logging(true);
        let balance = BalanceConfig::default();

        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);
        let first = simulate(&config, &balance, &mut rng_a).unwrap();
        let second = simulate(&config, &balance, &mut rng_b).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_overkill_from_regen_extended_kill() {
        // 50 per round against 100 HP plus 10 regen: dies on round 3
        // having lost 120 HP in total
        let attacker = EntityStats::new("Reaver".to_string()).with_damage(50.0);
        let healer = pacifist("Troll").with_regen(10.0);
        let config = SimulationConfig::new(attacker, healer);
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let result = simulate(&config, &plain_balance(), &mut rng).unwrap();

        assert_eq!(result.winner, Winner::TeamA);
        assert_eq!(result.turns, 3);
        assert!((result.side_a.damage_dealt - 120.0).abs() < f64::EPSILON);
        assert!((result.side_a.overkill - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unset_fields_inherit_baseline() {
        let mut balance = plain_balance();
        balance.baseline.hp = 250.0;

        let config = SimulationConfig::new(
            pacifist("Left"),
            EntityStats::new("Right".to_string()).with_stat(StatKey::Damage, 0.0),
        )
        .with_turn_limit(1);
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let result = simulate(&config, &balance, &mut rng).unwrap();

        assert!((result.side_a.hp_remaining - 250.0).abs() < f64::EPSILON);
        assert!((result.side_b.hp_remaining - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_zero_turn_limit() {
        let config =
            SimulationConfig::new(pacifist("Left"), pacifist("Right")).with_turn_limit(0);
        let mut rng = ChaCha8Rng::seed_from_u64(25);
        let error = simulate(&config, &BalanceConfig::default(), &mut rng).unwrap_err();
        assert!(error.to_string().contains("turn_limit"));
    }

    #[test]
    fn test_unlogged_run_keeps_no_lines() {
        let config = SimulationConfig::new(pacifist("Left"), pacifist("Right")).with_turn_limit(5);
        let mut rng = ChaCha8Rng::seed_from_u64(26);
        let result = simulate(&config, &plain_balance(), &mut rng).unwrap();
        assert!(result.turn_log.is_empty());
    }
}
