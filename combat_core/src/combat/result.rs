//! CombatResult - Outcome of a resolved encounter

use serde::{Deserialize, Serialize};

use super::entity::Team;
use super::state::{CombatState, EntityMetrics, Winner};

/// Aggregates for one side of an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    /// Member names joined with ", "
    pub name: String,
    /// HP removed from the opposing side, delta-tracked
    pub damage_dealt: f64,
    pub hp_remaining: f64,
    /// HP this side lost over the encounter
    pub hp_lost: f64,
    /// Damage beyond the kill, 0 unless the opposing side fell
    pub overkill: f64,
    /// hits / attacks, 0 with no attacks
    pub hit_rate: f64,
    /// crits / hits, 0 with no hits
    pub crit_rate: f64,
}

/// Result of a fully resolved encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub winner: Winner,
    /// Rounds resolved before the encounter ended
    pub turns: u32,
    pub side_a: TeamSummary,
    pub side_b: TeamSummary,
    /// Turn-by-turn log, empty when detailed logging was off
    pub turn_log: Vec<String>,
    /// Per-entity counters, parallel to the roster
    pub metrics: Vec<EntityMetrics>,
}

fn team_summary(state: &CombatState, team: Team) -> TeamSummary {
    let enemy = team.opponent();
    let damage_dealt = state.team_hp_lost(enemy);
    let overkill = if state.team_alive(enemy) {
        0.0
    } else {
        (damage_dealt - state.team_initial_hp(enemy)).max(0.0)
    };

    let mut name_parts = Vec::new();
    let mut attacks: u32 = 0;
    let mut hits: u32 = 0;
    let mut crits: u32 = 0;
    for (entity, metrics) in state.entities.iter().zip(&state.metrics) {
        if entity.team != team {
            continue;
        }
        name_parts.push(entity.name.clone());
        attacks += metrics.attacks;
        hits += metrics.hits;
        crits += metrics.crits;
    }

    TeamSummary {
        name: name_parts.join(", "),
        damage_dealt,
        hp_remaining: state.team_hp_remaining(team),
        hp_lost: state.team_hp_lost(team),
        overkill,
        hit_rate: hits as f64 / attacks.max(1) as f64,
        crit_rate: crits as f64 / hits.max(1) as f64,
    }
}

impl CombatResult {
    /// Build a result from a finished (or turn-limited) encounter state
    pub fn from_state(state: &CombatState) -> Self {
        CombatResult {
            winner: state.winner,
            turns: state.turn,
            side_a: team_summary(state, Team::A),
            side_b: team_summary(state, Team::B),
            turn_log: state.log.clone(),
            metrics: state.metrics.clone(),
        }
    }

    /// Get a one-line summary string
    pub fn summary(&self) -> String {
        match self.winner {
            Winner::TeamA => format!("{} wins in {} turns", self.side_a.name, self.turns),
            Winner::TeamB => format!("{} wins in {} turns", self.side_b.name, self.turns),
            Winner::Draw => format!("Draw after {} turns", self.turns),
            Winner::Undetermined => format!("Unresolved after {} turns", self.turns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::entity::Combatant;
    use crate::stat_block::StatBlock;

    fn duel_state() -> CombatState {
        let a = Combatant::new(
            "a".to_string(),
            "Aldric".to_string(),
            Team::A,
            StatBlock::default(),
        );
        let b = Combatant::new(
            "b".to_string(),
            "Brakka".to_string(),
            Team::B,
            StatBlock::default(),
        );
        CombatState::new(vec![a, b], true)
    }

    #[test]
    fn test_damage_dealt_from_hp_deltas() {
        let mut state = duel_state();
        state.apply_damage(1, 40.0);
        state.apply_heal(1, 10.0);
        state.apply_damage(1, 25.0);

        let result = CombatResult::from_state(&state);
        assert!((result.side_a.damage_dealt - 65.0).abs() < f64::EPSILON);
        assert!((result.side_b.hp_lost - 65.0).abs() < f64::EPSILON);
        assert!((result.side_b.hp_remaining - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overkill_zero_while_victim_stands() {
        let mut state = duel_state();
        state.apply_damage(1, 99.0);
        let result = CombatResult::from_state(&state);
        assert!((result.side_a.overkill - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overkill_counts_healed_through_damage() {
        let mut state = duel_state();
        state.apply_damage(1, 60.0);
        state.apply_heal(1, 30.0);
        state.apply_damage(1, 70.0);
        assert!(!state.entities[1].is_alive());

        // 130 lost against a 100 HP pool
        let result = CombatResult::from_state(&state);
        assert!((result.side_a.overkill - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rates_guard_zero_denominators() {
        let state = duel_state();
        let result = CombatResult::from_state(&state);
        assert!((result.side_a.hit_rate - 0.0).abs() < f64::EPSILON);
        assert!((result.side_a.crit_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rates_from_metrics() {
        let mut state = duel_state();
        state.metrics[0].attacks = 10;
        state.metrics[0].hits = 7;
        state.metrics[0].crits = 2;

        let result = CombatResult::from_state(&state);
        assert!((result.side_a.hit_rate - 0.7).abs() < f64::EPSILON);
        assert!((result.side_a.crit_rate - 2.0 / 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_wording() {
        let mut state = duel_state();
        state.turn = 12;
        state.winner = Winner::TeamA;
        let result = CombatResult::from_state(&state);
        assert_eq!(result.summary(), "Aldric wins in 12 turns");

        state.winner = Winner::Draw;
        let result = CombatResult::from_state(&state);
        assert_eq!(result.summary(), "Draw after 12 turns");
    }
}
