//! Mutable encounter state shared across rounds
//!
//! All HP changes funnel through `apply_damage` and `apply_heal` so the
//! per-entity lifetime totals stay consistent with the HP bars. Damage
//! accounting is HP-delta based: an entity that takes 50, heals 30, and
//! takes 80 has lost 130 HP in total even though its pool is only 100.

use serde::{Deserialize, Serialize};

use super::entity::{Combatant, Team};

/// Final verdict of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    TeamA,
    TeamB,
    Draw,
    Undetermined,
}

/// Per-entity counters accumulated over an encounter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityMetrics {
    pub name: String,
    pub attacks: u32,
    pub hits: u32,
    pub crits: u32,
    pub initiative_rolls: u32,
    pub statuses_applied: u32,
    pub turns_stunned: u32,
}

/// Live state of one encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Rounds resolved so far
    pub turn: u32,
    pub entities: Vec<Combatant>,
    pub log: Vec<String>,
    pub finished: bool,
    pub winner: Winner,
    /// Parallel to `entities`
    pub metrics: Vec<EntityMetrics>,
    /// Lifetime HP lost per entity, parallel to `entities`
    pub hp_lost: Vec<f64>,
    /// Lifetime HP healed per entity, parallel to `entities`
    pub hp_healed: Vec<f64>,
    pub logging_enabled: bool,
}

impl CombatState {
    pub fn new(entities: Vec<Combatant>, logging_enabled: bool) -> Self {
        let metrics = entities
            .iter()
            .map(|e| EntityMetrics {
                name: e.name.clone(),
                ..Default::default()
            })
            .collect();
        let count = entities.len();
        CombatState {
            turn: 0,
            entities,
            log: Vec::new(),
            finished: false,
            winner: Winner::Undetermined,
            metrics,
            hp_lost: vec![0.0; count],
            hp_healed: vec![0.0; count],
            logging_enabled,
        }
    }

    /// Append a line to the encounter log when logging is on
    pub fn push_log(&mut self, line: String) {
        if self.logging_enabled {
            self.log.push(line);
        }
    }

    /// Indices of living members of a team
    pub fn living_members(&self, team: Team) -> Vec<usize> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.team == team && e.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of living enemies of a team
    pub fn living_enemies(&self, team: Team) -> Vec<usize> {
        self.living_members(team.opponent())
    }

    pub fn team_alive(&self, team: Team) -> bool {
        self.entities
            .iter()
            .any(|e| e.team == team && e.is_alive())
    }

    /// Remove HP from an entity, flooring the pool at zero. Returns the
    /// HP actually removed and adds it to the lifetime total.
    pub fn apply_damage(&mut self, index: usize, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let entity = &mut self.entities[index];
        let lost = amount.min(entity.current_hp);
        entity.current_hp -= lost;
        self.hp_lost[index] += lost;
        lost
    }

    /// Restore HP to an entity, capped at the stat block's maximum.
    /// Returns the HP actually restored.
    pub fn apply_heal(&mut self, index: usize, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let entity = &mut self.entities[index];
        let healed = amount.min(entity.stats.hp - entity.current_hp);
        let healed = healed.max(0.0);
        entity.current_hp += healed;
        self.hp_healed[index] += healed;
        healed
    }

    /// Lifetime HP lost by every member of a team
    pub fn team_hp_lost(&self, team: Team) -> f64 {
        self.entities
            .iter()
            .zip(&self.hp_lost)
            .filter(|(e, _)| e.team == team)
            .map(|(_, lost)| *lost)
            .sum()
    }

    /// Remaining HP across a team
    pub fn team_hp_remaining(&self, team: Team) -> f64 {
        self.entities
            .iter()
            .filter(|e| e.team == team)
            .map(|e| e.current_hp)
            .sum()
    }

    /// Starting HP across a team
    pub fn team_initial_hp(&self, team: Team) -> f64 {
        self.entities
            .iter()
            .filter(|e| e.team == team)
            .map(|e| e.stats.hp)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_block::StatBlock;

    fn duel() -> CombatState {
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
    fn test_damage_floors_at_zero() {
        let mut state = duel();
        let lost = state.apply_damage(0, 150.0);
        assert!((lost - 100.0).abs() < f64::EPSILON);
        assert!((state.entities[0].current_hp - 0.0).abs() < f64::EPSILON);
        assert!((state.hp_lost[0] - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut state = duel();
        state.apply_damage(0, 30.0);
        let healed = state.apply_heal(0, 50.0);
        assert!((healed - 30.0).abs() < f64::EPSILON);
        assert!((state.entities[0].current_hp - 100.0).abs() < f64::EPSILON);
        assert!((state.hp_healed[0] - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lifetime_loss_can_exceed_pool() {
        let mut state = duel();
        state.apply_damage(0, 50.0);
        state.apply_heal(0, 30.0);
        state.apply_damage(0, 80.0);
        assert!((state.hp_lost[0] - 130.0).abs() < f64::EPSILON);
        assert!(!state.entities[0].is_alive());
    }

    #[test]
    fn test_non_positive_amounts_ignored() {
        let mut state = duel();
        assert!((state.apply_damage(0, 0.0)).abs() < f64::EPSILON);
        assert!((state.apply_damage(0, -5.0)).abs() < f64::EPSILON);
        assert!((state.apply_heal(0, -5.0)).abs() < f64::EPSILON);
        assert!((state.entities[0].current_hp - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_living_enemies() {
        let mut state = duel();
        assert_eq!(state.living_enemies(Team::A), vec![1]);
        state.apply_damage(1, 200.0);
        assert!(state.living_enemies(Team::A).is_empty());
        assert!(!state.team_alive(Team::B));
    }

    #[test]
    fn test_log_gating() {
        let mut state = duel();
        state.logging_enabled = false;
        state.push_log("quiet".to_string());
        assert!(state.log.is_empty());

        state.logging_enabled = true;
        state.push_log("loud".to_string());
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn test_team_totals() {
        let mut state = duel();
        state.apply_damage(1, 40.0);
        assert!((state.team_hp_lost(Team::B) - 40.0).abs() < f64::EPSILON);
        assert!((state.team_hp_remaining(Team::B) - 60.0).abs() < f64::EPSILON);
        assert!((state.team_initial_hp(Team::B) - 100.0).abs() < f64::EPSILON);
    }
}
