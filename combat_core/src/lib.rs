//! combat_core - Turn-based combat resolution and stat calibration
//!
//! This library provides:
//! - StatBlock / EntityStats: baseline stats and per-entity overrides
//! - Effects: periodic DoT/HoT, buffs with shields, status conditions
//! - Combat: initiative, round resolution, encounter results
//! - Simulation: Monte Carlo batches with win-rate confidence intervals
//! - Calibration: HP-equivalent stat weights via equilibrium search

pub mod combat;
pub mod config;
pub mod effect;
pub mod formula;
pub mod initiative;
pub mod prelude;
pub mod sim;
pub mod stat_block;

// Re-export core types for convenience
pub use combat::{CombatResult, Combatant, Spell, SpellKind, Team, Winner};
pub use config::{BalanceConfig, ConfigError};
pub use effect::{Buff, PeriodicEffect, StackMode, StatusEffect};
pub use sim::{
    calibrate_stat, run_batch, simulate, CalibrationResult, MonteCarloConfig, SimulationConfig,
    SimulationResults,
};
pub use stat_block::{EntityStats, StatBlock, StatKey};
