//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::stat_block::{EntityStats, StatBlock, StatKey};

// Effects
pub use crate::effect::{
    Buff, BuffEffect, EffectKind, ModifierMode, PeriodicEffect, StackMode, StatusEffect,
    StatusKind,
};

// Combat
pub use crate::combat::{
    resolve_round, CombatResult, CombatState, Combatant, Spell, SpellKind, Team, Winner,
};
pub use crate::initiative::{calculate_initiative, generate_detailed_rolls, InitiativeRoll};

// Simulation and calibration
pub use crate::sim::{
    calibrate_stat, run_batch, run_batch_with_rng, simulate, CalibrationResult, MonteCarloConfig,
    SimulationConfig, SimulationResults, WinRate,
};

// Config
pub use crate::config::{BalanceConfig, ConfigError};
