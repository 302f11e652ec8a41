//! Simulation layer: single encounters, Monte Carlo batches, calibration

mod analyzer;
mod results;
mod runner;
mod simulator;

pub use analyzer::{
    calibrate_stat, confidence_from_weights, linearity_score, search_equilibrium,
    CalibrationResult, EquilibriumSearch,
};
pub use results::{confidence_interval, SideStats, SimulationResults, WinRate};
pub use runner::{run_batch, run_batch_with_rng, MonteCarloConfig};
pub use simulator::{simulate, SimulationConfig};
