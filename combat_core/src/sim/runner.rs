//! Monte Carlo batch runner
//!
//! Every iteration runs on its own RNG substream seeded with
//! `seed.wrapping_add(iteration)`, so any single encounter can be
//! replayed in isolation and results do not depend on batch size or
//! ordering. `run_batch_with_rng` instead draws sequentially from one
//! caller-owned stream.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::results::SimulationResults;
use super::simulator::{simulate, SimulationConfig};
use crate::config::{BalanceConfig, ConfigError};

/// Iterations between progress callbacks
const PROGRESS_INTERVAL: u32 = 1000;

/// Batch settings for a Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub combat: SimulationConfig,
    pub iterations: u32,
    /// Encounters from the head of the batch that keep detailed logs
    #[serde(default = "default_log_sample_size")]
    pub log_sample_size: u32,
    /// Base seed for the per-iteration substreams
    pub seed: u64,
}

fn default_log_sample_size() -> u32 {
    3
}

impl MonteCarloConfig {
    pub fn new(combat: SimulationConfig, iterations: u32, seed: u64) -> Self {
        MonteCarloConfig {
            combat,
            iterations,
            log_sample_size: default_log_sample_size(),
            seed,
        }
    }

    pub fn with_log_sample_size(mut self, log_sample_size: u32) -> Self {
        self.log_sample_size = log_sample_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ValidationError(
                "iterations must be at least 1".to_string(),
            ));
        }
        self.combat.validate()
    }
}

/// Run a batch on per-iteration substreams, reporting progress every 1000
/// iterations and once at completion
pub fn run_batch(
    config: &MonteCarloConfig,
    balance: &BalanceConfig,
    mut on_progress: Option<&mut dyn FnMut(f64)>,
) -> Result<SimulationResults, ConfigError> {
    config.validate()?;

    let mut results = Vec::with_capacity(config.iterations as usize);
    for iteration in 0..config.iterations {
        let mut combat = config.combat.clone();
        combat.detailed_logging = iteration < config.log_sample_size;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(iteration as u64));
        results.push(simulate(&combat, balance, &mut rng)?);

        if let Some(callback) = on_progress.as_mut() {
            let done = iteration + 1;
            if done % PROGRESS_INTERVAL == 0 && done < config.iterations {
                callback(done as f64 / config.iterations as f64);
            }
        }
    }
    if let Some(callback) = on_progress.as_mut() {
        callback(1.0);
    }

    Ok(SimulationResults::from_results(
        results,
        config.log_sample_size as usize,
    ))
}

/// Run a batch drawing sequentially from one shared stream. The config's
/// `seed` field is ignored; reproducibility is the caller's concern.
pub fn run_batch_with_rng(
    config: &MonteCarloConfig,
    balance: &BalanceConfig,
    rng: &mut impl Rng,
) -> Result<SimulationResults, ConfigError> {
    config.validate()?;

    let mut results = Vec::with_capacity(config.iterations as usize);
    for iteration in 0..config.iterations {
        let mut combat = config.combat.clone();
        combat.detailed_logging = iteration < config.log_sample_size;
        results.push(simulate(&combat, balance, rng)?);
    }

    Ok(SimulationResults::from_results(
        results,
        config.log_sample_size as usize,
    ))
}
