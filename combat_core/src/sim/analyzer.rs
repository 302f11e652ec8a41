//! Stat value calibration
//!
//! Measures what one point of a stat is worth in HP. A challenger gets
//! `increment` extra points of the stat under test; the defender's HP is
//! then binary-searched until the matchup returns to even, and the HP
//! delta per stat point is reported as the stat's weight. Repeat passes
//! feed a confidence score, and a second calibration at double the
//! increment scores how linearly the stat scales.

use serde::{Deserialize, Serialize};

use super::runner::{run_batch, MonteCarloConfig};
use super::simulator::SimulationConfig;
use crate::config::{BalanceConfig, ConfigError};
use crate::stat_block::{EntityStats, StatKey};

/// Outcome of calibrating one stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub stat: StatKey,
    /// HP value of one point of the stat
    pub weight: f64,
    /// Agreement across passes, 0 to 1
    pub confidence: f64,
    /// Scaling linearity from the double-increment check, 0 to 1
    pub linearity: f64,
    /// Iterations per Monte Carlo batch
    pub sample_size: u32,
}

impl CalibrationResult {
    /// Render the calibration as a plain-text report
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    STAT CALIBRATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!("  {:<16} {}\n", "Stat", self.stat.name()));
        report.push_str(&format!(
            "  {:<16} {:>6.2} HP per point\n",
            "Weight", self.weight
        ));
        report.push_str(&format!("  {:<16} {:>6.2}\n", "Confidence", self.confidence));
        report.push_str(&format!("  {:<16} {:>6.2}\n", "Linearity", self.linearity));
        report.push_str(&format!(
            "  {:<16} {:>6} combats per batch\n\n",
            "Sample size", self.sample_size
        ));

        let verdict = if self.confidence >= 0.8 {
            "STABLE - repeated passes agree on this weight"
        } else if self.confidence >= 0.5 {
            "NOISY - widen the sample before trusting it"
        } else {
            "UNRELIABLE - passes disagree, raise the iteration count"
        };
        report.push_str(&format!("  {}\n", verdict));

        report
    }
}

/// Result of one equilibrium search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumSearch {
    pub hp: f64,
    pub converged: bool,
}

/// Binary-search an HP value in `[low, high]` until `win_rate_fn` lands in
/// `band`. The bracket halves on whole-number midpoints and the search
/// stops once it is 1 HP wide, returning the bracket midpoint as a best
/// effort when no probe landed in the band.
pub fn search_equilibrium(
    mut win_rate_fn: impl FnMut(f64) -> Result<f64, ConfigError>,
    mut low: f64,
    mut high: f64,
    band: (f64, f64),
) -> Result<EquilibriumSearch, ConfigError> {
    while high - low > 1.0 {
        let mid = ((low + high) / 2.0).round();
        let rate = win_rate_fn(mid)?;
        if rate < band.0 {
            // Searched side loses too often at this HP, raise the floor
            low = mid;
        } else if rate > band.1 {
            high = mid;
        } else {
            return Ok(EquilibriumSearch {
                hp: mid,
                converged: true,
            });
        }
    }
    Ok(EquilibriumSearch {
        hp: (low + high) / 2.0,
        converged: false,
    })
}

/// `max(0, 1 - factor * stddev / |mean|)`, 0 when the mean is ~0
pub fn confidence_from_weights(weights: &[f64], stddev_factor: f64) -> f64 {
    if weights.is_empty() {
        return 0.0;
    }
    let mean = weights.iter().sum::<f64>() / weights.len() as f64;
    if mean.abs() < 1e-9 {
        return 0.0;
    }
    let variance = weights
        .iter()
        .map(|w| (w - mean) * (w - mean))
        .sum::<f64>()
        / weights.len() as f64;
    let relative_stddev = variance.sqrt() / mean.abs();
    (1.0 - stddev_factor * relative_stddev).max(0.0)
}

/// `1 - min(1, |w2 - w1| / |w1|)`, 0 when the base weight is ~0
pub fn linearity_score(weight: f64, weight_at_double: f64) -> f64 {
    if weight.abs() < 1e-9 {
        return 0.0;
    }
    1.0 - ((weight_at_double - weight).abs() / weight.abs()).min(1.0)
}

/// One calibration pass: the HP-per-point weight measured at `increment`
fn measure_weight(
    increment: f64,
    seed: u64,
    balance: &BalanceConfig,
    win_rate_fn: &mut impl FnMut(f64, f64, u64) -> Result<f64, ConfigError>,
) -> Result<f64, ConfigError> {
    let base_hp = balance.baseline.hp;
    let high = base_hp + increment * balance.calibration.hp_span_multiplier;
    let band = (
        balance.calibration.equilibrium_low,
        balance.calibration.equilibrium_high,
    );
    let search = search_equilibrium(|hp| win_rate_fn(increment, hp, seed), base_hp, high, band)?;
    Ok((search.hp - base_hp) / increment)
}

/// The pass loop behind [`calibrate_stat`], driven by an arbitrary
/// win-rate measurement. `win_rate_fn(increment, defender_hp, seed)`
/// reports the defender's win rate against the incremented challenger.
fn calibrate_with(
    stat: StatKey,
    increment: f64,
    iterations: u32,
    seed: u64,
    balance: &BalanceConfig,
    mut win_rate_fn: impl FnMut(f64, f64, u64) -> Result<f64, ConfigError>,
) -> Result<CalibrationResult, ConfigError> {
    let passes = balance.calibration.confidence_passes.max(1);
    let mut weights = Vec::with_capacity(passes as usize);
    for pass in 0..passes {
        let pass_seed = seed.wrapping_add((pass as u64) << 32);
        weights.push(measure_weight(increment, pass_seed, balance, &mut win_rate_fn)?);
    }
    let weight = weights.iter().sum::<f64>() / weights.len() as f64;
    let confidence =
        confidence_from_weights(&weights, balance.calibration.confidence_stddev_factor);

    let double_seed = seed.wrapping_add((passes as u64) << 32);
    let weight_at_double =
        measure_weight(increment * 2.0, double_seed, balance, &mut win_rate_fn)?;
    let linearity = linearity_score(weight, weight_at_double);

    Ok(CalibrationResult {
        stat,
        weight,
        confidence,
        linearity,
        sample_size: iterations,
    })
}

/// Calibrate the HP weight of one stat.
///
/// Runs `confidence_passes` independent passes on decorrelated seeds for
/// the weight and its confidence, then one pass at double the increment
/// for the linearity score.
pub fn calibrate_stat(
    stat: StatKey,
    increment: f64,
    iterations: u32,
    seed: u64,
    balance: &BalanceConfig,
) -> Result<CalibrationResult, ConfigError> {
    if increment <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "increment must be positive, got {}",
            increment
        )));
    }
    if iterations == 0 {
        return Err(ConfigError::ValidationError(
            "iterations must be at least 1".to_string(),
        ));
    }
    balance.validate()?;

    calibrate_with(stat, increment, iterations, seed, balance, |increment, hp, batch_seed| {
        let mut challenger = EntityStats::new("Challenger".to_string());
        challenger.set_override(stat, stat.get(&balance.baseline) + increment);
        let defender = EntityStats::new("Defender".to_string()).with_hp(hp);
        let combat = SimulationConfig::new(challenger, defender)
            .with_turn_limit(balance.calibration.turn_limit);
        let config = MonteCarloConfig::new(combat, iterations, batch_seed).with_log_sample_size(0);
        let results = run_batch(&config, balance, None)?;
        Ok(results.win_rate_b.rate)
    })
}
