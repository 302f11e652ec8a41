//! Initiative rolls and turn ordering
//!
//! Formula: initiative = agility + variance * scale, where variance is a
//! single uniform draw from [0, 1) per entity per round. The result is
//! deliberately unclamped; a variance factor outside [0, 1] (from a
//! modified stat or custom scale) passes straight through.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One entity's roll for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    /// Index into the caller's roster
    pub entity_index: usize,
    pub agility: f64,
    /// The raw uniform draw
    pub variance: f64,
    pub total: f64,
}

/// initiative = agility + variance * scale, unclamped
pub fn calculate_initiative(agility: f64, variance: f64, scale: f64) -> f64 {
    agility + variance * scale
}

/// Roll initiative for `entries` of (roster index, agility) and return the
/// rolls sorted by descending total. One RNG draw per entry, in input
/// order; the sort is stable, so ties keep input order.
pub fn generate_detailed_rolls(
    entries: &[(usize, f64)],
    scale: f64,
    rng: &mut impl Rng,
) -> Vec<InitiativeRoll> {
    let mut rolls: Vec<InitiativeRoll> = entries
        .iter()
        .map(|&(entity_index, agility)| {
            let variance = rng.gen::<f64>();
            InitiativeRoll {
                entity_index,
                agility,
                variance,
                total: calculate_initiative(agility, variance, scale),
            }
        })
        .collect();

    rolls.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rolls
}
