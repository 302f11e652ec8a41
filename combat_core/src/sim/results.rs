//! Aggregated Monte Carlo results and report generation

use serde::{Deserialize, Serialize};

use crate::combat::{CombatResult, Winner};

/// Win-rate proportion with its normal-approximation bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinRate {
    pub rate: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl WinRate {
    fn from_counts(successes: u32, trials: u32) -> Self {
        let rate = if trials == 0 {
            0.0
        } else {
            successes as f64 / trials as f64
        };
        let (ci_low, ci_high) = confidence_interval(successes, trials);
        WinRate {
            rate,
            ci_low,
            ci_high,
        }
    }
}

/// 95% normal-approximation interval for a proportion:
/// `p ± 1.96 * sqrt(p(1-p)/n)`, clamped to [0, 1]
pub fn confidence_interval(successes: u32, trials: u32) -> (f64, f64) {
    if trials == 0 {
        return (0.0, 0.0);
    }
    let p = successes as f64 / trials as f64;
    let half_width = 1.96 * (p * (1.0 - p) / trials as f64).sqrt();
    ((p - half_width).max(0.0), (p + half_width).min(1.0))
}

/// Per-side aggregates across a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    pub name: String,
    pub avg_damage_per_turn: f64,
    pub avg_overkill: f64,
    /// damage dealt / HP lost per encounter, 0 when nothing was lost
    pub avg_hp_efficiency: f64,
}

/// Aggregated outcome of a Monte Carlo batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub iterations: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    pub draws: u32,
    pub win_rate_a: WinRate,
    pub win_rate_b: WinRate,
    pub draw_rate: WinRate,
    pub avg_turns: f64,
    pub min_turns: u32,
    pub max_turns: u32,
    pub side_a: SideStats,
    pub side_b: SideStats,
    /// Encounters from the head of the batch with detailed logs retained
    pub samples: Vec<CombatResult>,
}

fn side_stats(results: &[CombatResult], pick_a: bool) -> SideStats {
    let count = results.len().max(1) as f64;
    let mut name = String::new();
    let mut damage_per_turn = 0.0;
    let mut overkill = 0.0;
    let mut efficiency = 0.0;
    for result in results {
        let side = if pick_a { &result.side_a } else { &result.side_b };
        if name.is_empty() {
            name = side.name.clone();
        }
        damage_per_turn += side.damage_dealt / result.turns.max(1) as f64;
        overkill += side.overkill;
        efficiency += if side.hp_lost > 0.0 {
            side.damage_dealt / side.hp_lost
        } else {
            0.0
        };
    }
    SideStats {
        name,
        avg_damage_per_turn: damage_per_turn / count,
        avg_overkill: overkill / count,
        avg_hp_efficiency: efficiency / count,
    }
}

impl SimulationResults {
    /// Aggregate a batch, retaining the first `log_sample_size` encounters
    /// as detailed samples
    pub fn from_results(results: Vec<CombatResult>, log_sample_size: usize) -> Self {
        let iterations = results.len() as u32;
        let wins_a = results
            .iter()
            .filter(|r| r.winner == Winner::TeamA)
            .count() as u32;
        let wins_b = results
            .iter()
            .filter(|r| r.winner == Winner::TeamB)
            .count() as u32;
        let draws = iterations - wins_a - wins_b;

        let avg_turns =
            results.iter().map(|r| r.turns as f64).sum::<f64>() / iterations.max(1) as f64;
        let min_turns = results.iter().map(|r| r.turns).min().unwrap_or(0);
        let max_turns = results.iter().map(|r| r.turns).max().unwrap_or(0);

        let side_a = side_stats(&results, true);
        let side_b = side_stats(&results, false);

        let samples: Vec<CombatResult> = results.into_iter().take(log_sample_size).collect();

        SimulationResults {
            iterations,
            wins_a,
            wins_b,
            draws,
            win_rate_a: WinRate::from_counts(wins_a, iterations),
            win_rate_b: WinRate::from_counts(wins_b, iterations),
            draw_rate: WinRate::from_counts(draws, iterations),
            avg_turns,
            min_turns,
            max_turns,
            side_a,
            side_b,
            samples,
        }
    }

    /// Generate a text report
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    COMBAT SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Iterations: {}    Turns: avg {:.1} (min {}, max {})\n\n",
            self.iterations, self.avg_turns, self.min_turns, self.max_turns
        ));

        report.push_str("── WIN RATES ────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  {:<16} {:>6.1}%  [{:.1}%, {:.1}%]\n",
            self.side_a.name,
            self.win_rate_a.rate * 100.0,
            self.win_rate_a.ci_low * 100.0,
            self.win_rate_a.ci_high * 100.0
        ));
        report.push_str(&format!(
            "  {:<16} {:>6.1}%  [{:.1}%, {:.1}%]\n",
            self.side_b.name,
            self.win_rate_b.rate * 100.0,
            self.win_rate_b.ci_low * 100.0,
            self.win_rate_b.ci_high * 100.0
        ));
        report.push_str(&format!(
            "  {:<16} {:>6.1}%  [{:.1}%, {:.1}%]\n\n",
            "Draws",
            self.draw_rate.rate * 100.0,
            self.draw_rate.ci_low * 100.0,
            self.draw_rate.ci_high * 100.0
        ));

        report.push_str("── DAMAGE ───────────────────────────────────────────────────────\n");
        for side in [&self.side_a, &self.side_b] {
            report.push_str(&format!(
                "  {:<16} {:>7.1} dmg/turn   {:>6.1} avg overkill   {:>5.2} hp efficiency\n",
                side.name, side.avg_damage_per_turn, side.avg_overkill, side.avg_hp_efficiency
            ));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let gap = (self.win_rate_a.rate - self.win_rate_b.rate).abs();
        let assessment = if gap < 0.04 {
            "EVEN - within the equilibrium band"
        } else if gap < 0.20 {
            "TILTED - one side has a clear edge"
        } else {
            "LOPSIDED - rebalance before shipping"
        };
        report.push_str(&format!("  {}\n", assessment));
        report.push_str(&format!(
            "  Detailed samples retained: {}\n",
            self.samples.len()
        ));

        report
    }

    /// Serialize the full results to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
