//! Combat balance simulator CLI.
//!
//! Run Monte Carlo combat batches or calibrate the HP weight of a stat.
//!
//! Usage:
//!   cargo run -p balance_cli -- [OPTIONS]
//!
//! Examples:
//!   cargo run -p balance_cli                            # Mirror match, 10000 combats
//!   cargo run -p balance_cli -- --preset bruiser_tank   # Sustain vs mitigation
//!   cargo run -p balance_cli -- --calibrate damage      # HP weight of one damage point

use combat_core::combat::{Spell, SpellKind};
use combat_core::config::{load_toml, BalanceConfig};
use combat_core::sim::{calibrate_stat, run_batch, MonteCarloConfig, SimulationConfig};
use combat_core::stat_block::{EntityStats, StatKey};
use std::env;
use std::path::Path;

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              COMBAT BALANCE SIMULATOR                         ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();

    let balance = load_balance(options.config_path.as_deref());

    match &options.calibrate {
        Some(stat_name) => run_calibration(stat_name, &options, &balance),
        None => run_simulation(&options, &balance),
    }
}

fn run_simulation(options: &CliOptions, balance: &BalanceConfig) {
    let (entity_a, entity_b) = preset_matchup(&options.preset);

    println!("Configuration:");
    println!("  Matchup:        {} vs {}", entity_a.name, entity_b.name);
    println!("  Iterations:     {}", options.iterations);
    println!("  Turn Limit:     {}", options.turn_limit);
    println!("  Seed:           {}", options.seed);
    if let Some(path) = &options.config_path {
        println!("  Balance file:   {}", path);
    }
    println!();
    println!("Running simulation...");

    let combat = SimulationConfig::new(entity_a, entity_b).with_turn_limit(options.turn_limit);
    let config = MonteCarloConfig::new(combat, options.iterations, options.seed)
        .with_log_sample_size(options.log_sample_size);

    let mut on_progress = |fraction: f64| {
        println!("  {:>5.1}% complete", fraction * 100.0);
    };
    let results = match run_batch(&config, balance, Some(&mut on_progress)) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("Simulation failed: {}", err);
            std::process::exit(1);
        }
    };

    println!();
    println!("{}", results.to_text());

    if options.show_sample {
        if let Some(sample) = results.samples.first() {
            println!("── SAMPLE COMBAT ────────────────────────────────────────────────");
            for line in &sample.turn_log {
                println!("  {}", line);
            }
            println!();
        }
    }

    if options.json {
        let filename = format!("balance_report_{}.json", options.seed);
        if let Err(err) = std::fs::write(&filename, results.to_json()) {
            eprintln!("Failed to write JSON report: {}", err);
            std::process::exit(1);
        }
        println!("JSON report saved to: {}", filename);
    }
}

fn run_calibration(stat_name: &str, options: &CliOptions, balance: &BalanceConfig) {
    let stat: StatKey = match stat_name.parse() {
        Ok(stat) => stat,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    println!("Configuration:");
    println!("  Stat:           {}", stat.name());
    println!("  Increment:      +{}", options.increment);
    println!("  Iterations:     {} per batch", options.iterations);
    println!("  Seed:           {}", options.seed);
    if let Some(path) = &options.config_path {
        println!("  Balance file:   {}", path);
    }
    println!();
    println!("Calibrating (several Monte Carlo batches, this can take a while)...");
    println!();

    let result = match calibrate_stat(
        stat,
        options.increment,
        options.iterations,
        options.seed,
        balance,
    ) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Calibration failed: {}", err);
            std::process::exit(1);
        }
    };

    println!("{}", result.to_text());

    if options.json {
        let filename = format!("calibration_{}.json", stat.name());
        let json = serde_json::to_string_pretty(&result).unwrap_or_else(|_| "{}".to_string());
        if let Err(err) = std::fs::write(&filename, json) {
            eprintln!("Failed to write JSON report: {}", err);
            std::process::exit(1);
        }
        println!("JSON report saved to: {}", filename);
    }
}

fn load_balance(path: Option<&str>) -> BalanceConfig {
    let balance = match path {
        Some(path) => match load_toml::<BalanceConfig>(Path::new(path)) {
            Ok(balance) => balance,
            Err(err) => {
                eprintln!("Failed to load balance config '{}': {}", path, err);
                std::process::exit(1);
            }
        },
        None => BalanceConfig::default(),
    };
    if let Err(err) = balance.validate() {
        eprintln!("Invalid balance config: {}", err);
        std::process::exit(1);
    }
    balance
}

/// Built-in matchups covering the archetypes the balance team watches
fn preset_matchup(preset: &str) -> (EntityStats, EntityStats) {
    match preset {
        "mirror" => (EntityStats::new("Mirror A"), EntityStats::new("Mirror B")),
        "bruiser_tank" => {
            let bruiser = EntityStats::new("Bruiser")
                .with_damage(30.0)
                .with_lifesteal(12.0)
                .with_spell(Spell {
                    kind: SpellKind::Buff,
                    target_stat: StatKey::Damage,
                    effect: 20.0,
                    duration: 3,
                });
            let tank = EntityStats::new("Tank")
                .with_hp(170.0)
                .with_armor(14.0)
                .with_resistance(25.0)
                .with_regen(4.0);
            (bruiser, tank)
        }
        "assassin_juggernaut" => {
            let assassin = EntityStats::new("Assassin")
                .with_damage(26.0)
                .with_stat(StatKey::CritChance, 30.0)
                .with_evasion(25.0)
                .with_agility(18.0)
                .with_spell(Spell {
                    kind: SpellKind::Debuff,
                    target_stat: StatKey::Armor,
                    effect: 30.0,
                    duration: 2,
                });
            let juggernaut = EntityStats::new("Juggernaut")
                .with_hp(190.0)
                .with_damage(24.0)
                .with_armor(12.0)
                .with_agility(6.0);
            (assassin, juggernaut)
        }
        other => {
            eprintln!(
                "Unknown preset '{}', expected one of: mirror, bruiser_tank, assassin_juggernaut",
                other
            );
            std::process::exit(1);
        }
    }
}

struct CliOptions {
    iterations: u32,
    seed: u64,
    turn_limit: u32,
    log_sample_size: u32,
    preset: String,
    config_path: Option<String>,
    calibrate: Option<String>,
    increment: f64,
    show_sample: bool,
    json: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            iterations: 10_000,
            seed: 42,
            turn_limit: 50,
            log_sample_size: 3,
            preset: "mirror".to_string(),
            config_path: None,
            calibrate: None,
            increment: 5.0,
            show_sample: false,
            json: false,
        }
    }
}

fn parse_args(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--iterations" => {
                if i + 1 < args.len() {
                    options.iterations = args[i + 1].parse().unwrap_or(10_000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    options.seed = args[i + 1].parse().unwrap_or(42);
                    i += 1;
                }
            }
            "-t" | "--turns" => {
                if i + 1 < args.len() {
                    options.turn_limit = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--log-sample" => {
                if i + 1 < args.len() {
                    options.log_sample_size = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--preset" => {
                if i + 1 < args.len() {
                    options.preset = args[i + 1].clone();
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    options.config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--calibrate" => {
                if i + 1 < args.len() {
                    options.calibrate = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--increment" => {
                if i + 1 < args.len() {
                    options.increment = args[i + 1].parse().unwrap_or(5.0);
                    i += 1;
                }
            }
            "--show-sample" => {
                options.show_sample = true;
            }
            "--json" => {
                options.json = true;
            }
            "--quick" => {
                options.iterations = 1_000;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    options
}

fn print_help() {
    println!("Combat Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run -p balance_cli -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --iterations <N>   Combats per batch (default: 10000)");
    println!("    -s, --seed <S>         Random seed (default: 42)");
    println!("    -t, --turns <T>        Turn limit before a draw (default: 50)");
    println!("    --preset <NAME>        Matchup: mirror, bruiser_tank, assassin_juggernaut");
    println!("    --config <PATH>        Load balance constants from a TOML file");
    println!("    --calibrate <STAT>     Measure a stat's HP weight instead of simulating");
    println!("    --increment <P>        Stat points added during calibration (default: 5)");
    println!("    --log-sample <N>       Combats to keep full logs for (default: 3)");
    println!("    --show-sample          Print one full combat log after the report");
    println!("    --json                 Save a JSON report next to the text output");
    println!("    --quick                Quick pass (1000 combats)");
    println!("    -h, --help             Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run -p balance_cli                            # Mirror match");
    println!("    cargo run -p balance_cli -- --preset bruiser_tank   # Sustain vs mitigation");
    println!("    cargo run -p balance_cli -- --calibrate damage      # HP weight of damage");
    println!("    cargo run -p balance_cli -- -n 2000 -s 7            # Short reproducible pass");
    println!("    cargo run -p balance_cli -- --config balance_cli/config/balance.toml");
}
