//! Round resolution state machine
//!
//! One call resolves one full round in five fixed phases: regen, effect
//! processing, initiative, per-actor turns, end-of-round check. Entity
//! actionability comes from the phase-2 processing snapshot, so an effect
//! that expires on this round's tick still governs this round.
//!
//! All damage and healing is rounded to the nearest integer before it
//! touches an HP pool. Calibration reproducibility depends on both the
//! rounding and the fixed RNG draw order: per actor, one draw for the
//! target pick, then (when the actor has castable spells) one for the
//! cast decision, then either one for the spell pick or one for to-hit
//! plus one for the outcome.

use rand::Rng;

use super::entity::{Combatant, SpellKind, Team};
use super::state::{CombatState, Winner};
use crate::config::BalanceConfig;
use crate::effect::{
    apply_buff, apply_damage_to_shields, apply_stat_modifiers, process_statuses, tick_buffs,
    tick_durations, tick_statuses, total_per_turn, Buff, ProcessedEffects,
};
use crate::formula::{
    calculate_hit_chance, calculate_mitigation, outcome_multiplier, roll_attack_outcome, roll_hit,
    AttackOutcome,
};
use crate::initiative::generate_detailed_rolls;
use crate::stat_block::StatKey;

/// A stat after status deltas and buff modifiers
fn effective_stat(entity: &Combatant, processed: &ProcessedEffects, stat: StatKey) -> f64 {
    let base = stat.get(&entity.stats) + processed.stat_delta(stat);
    apply_stat_modifiers(base, &entity.buffs, stat)
}

/// Uniform index draw over `len` entries
fn pick_uniform(len: usize, rng: &mut impl Rng) -> usize {
    let index = (rng.gen::<f64>() * len as f64).floor() as usize;
    index.min(len.saturating_sub(1))
}

/// Resolve one round. Sets `finished` and `winner` on the state when the
/// encounter ends during this round.
pub fn resolve_round(state: &mut CombatState, config: &BalanceConfig, rng: &mut impl Rng) {
    state.turn += 1;
    state.push_log(format!("--- Round {} ---", state.turn));

    // Phase 1: regen, before any effects land
    for index in 0..state.entities.len() {
        let entity = &state.entities[index];
        if !entity.is_alive() || entity.stats.regen <= 0.0 {
            continue;
        }
        let amount = entity.stats.regen.round();
        let healed = state.apply_heal(index, amount);
        if healed > 0.0 {
            let entity = &state.entities[index];
            state.push_log(format!(
                "{} regenerates {:.0} HP ({:.0}/{:.0})",
                entity.name, healed, entity.current_hp, entity.stats.hp
            ));
        }
    }

    // Phase 2: process status effects, apply DoT/HoT, tick durations
    let processed: Vec<ProcessedEffects> = state
        .entities
        .iter()
        .map(|e| process_statuses(&e.statuses))
        .collect();

    for index in 0..state.entities.len() {
        if !state.entities[index].is_alive() {
            continue;
        }
        let totals = total_per_turn(&state.entities[index].periodic);
        let damage = (processed[index].damage_received + totals.damage).round();
        let healing = (processed[index].healing_received + totals.healing).round();

        if damage > 0.0 {
            let lost = state.apply_damage(index, damage);
            let entity = &state.entities[index];
            state.push_log(format!(
                "{} suffers {:.0} effect damage ({:.0}/{:.0})",
                entity.name, lost, entity.current_hp, entity.stats.hp
            ));
            if !state.entities[index].is_alive() {
                let name = state.entities[index].name.clone();
                state.push_log(format!("{} is defeated", name));
            }
        }
        if healing > 0.0 && state.entities[index].is_alive() {
            let healed = state.apply_heal(index, healing);
            if healed > 0.0 {
                let entity = &state.entities[index];
                state.push_log(format!(
                    "{} recovers {:.0} HP from effects ({:.0}/{:.0})",
                    entity.name, healed, entity.current_hp, entity.stats.hp
                ));
            }
        }

        let entity = &mut state.entities[index];
        if entity.is_alive() {
            tick_statuses(&mut entity.statuses);
            tick_durations(&mut entity.periodic);
            tick_buffs(&mut entity.buffs);
        }
    }

    // Phase 3: initiative over the living roster, in roster order
    let entries: Vec<(usize, f64)> = state
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive())
        .map(|(i, e)| (i, effective_stat(e, &processed[i], StatKey::Agility)))
        .collect();
    let rolls = generate_detailed_rolls(
        &entries,
        config.combat.initiative_variance_scale,
        rng,
    );
    for roll in &rolls {
        state.metrics[roll.entity_index].initiative_rolls += 1;
    }
    if state.logging_enabled && !rolls.is_empty() {
        let order = rolls
            .iter()
            .map(|r| format!("{} ({:.1})", state.entities[r.entity_index].name, r.total))
            .collect::<Vec<_>>()
            .join(", ");
        state.push_log(format!("Initiative: {}", order));
    }

    // Phase 4: per-actor turns in initiative order
    for roll in &rolls {
        let actor_index = roll.entity_index;
        if !state.entities[actor_index].is_alive() {
            continue;
        }

        let team = state.entities[actor_index].team;
        let enemies = state.living_enemies(team);
        if enemies.is_empty() {
            state.finished = true;
            state.winner = match team {
                Team::A => Winner::TeamA,
                Team::B => Winner::TeamB,
            };
            let name = state.entities[actor_index].name.clone();
            state.push_log(format!("{} stands unopposed", name));
            return;
        }

        if !processed[actor_index].can_act {
            state.metrics[actor_index].turns_stunned += 1;
            let name = state.entities[actor_index].name.clone();
            state.push_log(format!("{} is stunned and loses the turn", name));
            continue;
        }

        let target_index = enemies[pick_uniform(enemies.len(), rng)];

        // Spell branch: cast instead of attacking
        let castable: Vec<usize> = state.entities[actor_index]
            .spells
            .iter()
            .enumerate()
            .filter(|(_, s)| config.combat.allows_spell(s.kind))
            .map(|(i, _)| i)
            .collect();
        if !castable.is_empty()
            && processed[actor_index].can_cast
            && rng.gen::<f64>() < config.combat.cast_chance
        {
            let spell_index = castable[pick_uniform(castable.len(), rng)];
            let spell = state.entities[actor_index].spells[spell_index].clone();
            let caster_name = state.entities[actor_index].name.clone();
            let receiver_index = match spell.kind {
                SpellKind::Buff => actor_index,
                SpellKind::Debuff => target_index,
            };
            let buff = Buff::from_spell(&spell, caster_name.clone());
            apply_buff(&mut state.entities[receiver_index].buffs, buff);
            state.metrics[actor_index].statuses_applied += 1;

            let receiver_name = state.entities[receiver_index].name.clone();
            state.push_log(format!(
                "{} casts {} {:+.0}% on {} for {} turns",
                caster_name,
                spell.target_stat.name(),
                match spell.kind {
                    SpellKind::Buff => spell.effect,
                    SpellKind::Debuff => -spell.effect,
                },
                receiver_name,
                spell.duration
            ));
            continue;
        }

        // Basic attack
        state.metrics[actor_index].attacks += 1;
        let (hit_chance, raw_damage, lifesteal, armor_pen, pen_percent) = {
            let actor = &state.entities[actor_index];
            let target = &state.entities[target_index];
            let chance = calculate_hit_chance(
                effective_stat(actor, &processed[actor_index], StatKey::Txc),
                effective_stat(target, &processed[target_index], StatKey::Evasion),
                config.combat.min_hit_chance,
                config.combat.max_hit_chance,
            );
            (
                chance,
                effective_stat(actor, &processed[actor_index], StatKey::Damage),
                effective_stat(actor, &processed[actor_index], StatKey::Lifesteal),
                effective_stat(actor, &processed[actor_index], StatKey::ArmorPen),
                effective_stat(actor, &processed[actor_index], StatKey::PenPercent),
            )
        };

        if !roll_hit(hit_chance, rng) {
            let actor_name = state.entities[actor_index].name.clone();
            let target_name = state.entities[target_index].name.clone();
            state.push_log(format!("{} misses {}", actor_name, target_name));
            continue;
        }
        state.metrics[actor_index].hits += 1;

        let outcome = {
            let actor = &state.entities[actor_index];
            roll_attack_outcome(
                effective_stat(actor, &processed[actor_index], StatKey::CritChance),
                effective_stat(actor, &processed[actor_index], StatKey::FailChance),
                rng,
            )
        };
        if outcome == AttackOutcome::Critical {
            state.metrics[actor_index].crits += 1;
        }

        let final_damage = {
            let actor = &state.entities[actor_index];
            let target = &state.entities[target_index];
            let multiplier = outcome_multiplier(
                outcome,
                effective_stat(actor, &processed[actor_index], StatKey::CritMult),
                effective_stat(actor, &processed[actor_index], StatKey::FailMult),
            );
            calculate_mitigation(
                raw_damage * multiplier,
                effective_stat(target, &processed[target_index], StatKey::Armor),
                effective_stat(target, &processed[target_index], StatKey::Resistance),
                armor_pen,
                pen_percent,
                target.stats.armor_before_resistance,
                config.mitigation.min_resistance,
                config.mitigation.max_resistance,
            )
            .round()
        };

        let remaining =
            apply_damage_to_shields(final_damage, &mut state.entities[target_index].buffs);
        let absorbed = final_damage - remaining;
        if absorbed > 0.0 {
            let target_name = state.entities[target_index].name.clone();
            state.push_log(format!(
                "{}'s shield absorbs {:.0} damage",
                target_name, absorbed
            ));
        }

        let dealt = state.apply_damage(target_index, remaining);
        {
            let actor_name = state.entities[actor_index].name.clone();
            let target = &state.entities[target_index];
            let quality = match outcome {
                AttackOutcome::Critical => " (critical)",
                AttackOutcome::Weak => " (weak)",
                AttackOutcome::Normal => "",
            };
            let line = format!(
                "{} hits {} for {:.0} damage{} ({:.0}/{:.0})",
                actor_name, target.name, dealt, quality, target.current_hp, target.stats.hp
            );
            state.push_log(line);
        }

        if lifesteal > 0.0 && dealt > 0.0 {
            let heal = (dealt * lifesteal / 100.0).round();
            let healed = state.apply_heal(actor_index, heal);
            if healed > 0.0 {
                let actor = &state.entities[actor_index];
                state.push_log(format!(
                    "{} drains {:.0} HP ({:.0}/{:.0})",
                    actor.name, healed, actor.current_hp, actor.stats.hp
                ));
            }
        }

        if !state.entities[target_index].is_alive() {
            let name = state.entities[target_index].name.clone();
            state.push_log(format!("{} is defeated", name));
        }
    }

    // Phase 5: end-of-round verdict
    let a_alive = state.team_alive(Team::A);
    let b_alive = state.team_alive(Team::B);
    match (a_alive, b_alive) {
        (false, false) => {
            state.finished = true;
            state.winner = Winner::Draw;
            state.push_log("Both sides fall".to_string());
        }
        (true, false) => {
            state.finished = true;
            state.winner = Winner::TeamA;
        }
        (false, true) => {
            state.finished = true;
            state.winner = Winner::TeamB;
        }
        (true, true) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::entity::Spell;
    use crate::effect::{BuffEffect, EffectKind, PeriodicEffect, StackMode, StatusEffect, StatusKind};
    use crate::stat_block::StatBlock;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn harmless() -> StatBlock {
        StatBlock {
            damage: 0.0,
            crit_chance: 0.0,
            fail_chance: 0.0,
            regen: 0.0,
            lifesteal: 0.0,
            armor: 0.0,
            resistance: 0.0,
            ..StatBlock::default()
        }
    }

    fn duel(a: StatBlock, b: StatBlock) -> CombatState {
        let a = Combatant::new("a".to_string(), "Aldric".to_string(), Team::A, a);
        let b = Combatant::new("b".to_string(), "Brakka".to_string(), Team::B, b);
        CombatState::new(vec![a, b], true)
    }

    /// Config where every attack lands and no spell is ever cast
    fn sure_hit_config() -> BalanceConfig {
        let mut config = BalanceConfig::default();
        config.combat.min_hit_chance = 100.0;
        config.combat.max_hit_chance = 100.0;
        config.combat.cast_chance = 0.0;
        config
    }

    #[test]
    fn test_regen_heals_capped_at_max() {
        let mut attacker = harmless();
        attacker.regen = 10.0;
        let mut state = duel(attacker, harmless());
        state.entities[0].current_hp = 92.0;

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        assert!((state.entities[0].current_hp - 100.0).abs() < f64::EPSILON);
        assert!((state.hp_healed[0] - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stunned_actor_skips_turn() {
        let mut state = duel(harmless(), harmless());
        state.entities[1]
            .statuses
            .push(StatusEffect::new("dazed".to_string(), StatusKind::Stun, 2));

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        assert_eq!(state.metrics[1].turns_stunned, 1);
        assert_eq!(state.metrics[1].attacks, 0);
        assert_eq!(state.metrics[0].attacks, 1);
    }

    #[test]
    fn test_effect_death_hands_win_to_survivor() {
        let mut state = duel(harmless(), harmless());
        state.entities[1].current_hp = 30.0;
        state.entities[1].periodic.push(PeriodicEffect::new(
            "poison".to_string(),
            "a".to_string(),
            EffectKind::Damage,
            50.0,
            3,
            StackMode::None,
        ));

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        assert!(state.finished);
        assert_eq!(state.winner, Winner::TeamA);
        assert!(!state.entities[1].is_alive());
    }

    #[test]
    fn test_shield_absorbs_then_breaks() {
        let mut attacker = harmless();
        attacker.damage = 20.0;
        let mut state = duel(attacker, harmless());
        state.entities[1].buffs.push(Buff::shield(
            "ward".to_string(),
            "b".to_string(),
            30.0,
            9,
        ));

        let config = sure_hit_config();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        resolve_round(&mut state, &config, &mut rng);
        assert!((state.entities[1].current_hp - 100.0).abs() < f64::EPSILON);
        match &state.entities[1].buffs[0].effect {
            BuffEffect::Shield { current, .. } => assert!((current - 10.0).abs() < f64::EPSILON),
            other => panic!("unexpected effect: {:?}", other),
        }

        resolve_round(&mut state, &config, &mut rng);
        // 10 absorbed, 10 through, depleted shield removed
        assert!((state.entities[1].current_hp - 90.0).abs() < f64::EPSILON);
        assert!(state.entities[1].buffs.is_empty());
    }

    #[test]
    fn test_lifesteal_heals_capped() {
        let mut attacker = harmless();
        attacker.damage = 20.0;
        attacker.lifesteal = 50.0;
        let mut state = duel(attacker, harmless());
        state.entities[0].current_hp = 95.0;

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        // 20 dealt, 10 drained, capped at the 5 missing
        assert!((state.entities[0].current_hp - 100.0).abs() < f64::EPSILON);
        assert!((state.hp_healed[0] - 5.0).abs() < f64::EPSILON);
        assert!((state.entities[1].current_hp - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_killing_blow_finishes_encounter() {
        let mut attacker = harmless();
        attacker.damage = 250.0;
        let mut state = duel(attacker, harmless());

        let mut rng = ChaCha8Rng::seed_from_u64(6);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        assert!(state.finished);
        assert_eq!(state.winner, Winner::TeamA);
        assert!((state.entities[1].current_hp - 0.0).abs() < f64::EPSILON);
        assert!(state.log.iter().any(|l| l.contains("is defeated")));
    }

    #[test]
    fn test_mutual_effect_death_is_draw() {
        let mut state = duel(harmless(), harmless());
        for index in 0..2 {
            state.entities[index].current_hp = 10.0;
            state.entities[index].periodic.push(PeriodicEffect::new(
                "doom".to_string(),
                "fate".to_string(),
                EffectKind::Damage,
                25.0,
                2,
                StackMode::None,
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        assert!(state.finished);
        assert_eq!(state.winner, Winner::Draw);
    }

    #[test]
    fn test_guaranteed_cast_applies_self_buff() {
        let mut state = duel(harmless(), harmless());
        state.entities[0].spells.push(Spell {
            kind: SpellKind::Buff,
            target_stat: StatKey::Damage,
            effect: 20.0,
            duration: 3,
        });

        let mut config = sure_hit_config();
        config.combat.cast_chance = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        resolve_round(&mut state, &config, &mut rng);

        assert_eq!(state.entities[0].buffs.len(), 1);
        assert_eq!(state.metrics[0].statuses_applied, 1);
        assert_eq!(state.metrics[0].attacks, 0);
    }

    #[test]
    fn test_guaranteed_cast_debuff_lands_on_enemy() {
        let mut state = duel(harmless(), harmless());
        state.entities[0].spells.push(Spell {
            kind: SpellKind::Debuff,
            target_stat: StatKey::Armor,
            effect: 25.0,
            duration: 2,
        });

        let mut config = sure_hit_config();
        config.combat.cast_chance = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        resolve_round(&mut state, &config, &mut rng);

        assert_eq!(state.entities[1].buffs.len(), 1);
        match &state.entities[1].buffs[0].effect {
            BuffEffect::StatModifier { value, .. } => {
                assert!((value - (-25.0)).abs() < f64::EPSILON)
            }
            other => panic!("unexpected effect: {:?}", other),
        }
    }

    #[test]
    fn test_zero_cast_chance_always_attacks() {
        let mut attacker = harmless();
        attacker.damage = 10.0;
        let mut state = duel(attacker, harmless());
        state.entities[0].spells.push(Spell {
            kind: SpellKind::Buff,
            target_stat: StatKey::Damage,
            effect: 20.0,
            duration: 3,
        });

        let mut rng = ChaCha8Rng::seed_from_u64(10);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        assert_eq!(state.metrics[0].attacks, 1);
        assert!(state.entities[0].buffs.is_empty());
    }

    #[test]
    fn test_forced_miss_deals_nothing() {
        let mut attacker = harmless();
        attacker.damage = 20.0;
        let mut state = duel(attacker, harmless());

        let mut config = sure_hit_config();
        config.combat.min_hit_chance = 0.0;
        config.combat.max_hit_chance = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        resolve_round(&mut state, &config, &mut rng);

        assert_eq!(state.metrics[0].attacks, 1);
        assert_eq!(state.metrics[0].hits, 0);
        assert!((state.entities[1].current_hp - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_debuff_weakens_attacks() {
        let mut attacker = harmless();
        attacker.damage = 20.0;
        let mut state = duel(attacker, harmless());
        state.entities[0].statuses.push(StatusEffect::new(
            "enfeebled".to_string(),
            StatusKind::Debuff {
                stat: StatKey::Damage,
                amount: -5.0,
            },
            2,
        ));

        let mut rng = ChaCha8Rng::seed_from_u64(12);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        // 20 - 5 = 15 dealt
        assert!((state.entities[1].current_hp - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expiring_status_still_governs_its_round() {
        let mut state = duel(harmless(), harmless());
        state.entities[1]
            .statuses
            .push(StatusEffect::new("dazed".to_string(), StatusKind::Stun, 1));

        let config = sure_hit_config();
        let mut rng = ChaCha8Rng::seed_from_u64(13);

        resolve_round(&mut state, &config, &mut rng);
        assert_eq!(state.metrics[1].turns_stunned, 1);
        assert!(state.entities[1].statuses.is_empty());

        resolve_round(&mut state, &config, &mut rng);
        assert_eq!(state.metrics[1].turns_stunned, 1);
        assert_eq!(state.metrics[1].attacks, 1);
    }

    #[test]
    fn test_round_counter_and_log_header() {
        let mut state = duel(harmless(), harmless());
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);
        resolve_round(&mut state, &sure_hit_config(), &mut rng);

        assert_eq!(state.turn, 2);
        assert!(state.log.iter().any(|l| l == "--- Round 1 ---"));
        assert!(state.log.iter().any(|l| l == "--- Round 2 ---"));
        assert_eq!(state.metrics[0].initiative_rolls, 2);
    }
}
