//! Timed effects: periodic DoT/HoT, buffs, and status conditions

mod buff;
mod periodic;
mod status;

pub use buff::{
    apply_buff, apply_damage_to_shields, apply_stat_modifiers, tick_buffs, Buff, BuffEffect,
    ModifierMode,
};
pub use periodic::{
    apply_effect, tick_durations, total_per_turn, EffectKind, PeriodicEffect, PeriodicTotals,
    StackMode,
};
pub use status::{
    apply_status, effective_stats, process_statuses, tick_statuses, ProcessedEffects,
    StatusEffect, StatusKind,
};
