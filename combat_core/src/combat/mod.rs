//! Encounter resolution: combatants, the round state machine, results

mod entity;
mod result;
mod round;
mod state;

pub use entity::{Combatant, Spell, SpellKind, Team};
pub use result::{CombatResult, TeamSummary};
pub use round::resolve_round;
pub use state::{CombatState, EntityMetrics, Winner};
