//! Combat resolution - Damage rolls, damage application and status effects

mod damage;
mod resolution;
mod result;
mod status;

pub use damage::{calculate_damage, calculate_damage_with_rng, roll_critical, roll_critical_with_rng};
pub use resolution::apply_damage;
pub use result::{DamageOutcome, DamageRoll, EffectTickReport};
pub use status::{apply_status_effect, clear_effects, tick_status_effects};
