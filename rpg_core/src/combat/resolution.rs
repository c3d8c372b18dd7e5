//! Damage application - Move rolled damage into a combatant's pools

use super::result::DamageOutcome;
use super::status::remove_effect;
use crate::combatant::Combatant;
use crate::event::{EventQueue, GameEvent};
use crate::types::StatusEffectKind;
use tracing::debug;

/// Apply damage to a target.
///
/// Invulnerable and already-dead targets are untouched. An active mana
/// shield soaks damage from mana 1:1 first and breaks when mana runs out.
/// `killed` is true only for the hit that takes health to zero.
pub fn apply_damage(
    target: &mut Combatant,
    damage: u32,
    is_critical: bool,
    events: &mut EventQueue,
) -> DamageOutcome {
    let mut outcome = DamageOutcome::new();
    if !target.is_alive() || target.is_invulnerable {
        return outcome;
    }

    let mut remaining = damage;
    if target.has_mana_shield {
        let absorbed = remaining.min(target.mana);
        target.mana -= absorbed;
        remaining -= absorbed;
        outcome.absorbed = absorbed;

        if target.mana == 0 {
            match target.effects.remove(StatusEffectKind::ManaShield) {
                Some(shield) => remove_effect(target, shield, events),
                None => target.has_mana_shield = false,
            }
            debug!(target = %target.id, "mana shield broken");
        }
    }

    outcome.dealt = remaining.min(target.health);
    target.health -= outcome.dealt;
    outcome.killed = target.health == 0;

    events.push(GameEvent::DamageApplied {
        target: target.id,
        x: target.position.x,
        y: target.position.y,
        amount: outcome.dealt,
        is_critical,
    });
    debug!(
        target = %target.id,
        dealt = outcome.dealt,
        absorbed = outcome.absorbed,
        health = target.health,
        "damage applied"
    );

    outcome
}
