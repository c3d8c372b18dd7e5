//! Status effect lifecycle - apply, tick, expire and clear
//!
//! Each effect kind has an on-apply hook that fires once when the entry is
//! created and an on-remove hook that undoes it on expiry or clear.

use super::resolution::apply_damage;
use super::result::EffectTickReport;
use crate::combatant::Combatant;
use crate::config::CombatConstants;
use crate::effect::{ActiveEffect, ApplyOutcome};
use crate::event::{EventQueue, GameEvent};
use crate::types::StatusEffectKind;
use tracing::debug;

/// Slow can never remove all speed
const MAX_SLOW: f64 = 0.9;

/// Apply or refresh a status effect on a living target.
///
/// Returns `None` when the target is dead.
pub fn apply_status_effect(
    target: &mut Combatant,
    kind: StatusEffectKind,
    duration_ms: u64,
    magnitude: f64,
    now: u64,
    constants: &CombatConstants,
    events: &mut EventQueue,
) -> Option<ApplyOutcome> {
    if !target.is_alive() {
        return None;
    }

    let magnitude = match kind {
        StatusEffectKind::Slow => magnitude.clamp(0.0, MAX_SLOW),
        StatusEffectKind::AttackBoost => magnitude.max(0.0),
        _ => magnitude,
    };

    let outcome = target
        .effects
        .apply(kind, now, duration_ms, magnitude, constants.dot_tick_ms);

    match outcome {
        ApplyOutcome::Applied => {
            on_apply(target, kind, magnitude);
            events.push(GameEvent::EffectApplied {
                target: target.id,
                kind,
            });
            debug!(target = %target.id, ?kind, duration_ms, "effect applied");
        }
        ApplyOutcome::Refreshed { previous_magnitude } => {
            // Swap the multiplier contribution when the strength changed
            if previous_magnitude != magnitude {
                on_remove(target, kind, previous_magnitude);
                on_apply(target, kind, magnitude);
            }
            debug!(target = %target.id, ?kind, duration_ms, "effect refreshed");
        }
    }

    Some(outcome)
}

/// Run periodic damage and expiries for one combatant up to `now`
pub fn tick_status_effects(
    target: &mut Combatant,
    now: u64,
    constants: &CombatConstants,
    events: &mut EventQueue,
) -> EffectTickReport {
    let mut report = EffectTickReport::new();
    if !target.is_alive() {
        return report;
    }

    let per_tick = (target.stats.max_health as f64 * constants.dot_percent).floor() as u32;
    'dots: for (kind, ticks) in target.effects.collect_dot_ticks(now, constants.dot_tick_ms) {
        for _ in 0..ticks {
            let outcome = apply_damage(target, per_tick, false, events);
            report.dot_ticks += 1;
            report.dot_damage += outcome.dealt;
            if outcome.killed {
                report.killed = true;
                debug!(target = %target.id, ?kind, "killed by damage over time");
                break 'dots;
            }
        }
    }

    if report.killed {
        return report;
    }

    for effect in target.effects.take_expired(now) {
        remove_effect(target, effect, events);
        report.expired.push(effect.kind);
    }

    report
}

/// Remove every effect, firing each on-remove hook. Used on death.
pub fn clear_effects(target: &mut Combatant, events: &mut EventQueue) -> Vec<StatusEffectKind> {
    target
        .effects
        .drain()
        .into_iter()
        .map(|effect| {
            remove_effect(target, effect, events);
            effect.kind
        })
        .collect()
}

pub(super) fn remove_effect(target: &mut Combatant, effect: ActiveEffect, events: &mut EventQueue) {
    on_remove(target, effect.kind, effect.magnitude);
    events.push(GameEvent::EffectExpired {
        target: target.id,
        kind: effect.kind,
    });
    debug!(target = %target.id, kind = ?effect.kind, "effect removed");
}

fn on_apply(target: &mut Combatant, kind: StatusEffectKind, magnitude: f64) {
    match kind {
        StatusEffectKind::Stun => target.is_stunned = true,
        StatusEffectKind::Slow => target.speed_multiplier *= 1.0 - magnitude,
        StatusEffectKind::AttackBoost => target.attack_multiplier *= 1.0 + magnitude,
        StatusEffectKind::Invulnerable => target.is_invulnerable = true,
        StatusEffectKind::ManaShield => target.has_mana_shield = true,
        StatusEffectKind::Poison | StatusEffectKind::Burn => {}
    }
}

fn on_remove(target: &mut Combatant, kind: StatusEffectKind, magnitude: f64) {
    match kind {
        StatusEffectKind::Stun => target.is_stunned = false,
        StatusEffectKind::Slow => target.speed_multiplier /= 1.0 - magnitude,
        StatusEffectKind::AttackBoost => target.attack_multiplier /= 1.0 + magnitude,
        StatusEffectKind::Invulnerable => target.is_invulnerable = false,
        StatusEffectKind::ManaShield => target.has_mana_shield = false,
        StatusEffectKind::Poison | StatusEffectKind::Burn => {}
    }
}
