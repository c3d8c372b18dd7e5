//! Skill execution - Gating, archetype dispatch and projectiles
//!
//! A cast validates, then commits mana and cooldown, then dispatches. Once
//! committed there is no way to cancel it.

mod projectile;

pub use projectile::{step_projectiles, step_projectiles_with_rng, Projectile};

use crate::catalog::{Catalog, SkillDefinition};
use crate::combat::{apply_damage, apply_status_effect, calculate_damage_with_rng, roll_critical_with_rng};
use crate::combatant::Combatant;
use crate::event::{EventQueue, GameEvent};
use crate::types::{EntityId, Position, SkillArchetype};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Reasons a skill cannot be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkillError {
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),
    #[error("Skill on cooldown for {remaining_ms} ms")]
    OnCooldown { remaining_ms: u64 },
    #[error("Not enough mana: need {needed}, have {available}")]
    InsufficientMana { needed: u32, available: u32 },
    #[error("Caster is stunned")]
    Stunned,
    #[error("Caster is dead")]
    Dead,
}

/// One landed hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRecord {
    pub target: EntityId,
    pub damage: u32,
    pub is_critical: bool,
    pub killed: bool,
}

/// Everything a cast did
#[derive(Debug, Clone, Default)]
pub struct SkillOutcome {
    pub skill_id: String,
    pub hits: Vec<HitRecord>,
    pub healed: u32,
    pub projectile: Option<Projectile>,
    /// Destination of a movement skill, if one was found
    pub teleported_to: Option<Position>,
}

impl SkillOutcome {
    fn new(skill_id: &str) -> Self {
        SkillOutcome {
            skill_id: skill_id.to_string(),
            ..Default::default()
        }
    }

    /// Targets killed by this cast, in hit order
    pub fn kills(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.hits.iter().filter(|h| h.killed).map(|h| h.target)
    }

    pub fn total_damage(&self) -> u32 {
        self.hits.iter().map(|h| h.damage).sum()
    }
}

/// Check whether `caster` may use a skill right now
pub fn can_use_skill(
    catalog: &Catalog,
    caster: &Combatant,
    skill_id: &str,
    now: u64,
) -> Result<(), SkillError> {
    let skill = catalog
        .skill(skill_id)
        .ok_or_else(|| SkillError::UnknownSkill(skill_id.to_string()))?;
    check_gates(skill, caster, now)
}

fn check_gates(skill: &SkillDefinition, caster: &Combatant, now: u64) -> Result<(), SkillError> {
    if !caster.is_alive() {
        return Err(SkillError::Dead);
    }
    let remaining_ms = caster.cooldowns.remaining_ms(&skill.id, now);
    if remaining_ms > 0 {
        return Err(SkillError::OnCooldown { remaining_ms });
    }
    if caster.mana < skill.mana_cost {
        return Err(SkillError::InsufficientMana {
            needed: skill.mana_cost,
            available: caster.mana,
        });
    }
    if caster.is_stunned {
        return Err(SkillError::Stunned);
    }
    Ok(())
}

/// Remaining cooldown as a fraction of the skill's full cooldown
pub fn cooldown_percent(catalog: &Catalog, caster: &Combatant, skill_id: &str, now: u64) -> f64 {
    catalog
        .skill(skill_id)
        .map_or(0.0, |skill| caster.cooldowns.percent(skill_id, now, skill.cooldown_ms))
}

/// Cast a skill using the thread RNG
pub fn use_skill(
    catalog: &Catalog,
    caster: &mut Combatant,
    skill_id: &str,
    targets: &mut [&mut Combatant],
    now: u64,
    events: &mut EventQueue,
) -> Result<SkillOutcome, SkillError> {
    let mut rng = rand::thread_rng();
    use_skill_with_rng(catalog, caster, skill_id, targets, now, events, &mut rng)
}

/// Cast a skill with a provided RNG (for deterministic testing).
///
/// `targets` are the opposing combatants; they are visited in ascending
/// id order.
pub fn use_skill_with_rng(
    catalog: &Catalog,
    caster: &mut Combatant,
    skill_id: &str,
    targets: &mut [&mut Combatant],
    now: u64,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) -> Result<SkillOutcome, SkillError> {
    let skill = catalog
        .skill(skill_id)
        .ok_or_else(|| SkillError::UnknownSkill(skill_id.to_string()))?;
    check_gates(skill, caster, now)?;

    caster.mana -= skill.mana_cost;
    caster.cooldowns.start(&skill.id, now, skill.cooldown_ms);
    events.push(GameEvent::SkillUsed {
        caster: caster.id,
        skill_id: skill.id.clone(),
    });
    debug!(caster = %caster.id, skill = %skill.id, mana = caster.mana, "skill used");

    targets.sort_by_key(|t| t.id);

    let mut outcome = SkillOutcome::new(&skill.id);
    match skill.archetype {
        SkillArchetype::Melee => {
            for _ in 0..skill.hits {
                if skill.aoe {
                    for target in targets.iter_mut() {
                        if target.is_alive() && caster.distance_to(target) <= skill.range {
                            let hit = strike(catalog, skill, caster, target, now, events, rng);
                            outcome.hits.push(hit);
                        }
                    }
                    continue;
                }
                let found = targets
                    .iter_mut()
                    .find(|t| t.is_alive() && caster.distance_to(t) <= skill.range);
                if let Some(target) = found {
                    let hit = strike(catalog, skill, caster, target, now, events, rng);
                    outcome.hits.push(hit);
                }
            }
        }
        SkillArchetype::Area => {
            for target in targets.iter_mut() {
                if target.is_alive() && caster.distance_to(target) <= skill.range {
                    let hit = strike(catalog, skill, caster, target, now, events, rng);
                    outcome.hits.push(hit);
                }
            }
        }
        SkillArchetype::Projectile => {
            outcome.projectile = Some(Projectile::launch(catalog, skill, caster, now));
        }
        SkillArchetype::Buff => {
            if let Some(spec) = skill.effect_spec(&catalog.constants().effects) {
                apply_status_effect(
                    caster,
                    spec.kind,
                    spec.duration_ms,
                    spec.magnitude,
                    now,
                    &catalog.constants().combat,
                    events,
                );
            }
        }
        SkillArchetype::Heal => {
            let percent = skill.heal_percent.unwrap_or(0.0).max(0.0);
            let amount = (caster.stats.max_health as f64 * percent).floor() as u32;
            outcome.healed = caster.heal(amount);
            events.push(GameEvent::Healed {
                target: caster.id,
                amount: outcome.healed,
            });
        }
        SkillArchetype::Movement => {
            let nearest = targets
                .iter()
                .filter(|t| t.is_alive())
                .map(|t| (caster.distance_to(t), t))
                .filter(|(distance, _)| *distance <= skill.range)
                .min_by(|a, b| a.0.total_cmp(&b.0));
            if let Some((_, target)) = nearest {
                let offset = catalog.constants().skills.teleport_offset;
                let destination = Position::new(
                    target.position.x - target.facing.sign() * offset,
                    target.position.y,
                );
                caster.position = destination;
                caster.facing = target.facing.flipped();
                outcome.teleported_to = Some(destination);
                debug!(caster = %caster.id, target = %target.id, "teleported");
            } else {
                debug!(caster = %caster.id, "teleport found no target");
            }
        }
    }

    Ok(outcome)
}

/// Resolve one damage instance from a skill, plus its effect
pub(crate) fn strike(
    catalog: &Catalog,
    skill: &SkillDefinition,
    attacker: &Combatant,
    target: &mut Combatant,
    now: u64,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) -> HitRecord {
    let constants = catalog.constants();
    let is_critical = (skill.crit_from_behind && attacker.is_behind(target))
        || roll_critical_with_rng(attacker, &constants.combat, rng);
    let roll = calculate_damage_with_rng(attacker, target, skill.damage, is_critical, &constants.combat, rng);
    let result = apply_damage(target, roll.damage, roll.is_critical, events);

    if let Some(spec) = skill.effect_spec(&constants.effects) {
        apply_status_effect(
            target,
            spec.kind,
            spec.duration_ms,
            spec.magnitude,
            now,
            &constants.combat,
            events,
        );
    }

    HitRecord {
        target: target.id,
        damage: result.dealt,
        is_critical: roll.is_critical,
        killed: result.killed,
    }
}
