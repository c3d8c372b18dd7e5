//! Projectiles launched by ranged skills

use super::{strike, HitRecord};
use crate::catalog::{Catalog, SkillDefinition};
use crate::combatant::Combatant;
use crate::event::EventQueue;
use crate::types::{EntityId, Facing, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: EntityId,
    pub skill_id: String,
    pub position: Position,
    pub direction: Facing,
    /// Units per second
    pub speed: f64,
    pub traveled: f64,
    /// The skill's range; lifetime is range / speed
    pub max_distance: f64,
    pub launched_at: u64,
}

impl Projectile {
    /// Spawn just in front of the caster, flying the way it faces
    pub fn launch(catalog: &Catalog, skill: &SkillDefinition, caster: &Combatant, now: u64) -> Self {
        let constants = &catalog.constants().skills;
        let offset = constants.projectile_spawn_offset * caster.facing.sign();
        Projectile {
            owner: caster.id,
            skill_id: skill.id.clone(),
            position: Position::new(caster.position.x + offset, caster.position.y),
            direction: caster.facing,
            speed: skill.projectile_speed.unwrap_or(constants.default_projectile_speed),
            traveled: 0.0,
            max_distance: skill.range,
            launched_at: now,
        }
    }

    /// Engine time at which the projectile runs out of range
    pub fn expires_at(&self) -> u64 {
        if self.speed <= 0.0 {
            return self.launched_at;
        }
        self.launched_at + (self.max_distance / self.speed * 1000.0) as u64
    }

    fn advance(&mut self, delta_ms: u64) {
        let step = self.speed * delta_ms as f64 / 1000.0;
        self.position.x += step * self.direction.sign();
        self.traveled += step;
    }
}

/// Advance every projectile owned by `owner`, resolving hits with the thread RNG
pub fn step_projectiles(
    catalog: &Catalog,
    projectiles: &mut Vec<Projectile>,
    owner: &Combatant,
    targets: &mut [&mut Combatant],
    delta_ms: u64,
    now: u64,
    events: &mut EventQueue,
) -> Vec<HitRecord> {
    let mut rng = rand::thread_rng();
    step_projectiles_with_rng(catalog, projectiles, owner, targets, delta_ms, now, events, &mut rng)
}

/// Advance projectiles with a provided RNG.
///
/// Each projectile sweeps the path it covered this step (cut off at its
/// range) and strikes the first live target (ascending id) closer than the
/// hit radius to that path, so long frames cannot skip over a target.
/// A projectile is consumed by its first hit and dropped once past its range.
#[allow(clippy::too_many_arguments)]
pub fn step_projectiles_with_rng(
    catalog: &Catalog,
    projectiles: &mut Vec<Projectile>,
    owner: &Combatant,
    targets: &mut [&mut Combatant],
    delta_ms: u64,
    now: u64,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) -> Vec<HitRecord> {
    let radius = catalog.constants().skills.projectile_hit_radius;
    targets.sort_by_key(|t| t.id);

    let mut hits = Vec::new();
    projectiles.retain_mut(|projectile| {
        let Some(skill) = catalog.skill(&projectile.skill_id) else {
            return false;
        };
        let from = projectile.position;
        projectile.advance(delta_ms);
        let overshoot = (projectile.traveled - projectile.max_distance).max(0.0);
        let to = Position::new(
            projectile.position.x - overshoot * projectile.direction.sign(),
            projectile.position.y,
        );

        let found = targets
            .iter_mut()
            .find(|t| t.is_alive() && distance_to_path(from, to, t.position) < radius);
        if let Some(target) = found {
            hits.push(strike(catalog, skill, owner, target, now, events, rng));
            return false;
        }
        if overshoot > 0.0 {
            trace!(skill = %projectile.skill_id, "projectile out of range");
            return false;
        }
        true
    });
    hits
}

/// Distance from `point` to the horizontal path between `from` and `to`
fn distance_to_path(from: Position, to: Position, point: Position) -> f64 {
    let nearest_x = point.x.clamp(from.x.min(to.x), from.x.max(to.x));
    point.distance_to(Position::new(nearest_x, from.y))
}
