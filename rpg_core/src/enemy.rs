//! Enemy - A combatant driven by an AI brain and a catalog template

use crate::ai::Brain;
use crate::catalog::EnemyTemplate;
use crate::combat::{apply_damage, calculate_damage_with_rng, clear_effects, roll_critical_with_rng, DamageOutcome};
use crate::combatant::{Combatant, Side};
use crate::config::GameConstants;
use crate::event::{EventQueue, GameEvent};
use crate::types::{EntityId, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Rewards rolled when an enemy dies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillRewards {
    pub xp: u64,
    pub gold: u64,
    /// One entry per successful loot roll
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub combatant: Combatant,
    pub template_id: String,
    pub brain: Brain,
    pub spawn: Position,
    /// Set while dead
    pub respawn_at: Option<u64>,
}

impl Enemy {
    pub fn spawn_with_rng(
        template: &EnemyTemplate,
        id: EntityId,
        position: Position,
        constants: &GameConstants,
        rng: &mut impl Rng,
    ) -> Self {
        Enemy {
            combatant: Combatant::new(id, template.name.clone(), Side::Enemy, template.base_stats).at(position),
            template_id: template.id.clone(),
            brain: Brain::new_with_rng(&constants.ai, rng),
            spawn: position,
            respawn_at: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.combatant.id
    }

    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }

    /// Basic attack against `target` at multiplier 1.0
    pub fn attack_with_rng(
        &self,
        target: &mut Combatant,
        constants: &GameConstants,
        events: &mut EventQueue,
        rng: &mut impl Rng,
    ) -> DamageOutcome {
        let is_critical = roll_critical_with_rng(&self.combatant, &constants.combat, rng);
        let roll = calculate_damage_with_rng(&self.combatant, target, 1.0, is_critical, &constants.combat, rng);
        let outcome = apply_damage(target, roll.damage, roll.is_critical, events);
        debug!(enemy = %self.combatant.id, target = %target.id, dealt = outcome.dealt, "enemy attack");
        outcome
    }

    /// Roll XP, gold and loot for a kill
    pub fn roll_rewards_with_rng(template: &EnemyTemplate, rng: &mut impl Rng) -> KillRewards {
        let range = template.gold_reward;
        let gold = if range.max > range.min {
            rng.gen_range(range.min..=range.max)
        } else {
            range.min
        };
        let items = template
            .loot
            .iter()
            .filter(|entry| rng.gen_bool(entry.chance.clamp(0.0, 1.0)))
            .map(|entry| entry.item_id.clone())
            .collect();
        KillRewards {
            xp: template.xp_reward,
            gold,
            items,
        }
    }

    /// Halt the enemy and schedule its respawn
    pub fn die(&mut self, template: &EnemyTemplate, now: u64, constants: &GameConstants, events: &mut EventQueue) {
        clear_effects(&mut self.combatant, events);
        let delay = if template.boss {
            constants.world.boss_respawn_ms
        } else {
            constants.world.respawn_ms
        };
        self.respawn_at = Some(now + delay);
        events.push(GameEvent::EntityDied { entity: self.id() });
        info!(enemy = %self.id(), template = %self.template_id, respawn_at = now + delay, "enemy died");
    }

    pub fn ready_to_respawn(&self, now: u64) -> bool {
        self.respawn_at.is_some_and(|at| now >= at)
    }

    /// Back at the spawn point with full health and a fresh brain
    pub fn respawn_with_rng(&mut self, constants: &GameConstants, events: &mut EventQueue, rng: &mut impl Rng) {
        self.combatant.restore_full();
        self.combatant.position = self.spawn;
        self.combatant.cooldowns.reset();
        self.brain.reset_with_rng(&constants.ai, rng);
        self.respawn_at = None;
        events.push(GameEvent::EntityRespawned { entity: self.id() });
        debug!(enemy = %self.id(), "enemy respawned");
    }
}
