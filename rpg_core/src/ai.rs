//! Enemy AI - idle/patrol/chase/attack state machine
//!
//! The brain only decides movement and when to swing. Damage for an attack
//! is resolved by the caller, which owns both combatants.

use crate::catalog::EnemyTemplate;
use crate::combatant::Combatant;
use crate::config::{AiConstants, GameConstants};
use crate::types::Facing;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cooldown key for an enemy's basic attack
pub const ATTACK_COOLDOWN: &str = "attack";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiState {
    Idle,
    Patrol,
    Chase,
    Attack,
}

/// What the enemy wants to do this tick besides moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    None,
    /// Swing at the player; the player was within attack range
    Attack,
}

/// Per-enemy AI memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brain {
    pub state: AiState,
    /// +1.0 or -1.0
    pub patrol_direction: f64,
    /// Time spent in the current state
    pub timer_ms: u64,
    pub idle_duration_ms: u64,
    pub patrol_duration_ms: u64,
}

impl Brain {
    pub fn new_with_rng(constants: &AiConstants, rng: &mut impl Rng) -> Self {
        let mut brain = Brain {
            state: AiState::Idle,
            patrol_direction: 1.0,
            timer_ms: 0,
            idle_duration_ms: 0,
            patrol_duration_ms: 0,
        };
        brain.reroll(constants, rng);
        brain
    }

    /// Back to idle with fresh timers, as after a respawn
    pub fn reset_with_rng(&mut self, constants: &AiConstants, rng: &mut impl Rng) {
        self.enter(AiState::Idle);
        self.reroll(constants, rng);
    }

    fn reroll(&mut self, constants: &AiConstants, rng: &mut impl Rng) {
        self.idle_duration_ms = roll_between(rng, constants.idle_min_ms, constants.idle_max_ms);
        self.patrol_duration_ms = roll_between(rng, constants.patrol_min_ms, constants.patrol_max_ms);
    }

    fn enter(&mut self, state: AiState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "ai transition");
        }
        self.state = state;
        self.timer_ms = 0;
    }
}

fn roll_between(rng: &mut impl Rng, min: u64, max: u64) -> u64 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

/// Horizontal leash around a spawn point, kept inside the map edges
pub fn patrol_bounds(spawn_x: f64, constants: &GameConstants) -> (f64, f64) {
    let ai = &constants.ai;
    let min = (spawn_x - ai.patrol_half_width).max(ai.edge_margin);
    let max = (spawn_x + ai.patrol_half_width).min(constants.world.map_width - ai.edge_margin);
    (min, max.max(min))
}

/// Advance one enemy's AI by `delta_ms`.
///
/// `player` is `None` when there is no living player to react to.
#[allow(clippy::too_many_arguments)]
pub fn update_ai_with_rng(
    brain: &mut Brain,
    enemy: &mut Combatant,
    template: &EnemyTemplate,
    spawn_x: f64,
    player: Option<&Combatant>,
    delta_ms: u64,
    now: u64,
    constants: &GameConstants,
    rng: &mut impl Rng,
) -> AiAction {
    let player = match player {
        Some(p) if p.is_alive() && !enemy.is_stunned => p,
        _ => return AiAction::None,
    };

    let ai = &constants.ai;
    let distance = enemy.distance_to(player);
    let aggro = distance < template.aggro_range && template.behavior.initiates_chase();
    let mut velocity = 0.0;
    let mut action = AiAction::None;

    match brain.state {
        AiState::Idle => {
            brain.timer_ms += delta_ms;
            if aggro {
                brain.enter(AiState::Chase);
            } else if brain.timer_ms >= brain.idle_duration_ms {
                brain.enter(AiState::Patrol);
            }
        }
        AiState::Patrol => {
            brain.timer_ms += delta_ms;
            if aggro {
                brain.enter(AiState::Chase);
            } else {
                velocity = brain.patrol_direction
                    * enemy.stats.speed as f64
                    * ai.patrol_speed_factor
                    * enemy.speed_multiplier;
                enemy.facing = if brain.patrol_direction > 0.0 { Facing::Right } else { Facing::Left };
                if brain.timer_ms >= brain.patrol_duration_ms {
                    brain.patrol_direction = -brain.patrol_direction;
                    brain.enter(AiState::Idle);
                    brain.reroll(ai, rng);
                }
            }
        }
        AiState::Chase => {
            if distance > template.aggro_range * ai.disengage_factor {
                brain.enter(AiState::Idle);
            } else if distance <= template.attack_range {
                brain.enter(AiState::Attack);
            } else {
                enemy.facing = Facing::toward(enemy.position, player.position);
                velocity = enemy.facing.sign() * enemy.stats.speed as f64 * enemy.speed_multiplier;
            }
        }
        AiState::Attack => {
            if distance > template.attack_range * ai.disengage_factor {
                brain.enter(AiState::Chase);
            } else {
                enemy.facing = Facing::toward(enemy.position, player.position);
                if enemy.cooldowns.is_ready(ATTACK_COOLDOWN, now) {
                    enemy
                        .cooldowns
                        .start(ATTACK_COOLDOWN, now, template.attack_cooldown_ms);
                    if distance <= template.attack_range {
                        action = AiAction::Attack;
                    }
                }
            }
        }
    }

    enemy.position.x += velocity * delta_ms as f64 / 1000.0;
    let (min_x, max_x) = patrol_bounds(spawn_x, constants);
    if enemy.position.x < min_x {
        enemy.position.x = min_x;
        brain.patrol_direction = 1.0;
    } else if enemy.position.x > max_x {
        enemy.position.x = max_x;
        brain.patrol_direction = -1.0;
    }

    action
}
