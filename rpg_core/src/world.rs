//! World - Host-facing simulation loop
//!
//! Owns the player, the enemy roster, projectiles, the RNG and the engine
//! clock. Each `tick` runs a fixed pipeline:
//!
//! 1. player movement and mana regen
//! 2. enemy AI decisions
//! 3. the queued skill cast, then projectiles
//! 4. enemy attacks, then status-effect ticks
//! 5. deaths, with quest updates, rewards and XP per kill
//! 6. respawns
//!
//! so a kill that completes a quest and levels the player is fully applied
//! before `tick` returns.

use crate::ai::{update_ai_with_rng, AiAction};
use crate::catalog::{Catalog, EnemyTemplate, QuestRewards};
use crate::combat::{clear_effects, tick_status_effects};
use crate::combatant::Combatant;
use crate::enemy::{Enemy, KillRewards};
use crate::event::{EventQueue, GameEvent};
use crate::inventory::InventoryError;
use crate::player::Player;
use crate::progression::ProgressionError;
use crate::quest::QuestError;
use crate::skill::{cooldown_percent, step_projectiles_with_rng, use_skill_with_rng, Projectile, SkillError, SkillOutcome};
use crate::snapshot::{Animation, PlayerSnapshot, RelayState, RelayThrottle};
use crate::types::{EntityId, EquipSlot, MoveIntent, Position};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failures of host-driven world operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("Unknown enemy template: {0}")]
    UnknownEnemy(String),
    #[error(transparent)]
    Skill(#[from] SkillError),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Quest(#[from] QuestError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error("Player is dead")]
    PlayerDead,
}

/// Discrete input for the next tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub movement: MoveIntent,
    /// Skill slot to cast; slot 0 is the basic attack
    pub skill_slot: Option<usize>,
}

/// What a tick did, beyond the events it queued
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Result of the queued cast, if one was queued
    pub cast: Option<Result<SkillOutcome, SkillError>>,
    /// Enemies that died this tick, ascending id
    pub kills: Vec<EntityId>,
    pub levels_gained: u32,
    pub player_died: bool,
}

pub struct World {
    catalog: Arc<Catalog>,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    events: EventQueue,
    rng: ChaCha8Rng,
    now: u64,
    next_id: u32,
    input: TickInput,
    player_down: bool,
    animation: Animation,
    relay: RelayThrottle,
}

impl World {
    /// A world with a fresh level-1 player, seeded from entropy
    pub fn new(catalog: Arc<Catalog>, class_id: &str) -> Result<Self, WorldError> {
        Self::from_rng(catalog, class_id, ChaCha8Rng::from_entropy())
    }

    /// A deterministic world
    pub fn with_seed(catalog: Arc<Catalog>, class_id: &str, seed: u64) -> Result<Self, WorldError> {
        Self::from_rng(catalog, class_id, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(catalog: Arc<Catalog>, class_id: &str, rng: ChaCha8Rng) -> Result<Self, WorldError> {
        let mut player = Player::new(&catalog, EntityId(0), class_id)?;
        player.combatant.position = Position::new(catalog.constants().world.map_width / 2.0, 0.0);
        let relay = RelayThrottle::new(catalog.constants().world.relay_interval_ms);
        Ok(World {
            catalog,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            events: EventQueue::new(),
            rng,
            now: 0,
            next_id: 1,
            input: TickInput::default(),
            player_down: false,
            animation: Animation::Idle,
            relay,
        })
    }

    // === Queries ===

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Engine clock in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Every enemy, living or awaiting respawn, ascending id
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id() == id)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Cooldown bar fill for a skill slot
    pub fn cooldown_percent(&self, slot: usize) -> f64 {
        self.player
            .skill_at(slot)
            .map_or(0.0, |id| cooldown_percent(&self.catalog, &self.player.combatant, id, self.now))
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // === Setup ===

    pub fn spawn_enemy(&mut self, template_id: &str, position: Position) -> Result<EntityId, WorldError> {
        let template = self
            .catalog
            .enemy(template_id)
            .ok_or_else(|| WorldError::UnknownEnemy(template_id.to_string()))?;
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let enemy = Enemy::spawn_with_rng(template, id, position, self.catalog.constants(), &mut self.rng);
        debug!(enemy = %id, template = template_id, x = position.x, "enemy spawned");
        self.enemies.push(enemy);
        Ok(id)
    }

    /// Queue input for the next tick, replacing anything queued before
    pub fn input(&mut self, input: TickInput) {
        self.input = input;
    }

    // === Tick pipeline ===

    pub fn tick(&mut self, delta_ms: u64) -> TickReport {
        let catalog = Arc::clone(&self.catalog);
        let constants = catalog.constants();
        let input = std::mem::take(&mut self.input);
        let mut report = TickReport::default();
        self.now += delta_ms;
        let now = self.now;

        // Movement
        let player_alive = self.player.is_alive();
        if player_alive {
            self.player.apply_movement(input.movement, delta_ms, constants);
            self.player.regen_mana(delta_ms, constants);
        }
        let mut animation = match input.movement {
            MoveIntent::None => Animation::Idle,
            _ if self.player.combatant.is_stunned => Animation::Idle,
            _ => Animation::Walk,
        };

        // AI
        let mut attackers = Vec::new();
        let player_view = player_alive.then_some(&self.player.combatant);
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            let Some(template) = catalog.enemy(&enemy.template_id) else {
                continue;
            };
            let action = update_ai_with_rng(
                &mut enemy.brain,
                &mut enemy.combatant,
                template,
                enemy.spawn.x,
                player_view,
                delta_ms,
                now,
                constants,
                &mut self.rng,
            );
            if action == AiAction::Attack {
                attackers.push(enemy.id());
            }
        }

        // Skills and projectiles
        if let Some(slot) = input.skill_slot {
            if player_alive {
                let result = self.cast(&catalog, slot);
                if result.is_ok() {
                    animation = Animation::Attack;
                }
                report.cast = Some(result);
            } else {
                report.cast = Some(Err(SkillError::Dead));
            }
        }
        if !self.projectiles.is_empty() {
            let mut targets: Vec<&mut Combatant> = self.enemies.iter_mut().map(|e| &mut e.combatant).collect();
            step_projectiles_with_rng(
                &catalog,
                &mut self.projectiles,
                &self.player.combatant,
                &mut targets,
                delta_ms,
                now,
                &mut self.events,
                &mut self.rng,
            );
        }

        // Enemy attacks and effect ticks
        for enemy in self.enemies.iter().filter(|e| attackers.contains(&e.id()) && e.is_alive()) {
            enemy.attack_with_rng(&mut self.player.combatant, constants, &mut self.events, &mut self.rng);
        }
        tick_status_effects(&mut self.player.combatant, now, &constants.combat, &mut self.events);
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            tick_status_effects(&mut enemy.combatant, now, &constants.combat, &mut self.events);
        }

        // Deaths and their consequences
        if !self.player.is_alive() && !self.player_down {
            self.player_down = true;
            report.player_died = true;
            clear_effects(&mut self.player.combatant, &mut self.events);
            self.projectiles.clear();
            self.events.push(GameEvent::EntityDied {
                entity: self.player.id(),
            });
            info!(level = self.player.level, "player died");
        }

        let mut dead: Vec<&EnemyTemplate> = Vec::new();
        for enemy in self.enemies.iter_mut() {
            if enemy.is_alive() || enemy.respawn_at.is_some() {
                continue;
            }
            let Some(template) = catalog.enemy(&enemy.template_id) else {
                continue;
            };
            enemy.die(template, now, constants, &mut self.events);
            report.kills.push(enemy.id());
            dead.push(template);
        }
        for template in dead {
            let rewards = Enemy::roll_rewards_with_rng(template, &mut self.rng);
            report.levels_gained += self.grant_kill(&catalog, template, rewards);
        }

        // Respawns
        for enemy in self.enemies.iter_mut().filter(|e| e.ready_to_respawn(now)) {
            enemy.respawn_with_rng(constants, &mut self.events, &mut self.rng);
        }

        self.animation = animation;
        report
    }

    fn cast(&mut self, catalog: &Catalog, slot: usize) -> Result<SkillOutcome, SkillError> {
        let skill_id = self
            .player
            .skill_at(slot)
            .ok_or_else(|| SkillError::UnknownSkill(format!("slot {slot}")))?
            .to_string();
        let mut targets: Vec<&mut Combatant> = self.enemies.iter_mut().map(|e| &mut e.combatant).collect();
        let outcome = use_skill_with_rng(
            catalog,
            &mut self.player.combatant,
            &skill_id,
            &mut targets,
            self.now,
            &mut self.events,
            &mut self.rng,
        )?;
        if let Some(projectile) = &outcome.projectile {
            self.projectiles.push(projectile.clone());
        }
        Ok(outcome)
    }

    /// Quest credit, gold, loot and XP for one kill. Returns levels gained.
    fn grant_kill(&mut self, catalog: &Catalog, template: &EnemyTemplate, rewards: KillRewards) -> u32 {
        let player = &mut self.player;
        info!(template = %template.id, xp = rewards.xp, gold = rewards.gold, "enemy killed");
        player.quests.on_enemy_killed(&template.id, &mut self.events);

        if rewards.gold > 0 {
            player.inventory.add_gold(rewards.gold);
            self.events.push(GameEvent::GoldGained { amount: rewards.gold });
        }
        for item_id in &rewards.items {
            match player.inventory.add_item(catalog, item_id, 1) {
                Ok(()) => {
                    self.events.push(GameEvent::ItemGained {
                        item_id: item_id.clone(),
                        quantity: 1,
                    });
                    player.quests.on_item_collected(item_id, &player.inventory, &mut self.events);
                }
                Err(err) => warn!(item = %item_id, error = %err, "loot dropped"),
            }
        }

        player.add_xp(catalog, rewards.xp, &mut self.events)
    }

    // === Player operations ===

    pub fn respawn_player(&mut self, position: Position) {
        let c = &mut self.player.combatant;
        c.restore_full();
        c.position = position;
        c.cooldowns.reset();
        self.player_down = false;
        self.events.push(GameEvent::EntityRespawned { entity: c.id });
        info!("player respawned");
    }

    pub fn accept_quest(&mut self, quest_id: &str) -> Result<(), WorldError> {
        let player = &mut self.player;
        player
            .quests
            .accept(&self.catalog, quest_id, &player.inventory, &mut self.events)?;
        Ok(())
    }

    pub fn abandon_quest(&mut self, quest_id: &str) -> Result<(), WorldError> {
        self.player.quests.abandon(quest_id)?;
        Ok(())
    }

    /// Hand in a quest and apply all of its rewards, XP included
    pub fn turn_in_quest(&mut self, quest_id: &str) -> Result<QuestRewards, WorldError> {
        let player = &mut self.player;
        let rewards = player
            .quests
            .turn_in(&self.catalog, quest_id, &mut player.inventory, &mut self.events)?;
        player.add_xp(&self.catalog, rewards.xp, &mut self.events);
        player.quests.refresh_collect(&player.inventory, &mut self.events);
        Ok(rewards)
    }

    /// Quests an NPC can offer right now
    pub fn available_quests(&self, npc_id: &str) -> Vec<&str> {
        self.player.quests.available_quests(&self.catalog, npc_id)
    }

    /// Completed quests an NPC will accept
    pub fn turn_in_ready(&self, npc_id: &str) -> Vec<&str> {
        self.player.quests.turn_in_ready(&self.catalog, npc_id)
    }

    /// Put an item found in the world into the bag
    pub fn pick_up_item(&mut self, item_id: &str, quantity: u32) -> Result<(), WorldError> {
        let player = &mut self.player;
        player.inventory.add_item(&self.catalog, item_id, quantity)?;
        self.events.push(GameEvent::ItemGained {
            item_id: item_id.to_string(),
            quantity,
        });
        player
            .quests
            .on_item_collected(item_id, &player.inventory, &mut self.events);
        Ok(())
    }

    pub fn buy_item(&mut self, shop_id: &str, item_id: &str, quantity: u32) -> Result<u64, WorldError> {
        let player = &mut self.player;
        let cost = player.inventory.buy_item(&self.catalog, shop_id, item_id, quantity)?;
        self.events.push(GameEvent::ItemGained {
            item_id: item_id.to_string(),
            quantity,
        });
        player
            .quests
            .on_item_collected(item_id, &player.inventory, &mut self.events);
        Ok(cost)
    }

    pub fn sell_item(&mut self, item_id: &str, quantity: u32) -> Result<u64, WorldError> {
        let player = &mut self.player;
        let earned = player.inventory.sell_item(&self.catalog, item_id, quantity)?;
        if earned > 0 {
            self.events.push(GameEvent::GoldGained { amount: earned });
        }
        player.quests.refresh_collect(&player.inventory, &mut self.events);
        Ok(earned)
    }

    pub fn equip(&mut self, item_id: &str) -> Result<Option<String>, WorldError> {
        let previous = self.player.equip(&self.catalog, item_id)?;
        let player = &mut self.player;
        player.quests.refresh_collect(&player.inventory, &mut self.events);
        Ok(previous)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<String, WorldError> {
        let item_id = self.player.unequip(&self.catalog, slot)?;
        let player = &mut self.player;
        player.quests.refresh_collect(&player.inventory, &mut self.events);
        Ok(item_id)
    }

    pub fn use_item(&mut self, item_id: &str) -> Result<(), WorldError> {
        if !self.player.is_alive() {
            return Err(WorldError::PlayerDead);
        }
        self.player.use_item(&self.catalog, item_id, &mut self.events)?;
        let player = &mut self.player;
        player.quests.refresh_collect(&player.inventory, &mut self.events);
        Ok(())
    }

    pub fn change_class(&mut self, class_id: &str) -> Result<(), WorldError> {
        self.player.change_class(&self.catalog, class_id)?;
        Ok(())
    }

    // === Persistence and relay ===

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.player.snapshot()
    }

    /// Replace the player with a saved one
    pub fn load_player(&mut self, snapshot: &PlayerSnapshot) -> Result<(), WorldError> {
        self.player = Player::restore(&self.catalog, self.player.id(), snapshot)?;
        self.player_down = false;
        Ok(())
    }

    /// Current authoritative state of the player
    pub fn relay_state(&self) -> RelayState {
        RelayState::of(&self.player.combatant, self.animation)
    }

    /// The relay state, if it is due to be sent
    pub fn poll_relay(&mut self) -> Option<RelayState> {
        let state = self.relay_state();
        self.relay.poll(self.now, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(class_id: &str) -> World {
        let catalog = Arc::new(Catalog::load_default().unwrap());
        World::with_seed(catalog, class_id, 7).unwrap()
    }

    #[test]
    fn test_spawn_assigns_ascending_ids() {
        let mut world = world("warrior");
        let a = world.spawn_enemy("slime", Position::new(200.0, 0.0)).unwrap();
        let b = world.spawn_enemy("goblin", Position::new(900.0, 0.0)).unwrap();
        assert!(a < b);
        assert_eq!(
            world.spawn_enemy("dragon", Position::new(0.0, 0.0)),
            Err(WorldError::UnknownEnemy("dragon".into()))
        );
    }

    #[test]
    fn test_movement_and_clock() {
        let mut world = world("warrior");
        let start = world.player().combatant.position.x;
        world.input(TickInput {
            movement: MoveIntent::Right,
            skill_slot: None,
        });
        world.tick(100);
        assert_eq!(world.now(), 100);
        assert!(world.player().combatant.position.x > start);
        assert_eq!(world.relay_state().animation, Animation::Walk);

        // Input is consumed by the tick
        let x = world.player().combatant.position.x;
        world.tick(100);
        assert_eq!(world.player().combatant.position.x, x);
        assert_eq!(world.relay_state().animation, Animation::Idle);
    }

    #[test]
    fn test_empty_slot_reports_error() {
        let mut world = world("mage");
        world.input(TickInput {
            movement: MoveIntent::None,
            skill_slot: Some(9),
        });
        let report = world.tick(16);
        assert!(matches!(report.cast, Some(Err(SkillError::UnknownSkill(_)))));
    }

    #[test]
    fn test_fireball_travels_and_hits() {
        let mut world = world("mage");
        let x = world.player().combatant.position.x;
        let id = world.spawn_enemy("orc_warrior", Position::new(x + 150.0, 0.0)).unwrap();
        world.input(TickInput {
            movement: MoveIntent::None,
            skill_slot: Some(1),
        });
        let report = world.tick(16);
        assert!(report.cast.unwrap().unwrap().projectile.is_some());
        assert_eq!(world.projectiles().len(), 1);

        for _ in 0..30 {
            world.tick(16);
        }
        assert!(world.projectiles().is_empty());
        let orc = world.enemy(id).unwrap();
        assert!(orc.combatant.health < orc.combatant.stats.max_health);
    }

    #[test]
    fn test_player_death_and_respawn() {
        let mut world = world("mage");
        world.player_mut().combatant.health = 1;
        world.player_mut().combatant.effects.apply(
            crate::types::StatusEffectKind::Poison,
            0,
            5000,
            0.0,
            1000,
        );
        let report = world.tick(1000);
        assert!(report.player_died);
        assert!(world
            .drain_events()
            .contains(&GameEvent::EntityDied { entity: EntityId(0) }));
        assert_eq!(world.use_item("health_potion"), Err(WorldError::PlayerDead));

        world.respawn_player(Position::new(100.0, 0.0));
        assert!(world.player().is_alive());
        assert_eq!(world.player().combatant.health, world.player().combatant.stats.max_health);
    }

    #[test]
    fn test_kill_level_up_does_not_revive_dying_player() {
        use crate::types::StatusEffectKind;

        let mut world = world("mage");
        let slime = world.spawn_enemy("slime", Position::new(900.0, 0.0)).unwrap();
        world.player_mut().xp = 99;
        world.player_mut().combatant.health = 1;
        world.player_mut().combatant.effects.apply(StatusEffectKind::Poison, 0, 5000, 0.0, 1000);
        let enemy = world.enemy_mut(slime).unwrap();
        enemy.combatant.health = 1;
        enemy.combatant.effects.apply(StatusEffectKind::Poison, 0, 5000, 0.0, 1000);

        let report = world.tick(1000);
        assert_eq!(report.kills, vec![slime]);
        assert!(report.player_died);
        assert_eq!(report.levels_gained, 1);

        let player = world.player();
        assert_eq!(player.level, 2);
        assert_eq!(player.combatant.health, 0);
        assert!(player.combatant.effects.is_empty());
        assert!(world
            .drain_events()
            .contains(&GameEvent::EntityDied { entity: EntityId(0) }));
    }

    #[test]
    fn test_relay_poll_throttles() {
        let mut world = world("rogue");
        assert!(world.poll_relay().is_some());
        world.tick(16);
        assert!(world.poll_relay().is_none());
    }
}
