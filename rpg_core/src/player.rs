//! Player - The controlled combatant with class, gear, bag and quest log

use crate::catalog::{Catalog, ConsumableEffect, ConsumableKind};
use crate::combatant::{Combatant, Side};
use crate::config::GameConstants;
use crate::event::{EventQueue, GameEvent};
use crate::inventory::{Inventory, InventoryError};
use crate::progression::ProgressionError;
use crate::quest::QuestLog;
use crate::source::{BaseStatsSource, StatSource};
use crate::stat_block::StatBlock;
use crate::types::{EntityId, EquipSlot, Facing, MoveIntent};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub combatant: Combatant,
    pub class_id: String,
    /// The class template's level-1 block; the input to derived stats
    pub base_stats: StatBlock,
    pub level: u32,
    /// Total XP earned, compared against cumulative thresholds
    pub xp: u64,
    /// Skill ids by input slot; slot 0 is the basic attack
    pub skills: Vec<String>,
    pub inventory: Inventory,
    pub quests: QuestLog,
    regen_elapsed_ms: u64,
}

impl Player {
    /// A level-1 character of the given class
    pub fn new(catalog: &Catalog, id: EntityId, class_id: &str) -> Result<Self, ProgressionError> {
        let class = catalog
            .class(class_id)
            .ok_or_else(|| ProgressionError::UnknownClass(class_id.to_string()))?;
        let mut player = Player {
            combatant: Combatant::new(id, class.name.clone(), Side::Player, class.base_stats),
            class_id: class.id.clone(),
            base_stats: class.base_stats,
            level: 1,
            xp: 0,
            skills: class.skill_loadout(),
            inventory: Inventory::new(catalog.constants().inventory.max_slots),
            quests: QuestLog::new(),
            regen_elapsed_ms: 0,
        };
        player.rebuild_stats(catalog);
        player.combatant.restore_full();
        Ok(player)
    }

    pub fn id(&self) -> EntityId {
        self.combatant.id
    }

    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }

    /// Recompute derived stats from class, level and equipment
    pub fn rebuild_stats(&mut self, catalog: &Catalog) {
        let mut sources: Vec<Box<dyn StatSource>> = vec![Box::new(BaseStatsSource::new(
            self.base_stats,
            catalog.progression().per_level,
            self.level,
        ))];
        for gear in self.inventory.gear_sources(catalog) {
            sources.push(Box::new(gear));
        }
        self.combatant.set_stats(StatBlock::from_sources(&sources));
    }

    /// Skill bound to an input slot
    pub fn skill_at(&self, index: usize) -> Option<&str> {
        self.skills.get(index).map(String::as_str)
    }

    pub fn equip(&mut self, catalog: &Catalog, item_id: &str) -> Result<Option<String>, InventoryError> {
        let previous = self.inventory.equip(catalog, item_id)?;
        self.rebuild_stats(catalog);
        Ok(previous)
    }

    pub fn unequip(&mut self, catalog: &Catalog, slot: EquipSlot) -> Result<String, InventoryError> {
        let item_id = self.inventory.unequip(catalog, slot)?;
        self.rebuild_stats(catalog);
        Ok(item_id)
    }

    /// Drink a potion or similar; returns the effect that was applied
    pub fn use_item(
        &mut self,
        catalog: &Catalog,
        item_id: &str,
        events: &mut EventQueue,
    ) -> Result<ConsumableEffect, InventoryError> {
        let effect = self.inventory.use_item(catalog, item_id)?;
        match effect.kind {
            ConsumableKind::Heal => {
                let amount = self.combatant.heal(effect.magnitude);
                events.push(GameEvent::Healed {
                    target: self.id(),
                    amount,
                });
            }
            ConsumableKind::Mana => {
                self.combatant.restore_mana(effect.magnitude);
            }
        }
        debug!(item = item_id, "item used");
        Ok(effect)
    }

    /// Regain mana once per full second of living time
    pub fn regen_mana(&mut self, delta_ms: u64, constants: &GameConstants) {
        if !self.is_alive() {
            return;
        }
        self.regen_elapsed_ms += delta_ms;
        while self.regen_elapsed_ms >= 1000 {
            self.regen_elapsed_ms -= 1000;
            self.combatant.restore_mana(constants.world.mana_regen_per_sec);
        }
    }

    /// Walk along the ground; stunned or dead players stay put
    pub fn apply_movement(&mut self, intent: MoveIntent, delta_ms: u64, constants: &GameConstants) {
        let c = &mut self.combatant;
        if !c.is_alive() || c.is_stunned {
            return;
        }
        let direction = match intent {
            MoveIntent::None => return,
            MoveIntent::Left => Facing::Left,
            MoveIntent::Right => Facing::Right,
        };
        let world = &constants.world;
        let speed = (world.base_move_speed + c.stats.speed as f64) * c.speed_multiplier;
        c.facing = direction;
        c.position.x += direction.sign() * speed * delta_ms as f64 / 1000.0;
        c.position.x = c
            .position
            .x
            .clamp(world.player_edge_margin, world.map_width - world.player_edge_margin);
    }
}
