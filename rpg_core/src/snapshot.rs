//! Snapshots - Persistence and network relay views of the simulation
//!
//! Both are plain serde types. Choosing an encoding is up to the host.

use crate::catalog::Catalog;
use crate::combatant::Combatant;
use crate::inventory::{Inventory, ItemStack};
use crate::player::Player;
use crate::progression::ProgressionError;
use crate::quest::{QuestLog, QuestProgress};
use crate::stat_block::StatBlock;
use crate::types::{EntityId, EquipSlot, Facing, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// === Persistence ===

/// Everything needed to bring a character back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub class_id: String,
    pub level: u32,
    pub xp: u64,
    pub health: u32,
    pub mana: u32,
    /// Informational; stats are recomputed on restore
    pub stats: StatBlock,
    pub equipment: BTreeMap<EquipSlot, String>,
    pub inventory: Vec<ItemStack>,
    pub gold: u64,
    pub active_quests: Vec<QuestProgress>,
    pub turned_in_quests: BTreeSet<String>,
    pub position: Position,
}

impl Player {
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            class_id: self.class_id.clone(),
            level: self.level,
            xp: self.xp,
            health: self.combatant.health,
            mana: self.combatant.mana,
            stats: self.combatant.stats,
            equipment: self.inventory.equipment().clone(),
            inventory: self.inventory.slots().to_vec(),
            gold: self.inventory.gold(),
            active_quests: self.quests.active().cloned().collect(),
            turned_in_quests: self.quests.turned_in().clone(),
            position: self.combatant.position,
        }
    }

    /// Rebuild a player from a snapshot. A saved health of 0 comes back full.
    pub fn restore(catalog: &Catalog, id: EntityId, snapshot: &PlayerSnapshot) -> Result<Player, ProgressionError> {
        let mut player = Player::new(catalog, id, &snapshot.class_id)?;
        player.level = snapshot.level.clamp(1, catalog.progression().max_level());
        player.xp = snapshot.xp;
        player.inventory = Inventory::from_parts(
            snapshot.inventory.clone(),
            snapshot.equipment.clone(),
            snapshot.gold,
            catalog.constants().inventory.max_slots,
        );
        player.quests = QuestLog::from_parts(snapshot.active_quests.clone(), snapshot.turned_in_quests.clone());
        player.combatant.position = snapshot.position;
        player.rebuild_stats(catalog);

        let stats = player.combatant.stats;
        player.combatant.health = match snapshot.health {
            0 => stats.max_health,
            health => health.min(stats.max_health),
        };
        player.combatant.mana = snapshot.mana.min(stats.max_mana);
        Ok(player)
    }
}

// === Network relay ===

/// Animation label other clients should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    Idle,
    Walk,
    Attack,
    Dead,
}

/// The authoritative state other clients render
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelayState {
    pub entity: EntityId,
    pub position: Position,
    pub health: u32,
    pub facing: Facing,
    pub animation: Animation,
}

impl RelayState {
    pub fn of(combatant: &Combatant, animation: Animation) -> Self {
        RelayState {
            entity: combatant.id,
            position: combatant.position,
            health: combatant.health,
            facing: combatant.facing,
            animation: if combatant.is_alive() { animation } else { Animation::Dead },
        }
    }
}

/// Rate limiter for relay updates: at most one per interval, only on change
#[derive(Debug, Clone)]
pub struct RelayThrottle {
    interval_ms: u64,
    last_sent_at: Option<u64>,
    last: Option<RelayState>,
}

impl RelayThrottle {
    pub fn new(interval_ms: u64) -> Self {
        RelayThrottle {
            interval_ms,
            last_sent_at: None,
            last: None,
        }
    }

    /// Returns the state if it should be sent now
    pub fn poll(&mut self, now: u64, state: RelayState) -> Option<RelayState> {
        if let Some(sent_at) = self.last_sent_at {
            if now.saturating_sub(sent_at) < self.interval_ms {
                return None;
            }
        }
        if self.last == Some(state) {
            return None;
        }
        self.last_sent_at = Some(now);
        self.last = Some(state);
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventQueue;

    #[test]
    fn test_snapshot_restore_recomputes_stats() {
        let catalog = Catalog::load_default().unwrap();
        let mut events = EventQueue::new();
        let mut player = Player::new(&catalog, EntityId(0), "rogue").unwrap();
        player.add_xp(&catalog, 300, &mut events);
        player.inventory.add_item(&catalog, "iron_sword", 1).unwrap();
        player.equip(&catalog, "iron_sword").unwrap();
        player.inventory.add_item(&catalog, "health_potion", 3).unwrap();
        player.inventory.add_gold(42);
        player.combatant.health = 20;

        let mut snapshot = player.snapshot();
        // Tampered stats are ignored
        snapshot.stats.attack = 9999;
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: PlayerSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Player::restore(&catalog, EntityId(0), &decoded).unwrap();

        assert_eq!(restored.level, 3);
        assert_eq!(restored.combatant.stats, player.combatant.stats);
        assert_eq!(restored.combatant.health, 20);
        assert_eq!(restored.inventory.gold(), 42);
        assert_eq!(restored.inventory.count("health_potion"), 3);
        assert_eq!(restored.inventory.equipped(EquipSlot::Weapon), Some("iron_sword"));
    }

    #[test]
    fn test_restore_zero_health_comes_back_full() {
        let catalog = Catalog::load_default().unwrap();
        let player = Player::new(&catalog, EntityId(0), "healer").unwrap();
        let mut snapshot = player.snapshot();
        snapshot.health = 0;
        let restored = Player::restore(&catalog, EntityId(0), &snapshot).unwrap();
        assert_eq!(restored.combatant.health, restored.combatant.stats.max_health);
    }

    #[test]
    fn test_relay_throttle() {
        let state = |x: f64| RelayState {
            entity: EntityId(0),
            position: Position::new(x, 0.0),
            health: 100,
            facing: Facing::Right,
            animation: Animation::Walk,
        };
        let mut throttle = RelayThrottle::new(50);

        assert!(throttle.poll(0, state(1.0)).is_some());
        // Too soon
        assert!(throttle.poll(20, state(2.0)).is_none());
        assert!(throttle.poll(50, state(2.0)).is_some());
        // Unchanged
        assert!(throttle.poll(200, state(2.0)).is_none());
        assert!(throttle.poll(210, state(3.0)).is_some());
    }
}
