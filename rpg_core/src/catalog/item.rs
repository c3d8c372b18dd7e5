//! Item definitions

use crate::stat_block::StatBonuses;
use crate::types::{EquipSlot, ItemCategory, Rarity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableKind {
    Heal,
    Mana,
}

/// What happens when a consumable is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableEffect {
    pub kind: ConsumableKind,
    pub magnitude: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    #[serde(default)]
    pub description: String,
    /// Shop price; items without one cannot be bought
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub sell_price: Option<u64>,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub max_stack: Option<u32>,
    #[serde(default)]
    pub stats: StatBonuses,
    #[serde(default)]
    pub consumable: Option<ConsumableEffect>,
}

impl ItemDefinition {
    /// Largest quantity one inventory slot can hold
    pub fn stack_limit(&self) -> u32 {
        if self.stackable {
            self.max_stack.unwrap_or(99).max(1)
        } else {
            1
        }
    }

    /// Gold received per unit sold; worthless items still fetch 1
    pub fn sell_value(&self) -> u64 {
        self.sell_price.filter(|&price| price > 0).unwrap_or(1)
    }

    pub fn equip_slot(&self) -> Option<EquipSlot> {
        self.category.equip_slot()
    }
}

/// Wrapper for deserializing items.toml
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ItemsConfig {
    pub items: Vec<ItemDefinition>,
}
