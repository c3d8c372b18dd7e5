//! Town NPCs and the shops they run

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Quests this NPC hands out
    #[serde(default)]
    pub quests: Vec<String>,
    #[serde(default)]
    pub shop: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopDefinition {
    pub id: String,
    pub name: String,
    /// Item ids on sale
    pub items: Vec<String>,
}

impl ShopDefinition {
    pub fn sells(&self, item_id: &str) -> bool {
        self.items.iter().any(|id| id == item_id)
    }
}

/// Wrapper for deserializing npcs.toml
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NpcsConfig {
    pub npcs: Vec<NpcDefinition>,
}

/// Wrapper for deserializing shops.toml
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ShopsConfig {
    pub shops: Vec<ShopDefinition>,
}
