//! Quest definitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Target is an enemy template id
    Kill,
    /// Target is an item id, counted from live inventory
    Collect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveDefinition {
    pub kind: ObjectiveKind,
    pub target: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRewards {
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub gold: u64,
    /// Item ids granted one unit each; repeats grant multiples
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// NPC that offers and accepts this quest
    pub giver: String,
    pub objectives: Vec<ObjectiveDefinition>,
    #[serde(default)]
    pub rewards: QuestRewards,
    #[serde(default)]
    pub prerequisite: Option<String>,
    #[serde(default)]
    pub repeatable: bool,
}

/// Wrapper for deserializing quests.toml
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QuestsConfig {
    pub quests: Vec<QuestDefinition>,
}
