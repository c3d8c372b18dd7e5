//! Enemy templates

use crate::stat_block::StatBlock;
use crate::types::EnemyBehavior;
use serde::{Deserialize, Serialize};

/// Inclusive gold drop range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldRange {
    pub min: u64,
    pub max: u64,
}

/// One independent loot roll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: String,
    /// Drop probability in [0, 1]
    pub chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub behavior: EnemyBehavior,
    pub aggro_range: f64,
    pub attack_range: f64,
    pub attack_cooldown_ms: u64,
    pub xp_reward: u64,
    #[serde(default)]
    pub undead: bool,
    /// Attacks from range (resolved as direct hits)
    #[serde(default)]
    pub projectile: bool,
    /// Uses the long respawn delay
    #[serde(default)]
    pub boss: bool,
    pub base_stats: StatBlock,
    #[serde(default)]
    pub gold_reward: GoldRange,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

/// Wrapper for deserializing enemies.toml
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EnemiesConfig {
    pub enemies: Vec<EnemyTemplate>,
}
