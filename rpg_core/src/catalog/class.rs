//! Playable class templates

use crate::stat_block::StatBlock;
use serde::{Deserialize, Serialize};

/// Skill every class has in slot 0
pub const BASIC_ATTACK: &str = "basic_attack";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_stats: StatBlock,
    /// Class skills, in hotbar order (not including the basic attack)
    pub skills: Vec<String>,
}

impl ClassTemplate {
    /// Full skill loadout: the basic attack followed by class skills
    pub fn skill_loadout(&self) -> Vec<String> {
        std::iter::once(BASIC_ATTACK.to_string())
            .chain(self.skills.iter().cloned())
            .collect()
    }
}

/// Wrapper for deserializing classes.toml
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClassesConfig {
    pub classes: Vec<ClassTemplate>,
}
