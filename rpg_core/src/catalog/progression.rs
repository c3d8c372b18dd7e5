//! Level curve and per-level growth

use crate::stat_block::StatBonuses;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionTable {
    /// Total XP required to reach each level; index 0 is level 1
    pub level_xp: Vec<u64>,
    /// Flat stats gained per level above 1
    #[serde(default)]
    pub per_level: StatBonuses,
}

impl ProgressionTable {
    /// Highest reachable level
    pub fn max_level(&self) -> u32 {
        self.level_xp.len().max(1) as u32
    }

    /// Total XP needed to reach `level`, if that level exists
    pub fn threshold(&self, level: u32) -> Option<u64> {
        let index = level.checked_sub(1)?;
        self.level_xp.get(index as usize).copied()
    }
}
