//! Class base block plus per-level growth

use crate::source::{StatSource, BASE_PRIORITY};
use crate::stat_block::{StatAccumulator, StatBlock, StatBonuses};
use crate::types::StatKind;

/// Stats from a class (or enemy) base block plus per-level growth
pub struct BaseStatsSource {
    pub base: StatBlock,
    /// Flat growth applied once per level above 1
    pub per_level: StatBonuses,
    /// Character level (1-based)
    pub level: u32,
}

impl BaseStatsSource {
    pub fn new(base: StatBlock, per_level: StatBonuses, level: u32) -> Self {
        BaseStatsSource {
            base,
            per_level,
            level,
        }
    }
}

impl StatSource for BaseStatsSource {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn priority(&self) -> i32 {
        BASE_PRIORITY
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for &kind in StatKind::all() {
            stats.add(kind, self.base.get(kind));
        }

        let levels_gained = self.level.saturating_sub(1) as f64;
        stats.add_bonuses(&self.per_level, levels_gained);
    }
}
