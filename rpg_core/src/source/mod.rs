//! Stat sources - Inputs folded into a combatant's derived stats
//!
//! Derived stats are never edited in place. A player's `StatBlock` is
//! rebuilt from its sources whenever level or equipment changes.

mod base_stats;
mod gear;

pub use base_stats::BaseStatsSource;
pub use gear::GearSource;

use crate::stat_block::StatAccumulator;

/// Class base block plus level growth
pub const BASE_PRIORITY: i32 = -100;
/// Equipped items
pub const GEAR_PRIORITY: i32 = 0;

/// Something that adds to a combatant's derived stats
pub trait StatSource: Send + Sync {
    /// Stable name, for logging
    fn id(&self) -> &str;

    /// Lower priorities are applied first
    fn priority(&self) -> i32 {
        GEAR_PRIORITY
    }

    fn apply(&self, stats: &mut StatAccumulator);
}
