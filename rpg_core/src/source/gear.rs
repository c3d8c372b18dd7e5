//! Bonuses from one equipped item

use crate::source::{StatSource, GEAR_PRIORITY};
use crate::stat_block::{StatAccumulator, StatBonuses};

/// Stats from one equipped item
pub struct GearSource {
    /// Catalog id of the equipped item
    pub item_id: String,
    pub bonuses: StatBonuses,
}

impl GearSource {
    pub fn new(item_id: impl Into<String>, bonuses: StatBonuses) -> Self {
        GearSource {
            item_id: item_id.into(),
            bonuses,
        }
    }
}

impl StatSource for GearSource {
    fn id(&self) -> &str {
        &self.item_id
    }

    fn priority(&self) -> i32 {
        GEAR_PRIORITY
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.add_bonuses(&self.bonuses, 1.0);
    }
}
