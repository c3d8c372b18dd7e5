//! StatBlock - Derived combat stats rebuilt from their sources
//!
//! A combatant's stats are never edited in place. They are recomputed from
//! class base stats, level bonuses and equipped gear every time one of those
//! inputs changes.

mod aggregator;
mod bonuses;

pub use aggregator::StatAccumulator;
pub use bonuses::StatBonuses;

use crate::source::StatSource;
use crate::types::StatKind;
use serde::{Deserialize, Serialize};

/// Default crit chance for anything that does not specify one
pub const DEFAULT_CRIT_CHANCE: f64 = 0.05;

fn default_crit_chance() -> f64 {
    DEFAULT_CRIT_CHANCE
}

/// Complete derived stat state for a combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    // === Resources ===
    pub max_health: u32,
    pub max_mana: u32,

    // === Combat ===
    pub attack: u32,
    pub defense: u32,
    /// Movement stat; gear may push it negative
    pub speed: i32,
    /// Probability in [0, 1]
    #[serde(default = "default_crit_chance")]
    pub crit_chance: f64,
}

impl Default for StatBlock {
    fn default() -> Self {
        StatBlock {
            max_health: 1,
            max_mana: 0,
            attack: 0,
            defense: 0,
            speed: 0,
            crit_chance: DEFAULT_CRIT_CHANCE,
        }
    }
}

impl StatBlock {
    /// Rebuild stats from all sources, applied in priority order
    pub fn from_sources(sources: &[Box<dyn StatSource>]) -> StatBlock {
        let mut accumulator = StatAccumulator::new();

        let mut sorted_sources: Vec<_> = sources.iter().collect();
        sorted_sources.sort_by_key(|s| s.priority());

        for source in sorted_sources {
            source.apply(&mut accumulator);
        }

        accumulator.into_block()
    }

    /// Read a stat by key
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::MaxHealth => self.max_health as f64,
            StatKind::MaxMana => self.max_mana as f64,
            StatKind::Attack => self.attack as f64,
            StatKind::Defense => self.defense as f64,
            StatKind::Speed => self.speed as f64,
            StatKind::CritChance => self.crit_chance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BaseStatsSource, GearSource};

    fn warrior_base() -> StatBlock {
        StatBlock {
            max_health: 150,
            max_mana: 50,
            attack: 15,
            defense: 12,
            speed: 100,
            crit_chance: 0.10,
        }
    }

    fn per_level() -> StatBonuses {
        StatBonuses {
            max_health: 10.0,
            max_mana: 5.0,
            attack: 2.0,
            defense: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_rebuild_base_only() {
        let sources: Vec<Box<dyn StatSource>> =
            vec![Box::new(BaseStatsSource::new(warrior_base(), per_level(), 1))];
        let block = StatBlock::from_sources(&sources);
        assert_eq!(block, warrior_base());
    }

    #[test]
    fn test_rebuild_with_level_and_gear() {
        let sword = StatBonuses {
            attack: 8.0,
            crit_chance: 0.05,
            ..Default::default()
        };
        let sources: Vec<Box<dyn StatSource>> = vec![
            Box::new(GearSource::new("iron_sword", sword)),
            Box::new(BaseStatsSource::new(warrior_base(), per_level(), 3)),
        ];
        let block = StatBlock::from_sources(&sources);

        // Level 3 = 2 levels of growth
        assert_eq!(block.max_health, 170);
        assert_eq!(block.max_mana, 60);
        assert_eq!(block.attack, 15 + 4 + 8);
        assert_eq!(block.defense, 14);
        assert!((block.crit_chance - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_crit_chance_defaults_when_missing() {
        let block: StatBlock = toml::from_str(
            "max_health = 30\nmax_mana = 0\nattack = 5\ndefense = 2\nspeed = 40\n",
        )
        .unwrap();
        assert!((block.crit_chance - DEFAULT_CRIT_CHANCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_get_by_kind() {
        let block = warrior_base();
        assert!((block.get(StatKind::Attack) - 15.0).abs() < f64::EPSILON);
        assert!((block.get(StatKind::CritChance) - 0.10).abs() < f64::EPSILON);
    }
}
