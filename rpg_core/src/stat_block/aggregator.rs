//! StatAccumulator - Collects stat modifications before building a StatBlock

use crate::stat_block::{StatBlock, StatBonuses};
use crate::types::StatKind;

/// Accumulates stat modifications from various sources
///
/// Values are kept as floats while sources are applied and only rounded
/// and clamped once, when the final block is built.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    // === Resources ===
    pub max_health: f64,
    pub max_mana: f64,

    // === Combat ===
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub crit_chance: f64,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single stat value
    pub fn add(&mut self, kind: StatKind, value: f64) {
        match kind {
            StatKind::MaxHealth => self.max_health += value,
            StatKind::MaxMana => self.max_mana += value,
            StatKind::Attack => self.attack += value,
            StatKind::Defense => self.defense += value,
            StatKind::Speed => self.speed += value,
            StatKind::CritChance => self.crit_chance += value,
        }
    }

    /// Add every stat in a bonus bundle, scaled by `times`
    pub fn add_bonuses(&mut self, bonuses: &StatBonuses, times: f64) {
        for &kind in StatKind::all() {
            self.add(kind, bonuses.get(kind) * times);
        }
    }

    /// Build the final block. Pools stay at least 1 health; other stats
    /// never drop below zero and crit chance stays within [0, 1].
    pub fn into_block(self) -> StatBlock {
        StatBlock {
            max_health: self.max_health.round().max(1.0) as u32,
            max_mana: self.max_mana.round().max(0.0) as u32,
            attack: self.attack.round().max(0.0) as u32,
            defense: self.defense.round().max(0.0) as u32,
            speed: self.speed.round() as i32,
            crit_chance: self.crit_chance.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_adds() {
        let mut acc = StatAccumulator::new();
        acc.add(StatKind::Attack, 10.0);
        acc.add(StatKind::Attack, 5.0);
        acc.add(StatKind::Speed, -10.0);
        assert!((acc.attack - 15.0).abs() < 0.01);
        assert!((acc.speed + 10.0).abs() < 0.01);
    }

    #[test]
    fn test_into_block_clamps() {
        let mut acc = StatAccumulator::new();
        acc.add(StatKind::Defense, -5.0);
        acc.add(StatKind::CritChance, 1.7);
        acc.add(StatKind::Speed, -10.0);
        let block = acc.into_block();
        assert_eq!(block.defense, 0);
        assert_eq!(block.max_health, 1);
        assert_eq!(block.speed, -10);
        assert!((block.crit_chance - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_bonuses_scaled() {
        let bonuses = StatBonuses {
            max_health: 10.0,
            attack: 2.0,
            ..Default::default()
        };
        let mut acc = StatAccumulator::new();
        acc.add_bonuses(&bonuses, 4.0);
        assert!((acc.max_health - 40.0).abs() < 0.01);
        assert!((acc.attack - 8.0).abs() < 0.01);
    }
}
