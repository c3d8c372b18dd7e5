//! Flat stat bonuses as they appear on items and in level growth

use crate::types::StatKind;
use serde::{Deserialize, Serialize};

/// Flat bonus per stat key. Missing keys are zero; values may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBonuses {
    pub max_health: f64,
    pub max_mana: f64,
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub crit_chance: f64,
}

impl StatBonuses {
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::MaxHealth => self.max_health,
            StatKind::MaxMana => self.max_mana,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
            StatKind::CritChance => self.crit_chance,
        }
    }

    fn get_mut(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::MaxMana => &mut self.max_mana,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
            StatKind::CritChance => &mut self.crit_chance,
        }
    }

    /// Sum another bundle into this one, key by key
    pub fn add(&mut self, other: &StatBonuses) {
        for &kind in StatKind::all() {
            *self.get_mut(kind) += other.get(kind);
        }
    }

    /// Non-zero entries, in stat key order
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::all()
            .iter()
            .map(|&kind| (kind, self.get(kind)))
            .filter(|(_, value)| *value != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_bonuses() {
        let bonuses: StatBonuses = toml::from_str("defense = 25\nmax_health = 50\nspeed = -10").unwrap();
        assert!((bonuses.defense - 25.0).abs() < f64::EPSILON);
        assert!((bonuses.speed + 10.0).abs() < f64::EPSILON);
        assert!((bonuses.attack).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_and_iter() {
        let mut total = StatBonuses {
            attack: 8.0,
            ..Default::default()
        };
        total.add(&StatBonuses {
            attack: 12.0,
            crit_chance: 0.08,
            ..Default::default()
        });
        assert!((total.attack - 20.0).abs() < f64::EPSILON);
        let keys: Vec<StatKind> = total.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![StatKind::Attack, StatKind::CritChance]);
    }
}
