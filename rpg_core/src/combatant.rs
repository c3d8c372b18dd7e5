//! Combatant - Shared state for anything that deals or receives damage
//!
//! Players and enemies both wrap a `Combatant`; the combat engine and skill
//! system only ever see this capability set.

use crate::effect::EffectSet;
use crate::stat_block::StatBlock;
use crate::types::{EntityId, Facing, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which side of the fight a combatant is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

/// Absolute cooldown expiries, keyed by skill id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    expires_at: HashMap<String, u64>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cooldown ending `duration_ms` after `now`
    pub fn start(&mut self, skill_id: &str, now: u64, duration_ms: u64) {
        self.expires_at
            .insert(skill_id.to_string(), now.saturating_add(duration_ms));
    }

    pub fn is_ready(&self, skill_id: &str, now: u64) -> bool {
        self.remaining_ms(skill_id, now) == 0
    }

    pub fn remaining_ms(&self, skill_id: &str, now: u64) -> u64 {
        self.expires_at
            .get(skill_id)
            .map_or(0, |&expiry| expiry.saturating_sub(now))
    }

    /// Remaining cooldown as a fraction of the full cooldown, for UI bars
    pub fn percent(&self, skill_id: &str, now: u64, cooldown_ms: u64) -> f64 {
        if cooldown_ms == 0 {
            return 0.0;
        }
        self.remaining_ms(skill_id, now) as f64 / cooldown_ms as f64
    }

    pub fn reset(&mut self) {
        self.expires_at.clear();
    }
}

/// Combat state shared by players and enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    // === Identity ===
    pub id: EntityId,
    pub name: String,
    pub side: Side,

    // === Stats & Resources ===
    /// Derived stats; rebuilt from sources, never edited directly
    pub stats: StatBlock,
    pub health: u32,
    pub mana: u32,

    // === Effect State ===
    pub attack_multiplier: f64,
    pub speed_multiplier: f64,
    pub is_stunned: bool,
    pub is_invulnerable: bool,
    pub has_mana_shield: bool,
    pub effects: EffectSet,

    // === Placement ===
    pub position: Position,
    pub facing: Facing,

    pub cooldowns: Cooldowns,
}

impl Combatant {
    /// Create a combatant at full health and mana
    pub fn new(id: EntityId, name: impl Into<String>, side: Side, stats: StatBlock) -> Self {
        Combatant {
            id,
            name: name.into(),
            side,
            stats,
            health: stats.max_health,
            mana: stats.max_mana,
            attack_multiplier: 1.0,
            speed_multiplier: 1.0,
            is_stunned: false,
            is_invulnerable: false,
            has_mana_shield: false,
            effects: EffectSet::new(),
            position: Position::default(),
            facing: Facing::default(),
            cooldowns: Cooldowns::new(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Attack after status multipliers
    pub fn effective_attack(&self) -> f64 {
        self.stats.attack as f64 * self.attack_multiplier
    }

    /// Replace derived stats, keeping pools within the new maxima
    pub fn set_stats(&mut self, stats: StatBlock) {
        self.stats = stats;
        self.health = self.health.min(stats.max_health);
        self.mana = self.mana.min(stats.max_mana);
    }

    /// Heal by amount, capped at max. Returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.stats.max_health);
        self.health - before
    }

    /// Restore mana by amount, capped at max. Returns the amount restored.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.mana;
        self.mana = self.mana.saturating_add(amount).min(self.stats.max_mana);
        self.mana - before
    }

    pub fn restore_full(&mut self) {
        self.health = self.stats.max_health;
        self.mana = self.stats.max_mana;
    }

    /// Whether this combatant stands on the side `target` is not facing
    pub fn is_behind(&self, target: &Combatant) -> bool {
        match target.facing {
            Facing::Right => self.position.x < target.position.x,
            Facing::Left => self.position.x > target.position.x,
        }
    }

    pub fn distance_to(&self, other: &Combatant) -> f64 {
        self.position.distance_to(other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy() -> Combatant {
        let stats = StatBlock {
            max_health: 100,
            max_mana: 50,
            attack: 10,
            defense: 5,
            speed: 100,
            crit_chance: 0.05,
        };
        Combatant::new(EntityId(1), "Dummy", Side::Player, stats)
    }

    #[test]
    fn test_new_starts_full() {
        let c = dummy();
        assert_eq!(c.health, 100);
        assert_eq!(c.mana, 50);
        assert!(c.is_alive());
    }

    #[test]
    fn test_heal_clamps() {
        let mut c = dummy();
        c.health = 90;
        assert_eq!(c.heal(25), 10);
        assert_eq!(c.health, 100);
        c.mana = 0;
        assert_eq!(c.restore_mana(60), 50);
    }

    #[test]
    fn test_set_stats_clamps_pools() {
        let mut c = dummy();
        let mut smaller = c.stats;
        smaller.max_health = 60;
        c.set_stats(smaller);
        assert_eq!(c.health, 60);
    }

    #[test]
    fn test_is_behind() {
        let mut target = dummy().at(Position::new(100.0, 0.0));
        target.facing = Facing::Right;
        let attacker = dummy().at(Position::new(60.0, 0.0));
        assert!(attacker.is_behind(&target));
        target.facing = Facing::Left;
        assert!(!attacker.is_behind(&target));
    }

    #[test]
    fn test_cooldowns() {
        let mut cd = Cooldowns::new();
        assert!(cd.is_ready("slash", 0));
        cd.start("slash", 1000, 2000);
        assert!(!cd.is_ready("slash", 2999));
        assert!(cd.is_ready("slash", 3000));
        assert!((cd.percent("slash", 2000, 2000) - 0.5).abs() < f64::EPSILON);
        assert!((cd.percent("slash", 5000, 2000)).abs() < f64::EPSILON);
        cd.reset();
        assert!(cd.is_ready("slash", 1500));
    }
}
