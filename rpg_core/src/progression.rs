//! Progression - XP, level-ups and class switching

use crate::catalog::{Catalog, ProgressionTable};
use crate::event::{EventQueue, GameEvent};
use crate::player::Player;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("Unknown class: {0}")]
    UnknownClass(String),
}

/// XP progress within the current level, for an XP bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XpProgress {
    pub current: u64,
    pub required: u64,
    /// current / required, 1.0 at the level cap
    pub fraction: f64,
}

/// Progress through `level` given total XP earned
pub fn xp_progress(table: &ProgressionTable, level: u32, xp: u64) -> XpProgress {
    let (Some(floor), Some(next)) = (table.threshold(level), table.threshold(level + 1)) else {
        return XpProgress {
            current: xp,
            required: xp,
            fraction: 1.0,
        };
    };
    let current = xp.saturating_sub(floor);
    let required = next.saturating_sub(floor).max(1);
    XpProgress {
        current,
        required,
        fraction: (current as f64 / required as f64).min(1.0),
    }
}

impl Player {
    /// Add XP and level up as many times as it pays for.
    /// Returns the number of levels gained.
    pub fn add_xp(&mut self, catalog: &Catalog, amount: u64, events: &mut EventQueue) -> u32 {
        if amount == 0 {
            return 0;
        }
        self.xp = self.xp.saturating_add(amount);
        events.push(GameEvent::XpGained { amount });

        let table = catalog.progression();
        let mut gained = 0;
        while let Some(next) = table.threshold(self.level + 1) {
            if self.xp < next {
                break;
            }
            self.level_up(catalog, events);
            gained += 1;
        }
        gained
    }

    /// One level: new derived stats and a full restore.
    /// A dead player keeps the level but stays at zero health.
    pub fn level_up(&mut self, catalog: &Catalog, events: &mut EventQueue) {
        self.level += 1;
        self.rebuild_stats(catalog);
        if self.is_alive() {
            self.combatant.restore_full();
        }
        events.push(GameEvent::LeveledUp { level: self.level });
        info!(level = self.level, class = %self.class_id, "level up");
    }

    pub fn xp_progress(&self, catalog: &Catalog) -> XpProgress {
        xp_progress(catalog.progression(), self.level, self.xp)
    }

    /// Switch class, keeping level and the health/mana percentages
    pub fn change_class(&mut self, catalog: &Catalog, class_id: &str) -> Result<(), ProgressionError> {
        let class = catalog
            .class(class_id)
            .ok_or_else(|| ProgressionError::UnknownClass(class_id.to_string()))?;

        let c = &self.combatant;
        let health_pct = c.health as f64 / c.stats.max_health.max(1) as f64;
        let mana_pct = if c.stats.max_mana > 0 {
            c.mana as f64 / c.stats.max_mana as f64
        } else {
            1.0
        };
        let was_alive = c.is_alive();

        self.class_id = class.id.clone();
        self.base_stats = class.base_stats;
        self.combatant.name = class.name.clone();
        self.skills = class.skill_loadout();
        self.combatant.cooldowns.reset();
        self.rebuild_stats(catalog);

        let stats = self.combatant.stats;
        let mut health = (stats.max_health as f64 * health_pct).floor() as u32;
        if was_alive {
            health = health.max(1);
        }
        self.combatant.health = health.min(stats.max_health);
        self.combatant.mana = ((stats.max_mana as f64 * mana_pct).floor() as u32).min(stats.max_mana);

        info!(class = class_id, level = self.level, "class changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;

    fn setup() -> (Catalog, Player, EventQueue) {
        let catalog = Catalog::load_default().unwrap();
        let player = Player::new(&catalog, EntityId(0), "warrior").unwrap();
        (catalog, player, EventQueue::new())
    }

    #[test]
    fn test_single_level_up_restores() {
        let (catalog, mut player, mut events) = setup();
        player.combatant.health = 10;
        assert_eq!(player.add_xp(&catalog, 100, &mut events), 1);
        assert_eq!(player.level, 2);
        // 150 + 10 per level
        assert_eq!(player.combatant.stats.max_health, 160);
        assert_eq!(player.combatant.stats.attack, 17);
        assert_eq!(player.combatant.health, 160);
    }

    #[test]
    fn test_multi_level_gain() {
        let (catalog, mut player, mut events) = setup();
        assert_eq!(player.add_xp(&catalog, 600, &mut events), 3);
        assert_eq!(player.level, 4);
        let levels: Vec<u32> = events
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::LeveledUp { level } => Some(level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![2, 3, 4]);
    }

    #[test]
    fn test_level_cap() {
        let (catalog, mut player, mut events) = setup();
        player.add_xp(&catalog, 1_000_000, &mut events);
        assert_eq!(player.level, 20);
        let progress = player.xp_progress(&catalog);
        assert_eq!(progress.current, 1_000_000);
        assert!((progress.fraction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_xp_progress_within_level() {
        let (catalog, _, _) = setup();
        // Level 2 spans 100..250
        let progress = xp_progress(catalog.progression(), 2, 175);
        assert_eq!(progress.current, 75);
        assert_eq!(progress.required, 150);
        assert!((progress.fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_change_class_keeps_percentages() {
        let (catalog, mut player, _) = setup();
        player.combatant.health = 75; // 50% of 150
        player.combatant.mana = 25; // 50% of 50
        player.combatant.cooldowns.start("slash", 0, 2000);

        player.change_class(&catalog, "mage").unwrap();
        assert_eq!(player.class_id, "mage");
        assert_eq!(player.combatant.health, 40);
        assert_eq!(player.combatant.mana, 75);
        assert_eq!(player.skill_at(1), Some("fireball"));
        assert!(player.combatant.cooldowns.is_ready("slash", 0));

        assert_eq!(
            player.change_class(&catalog, "necromancer"),
            Err(ProgressionError::UnknownClass("necromancer".into()))
        );
        assert_eq!(player.class_id, "mage");
    }
}
