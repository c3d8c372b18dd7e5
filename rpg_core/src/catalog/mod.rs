//! Catalog - Static game data shared read-only by every system
//!
//! The catalog is built once at startup, validated, and then passed by
//! reference (or behind an `Arc`) into the simulation. Nothing mutates it
//! afterwards.

mod class;
mod enemy;
mod item;
mod npc;
mod progression;
mod quest;
mod skill;

pub use class::{ClassTemplate, BASIC_ATTACK};
pub use enemy::{EnemyTemplate, GoldRange, LootEntry};
pub use item::{ConsumableEffect, ConsumableKind, ItemDefinition};
pub use npc::{NpcDefinition, ShopDefinition};
pub use progression::ProgressionTable;
pub use quest::{ObjectiveDefinition, ObjectiveKind, QuestDefinition, QuestRewards};
pub use skill::{EffectSpec, SkillDefinition};

use crate::config::{load_toml, parse_toml, ConfigError, GameConstants};
use class::ClassesConfig;
use enemy::EnemiesConfig;
use item::ItemsConfig;
use npc::{NpcsConfig, ShopsConfig};
use quest::QuestsConfig;
use skill::SkillsConfig;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const CLASSES_TOML: &str = include_str!("../../config/classes.toml");
const SKILLS_TOML: &str = include_str!("../../config/skills.toml");
const ITEMS_TOML: &str = include_str!("../../config/items.toml");
const ENEMIES_TOML: &str = include_str!("../../config/enemies.toml");
const NPCS_TOML: &str = include_str!("../../config/npcs.toml");
const QUESTS_TOML: &str = include_str!("../../config/quests.toml");
const SHOPS_TOML: &str = include_str!("../../config/shops.toml");
const PROGRESSION_TOML: &str = include_str!("../../config/progression.toml");

/// Immutable lookup tables for all game content
#[derive(Debug, Clone)]
pub struct Catalog {
    classes: HashMap<String, ClassTemplate>,
    skills: HashMap<String, SkillDefinition>,
    items: HashMap<String, ItemDefinition>,
    enemies: HashMap<String, EnemyTemplate>,
    npcs: HashMap<String, NpcDefinition>,
    quests: HashMap<String, QuestDefinition>,
    shops: HashMap<String, ShopDefinition>,
    progression: ProgressionTable,
    constants: GameConstants,
}

/// Raw parsed tables before indexing
struct CatalogSources {
    classes: Vec<ClassTemplate>,
    skills: Vec<SkillDefinition>,
    items: Vec<ItemDefinition>,
    enemies: Vec<EnemyTemplate>,
    npcs: Vec<NpcDefinition>,
    quests: Vec<QuestDefinition>,
    shops: Vec<ShopDefinition>,
    progression: ProgressionTable,
}

impl Catalog {
    /// Load the built-in content set
    pub fn load_default() -> Result<Catalog, ConfigError> {
        let sources = CatalogSources {
            classes: parse_toml::<ClassesConfig>(CLASSES_TOML)?.classes,
            skills: parse_toml::<SkillsConfig>(SKILLS_TOML)?.skills,
            items: parse_toml::<ItemsConfig>(ITEMS_TOML)?.items,
            enemies: parse_toml::<EnemiesConfig>(ENEMIES_TOML)?.enemies,
            npcs: parse_toml::<NpcsConfig>(NPCS_TOML)?.npcs,
            quests: parse_toml::<QuestsConfig>(QUESTS_TOML)?.quests,
            shops: parse_toml::<ShopsConfig>(SHOPS_TOML)?.shops,
            progression: parse_toml(PROGRESSION_TOML)?,
        };
        Catalog::build(sources, GameConstants::default())
    }

    /// Load content from a directory holding the same file names as the
    /// built-in set. An optional `constants.toml` overrides the defaults.
    pub fn load_dir(dir: &Path) -> Result<Catalog, ConfigError> {
        let sources = CatalogSources {
            classes: load_toml::<ClassesConfig>(&dir.join("classes.toml"))?.classes,
            skills: load_toml::<SkillsConfig>(&dir.join("skills.toml"))?.skills,
            items: load_toml::<ItemsConfig>(&dir.join("items.toml"))?.items,
            enemies: load_toml::<EnemiesConfig>(&dir.join("enemies.toml"))?.enemies,
            npcs: load_toml::<NpcsConfig>(&dir.join("npcs.toml"))?.npcs,
            quests: load_toml::<QuestsConfig>(&dir.join("quests.toml"))?.quests,
            shops: load_toml::<ShopsConfig>(&dir.join("shops.toml"))?.shops,
            progression: load_toml(&dir.join("progression.toml"))?,
        };

        let constants_path = dir.join("constants.toml");
        let constants = if constants_path.exists() {
            load_toml(&constants_path)?
        } else {
            GameConstants::default()
        };

        Catalog::build(sources, constants)
    }

    /// Replace the tunable constants, re-validating nothing else
    pub fn with_constants(mut self, constants: GameConstants) -> Catalog {
        self.constants = constants;
        self
    }

    fn build(sources: CatalogSources, constants: GameConstants) -> Result<Catalog, ConfigError> {
        let catalog = Catalog {
            classes: index_by_id(sources.classes, "class", |c| &c.id)?,
            skills: index_by_id(sources.skills, "skill", |s| &s.id)?,
            items: index_by_id(sources.items, "item", |i| &i.id)?,
            enemies: index_by_id(sources.enemies, "enemy", |e| &e.id)?,
            npcs: index_by_id(sources.npcs, "npc", |n| &n.id)?,
            quests: index_by_id(sources.quests, "quest", |q| &q.id)?,
            shops: index_by_id(sources.shops, "shop", |s| &s.id)?,
            progression: sources.progression,
            constants,
        };
        catalog.validate()?;

        debug!(
            classes = catalog.classes.len(),
            skills = catalog.skills.len(),
            items = catalog.items.len(),
            enemies = catalog.enemies.len(),
            quests = catalog.quests.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    #[cfg(test)]
    pub(crate) fn with_skill(mut self, skill: SkillDefinition) -> Catalog {
        self.skills.insert(skill.id.clone(), skill);
        self
    }

    /// Check every cross reference between tables
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

        if !self.skills.contains_key(BASIC_ATTACK) {
            return invalid(format!("skill '{}' is required", BASIC_ATTACK));
        }

        for class in self.classes.values() {
            for skill_id in &class.skills {
                if !self.skills.contains_key(skill_id) {
                    return invalid(format!(
                        "class '{}' references unknown skill '{}'",
                        class.id, skill_id
                    ));
                }
            }
        }

        for skill in self.skills.values() {
            if skill.range < 0.0 || skill.hits == 0 {
                return invalid(format!("skill '{}' needs range >= 0 and hits >= 1", skill.id));
            }
            if let Some(speed) = skill.projectile_speed {
                if speed <= 0.0 {
                    return invalid(format!("skill '{}' has non-positive projectile speed", skill.id));
                }
            }
        }

        for enemy in self.enemies.values() {
            if enemy.gold_reward.min > enemy.gold_reward.max {
                return invalid(format!("enemy '{}' has gold min above max", enemy.id));
            }
            for entry in &enemy.loot {
                if !self.items.contains_key(&entry.item_id) {
                    return invalid(format!(
                        "enemy '{}' drops unknown item '{}'",
                        enemy.id, entry.item_id
                    ));
                }
                if !(0.0..=1.0).contains(&entry.chance) {
                    return invalid(format!(
                        "enemy '{}' loot chance for '{}' is outside [0, 1]",
                        enemy.id, entry.item_id
                    ));
                }
            }
        }

        for quest in self.quests.values() {
            if !self.npcs.contains_key(&quest.giver) {
                return invalid(format!("quest '{}' has unknown giver '{}'", quest.id, quest.giver));
            }
            if let Some(prereq) = &quest.prerequisite {
                if !self.quests.contains_key(prereq) {
                    return invalid(format!(
                        "quest '{}' requires unknown quest '{}'",
                        quest.id, prereq
                    ));
                }
            }
            for objective in &quest.objectives {
                let known = match objective.kind {
                    ObjectiveKind::Kill => self.enemies.contains_key(&objective.target),
                    ObjectiveKind::Collect => self.items.contains_key(&objective.target),
                };
                if !known || objective.count == 0 {
                    return invalid(format!(
                        "quest '{}' has an invalid objective on '{}'",
                        quest.id, objective.target
                    ));
                }
            }
            for item_id in &quest.rewards.items {
                if !self.items.contains_key(item_id) {
                    return invalid(format!(
                        "quest '{}' rewards unknown item '{}'",
                        quest.id, item_id
                    ));
                }
            }
        }

        for npc in self.npcs.values() {
            for quest_id in &npc.quests {
                if !self.quests.contains_key(quest_id) {
                    return invalid(format!("npc '{}' offers unknown quest '{}'", npc.id, quest_id));
                }
            }
            if let Some(shop_id) = &npc.shop {
                if !self.shops.contains_key(shop_id) {
                    return invalid(format!("npc '{}' runs unknown shop '{}'", npc.id, shop_id));
                }
            }
        }

        for shop in self.shops.values() {
            for item_id in &shop.items {
                match self.items.get(item_id) {
                    Some(item) if item.price.is_some() => {}
                    _ => {
                        return invalid(format!(
                            "shop '{}' stocks '{}' which has no price",
                            shop.id, item_id
                        ))
                    }
                }
            }
        }

        let curve = &self.progression.level_xp;
        if curve.first() != Some(&0) || curve.windows(2).any(|w| w[0] >= w[1]) {
            return invalid("level_xp must start at 0 and strictly increase".to_string());
        }

        Ok(())
    }

    // === Lookups ===

    pub fn class(&self, id: &str) -> Option<&ClassTemplate> {
        self.classes.get(id)
    }

    pub fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.get(id)
    }

    pub fn npc(&self, id: &str) -> Option<&NpcDefinition> {
        self.npcs.get(id)
    }

    pub fn quest(&self, id: &str) -> Option<&QuestDefinition> {
        self.quests.get(id)
    }

    pub fn shop(&self, id: &str) -> Option<&ShopDefinition> {
        self.shops.get(id)
    }

    pub fn progression(&self) -> &ProgressionTable {
        &self.progression
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    /// All class ids, sorted
    pub fn class_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// Index a table by id, rejecting duplicates
fn index_by_id<T>(
    entries: Vec<T>,
    kind: &str,
    id_of: impl Fn(&T) -> &String,
) -> Result<HashMap<String, T>, ConfigError> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        let id = id_of(&entry).clone();
        if map.insert(id.clone(), entry).is_some() {
            return Err(ConfigError::ValidationError(format!(
                "duplicate {} id '{}'",
                kind, id
            )));
        }
    }
    Ok(map)
}
