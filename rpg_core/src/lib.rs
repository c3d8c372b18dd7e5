//! rpg_core - Simulation core for a side-view 2D action RPG
//!
//! This library provides:
//! - Catalog: validated, read-only game content loaded from TOML
//! - Combat: damage formula, critical hits, status effects
//! - Skills: gated casting with melee, projectile, area, buff, heal and movement archetypes
//! - Enemy AI: idle/patrol/chase/attack state machine
//! - Inventory, equipment, shops, quests and progression
//! - World: the ordered per-tick pipeline tying it all together

pub mod ai;
pub mod catalog;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod effect;
pub mod enemy;
pub mod event;
pub mod inventory;
pub mod player;
pub mod prelude;
pub mod progression;
pub mod quest;
pub mod skill;
pub mod snapshot;
pub mod source;
pub mod stat_block;
pub mod types;
pub mod world;

// Re-export core types for convenience
pub use catalog::Catalog;
pub use combatant::{Combatant, Side};
pub use config::{ConfigError, GameConstants};
pub use enemy::Enemy;
pub use event::{EventQueue, GameEvent};
pub use inventory::{Inventory, InventoryError};
pub use player::Player;
pub use progression::{ProgressionError, XpProgress};
pub use quest::{QuestError, QuestLog};
pub use skill::{SkillError, SkillOutcome};
pub use snapshot::{PlayerSnapshot, RelayState};
pub use stat_block::StatBlock;
pub use types::{EntityId, Facing, MoveIntent, Position};
pub use world::{TickInput, TickReport, World, WorldError};
