//! Prelude module for convenient imports
//!
//! ```rust
//! use rpg_core::prelude::*;
//! ```

// Content
pub use crate::catalog::{Catalog, EnemyTemplate, ItemDefinition, QuestDefinition, SkillDefinition};
pub use crate::config::{ConfigError, GameConstants};

// Core types
pub use crate::combatant::{Combatant, Side};
pub use crate::stat_block::{StatBlock, StatBonuses};
pub use crate::types::{EntityId, EquipSlot, Facing, MoveIntent, Position, SkillArchetype, StatusEffectKind};

// Entities
pub use crate::enemy::Enemy;
pub use crate::player::Player;

// Systems
pub use crate::combat::{apply_damage, calculate_damage, roll_critical};
pub use crate::skill::{can_use_skill, use_skill, SkillError, SkillOutcome};

// Host surface
pub use crate::event::GameEvent;
pub use crate::snapshot::{Animation, PlayerSnapshot, RelayState};
pub use crate::world::{TickInput, TickReport, World, WorldError};
