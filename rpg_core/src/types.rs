//! Core types shared across the simulation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a live combatant (player or enemy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// World position in map units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Straight-line distance to another position
    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Horizontal facing of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1.0 for right, -1.0 for left
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Facing that points from `from` toward `to` along x
    pub fn toward(from: Position, to: Position) -> Facing {
        if to.x > from.x {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// Stat keys used by derived stats and item bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    MaxHealth,
    MaxMana,
    Attack,
    Defense,
    Speed,
    CritChance,
}

impl StatKind {
    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::MaxHealth,
            StatKind::MaxMana,
            StatKind::Attack,
            StatKind::Defense,
            StatKind::Speed,
            StatKind::CritChance,
        ]
    }
}

/// Equipment slot on a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Helmet,
    Accessory,
}

impl EquipSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::Weapon,
            EquipSlot::Armor,
            EquipSlot::Helmet,
            EquipSlot::Accessory,
        ]
    }
}

/// Item category from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Weapon,
    Armor,
    Helmet,
    Accessory,
    Consumable,
    Quest,
}

impl ItemCategory {
    /// The equip slot this category occupies, if it can be equipped
    pub fn equip_slot(self) -> Option<EquipSlot> {
        match self {
            ItemCategory::Weapon => Some(EquipSlot::Weapon),
            ItemCategory::Armor => Some(EquipSlot::Armor),
            ItemCategory::Helmet => Some(EquipSlot::Helmet),
            ItemCategory::Accessory => Some(EquipSlot::Accessory),
            ItemCategory::Consumable | ItemCategory::Quest => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Dispatch category of a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillArchetype {
    Melee,
    Projectile,
    Area,
    Buff,
    Heal,
    Movement,
}

/// Enemy AI temperament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyBehavior {
    Passive,
    Aggressive,
    Ranged,
    Boss,
}

impl EnemyBehavior {
    /// Whether this behavior starts chases on its own
    pub fn initiates_chase(self) -> bool {
        !matches!(self, EnemyBehavior::Passive)
    }
}

/// Timed modifiers that can sit on a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffectKind {
    Stun,
    Slow,
    Poison,
    Burn,
    AttackBoost,
    Invulnerable,
    ManaShield,
}

impl StatusEffectKind {
    /// Poison and burn deal periodic damage
    pub fn is_damage_over_time(self) -> bool {
        matches!(self, StatusEffectKind::Poison | StatusEffectKind::Burn)
    }
}

/// Directional movement input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveIntent {
    #[default]
    None,
    Left,
    Right,
}
