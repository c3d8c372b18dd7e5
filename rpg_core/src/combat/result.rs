//! Result types for combat resolution

use crate::types::StatusEffectKind;
use serde::{Deserialize, Serialize};

/// A rolled damage value before it is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub damage: u32,
    pub is_critical: bool,
}

/// Result of applying damage to a combatant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Health actually removed
    pub dealt: u32,
    /// Damage soaked by mana shield
    pub absorbed: u32,
    /// Whether this hit took health to zero
    pub killed: bool,
}

impl DamageOutcome {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What happened to one combatant during an effect tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTickReport {
    /// Number of poison/burn ticks that landed
    pub dot_ticks: u32,
    pub dot_damage: u32,
    pub killed: bool,
    /// Effects that ran out this tick
    pub expired: Vec<StatusEffectKind>,
}

impl EffectTickReport {
    pub fn new() -> Self {
        Self::default()
    }
}
