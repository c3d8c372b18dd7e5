//! Skill definitions

use crate::config::EffectConstants;
use crate::types::{SkillArchetype, StatusEffectKind};
use serde::{Deserialize, Serialize};

fn default_hits() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub archetype: SkillArchetype,
    pub mana_cost: u32,
    pub cooldown_ms: u64,
    /// Damage as a multiple of the caster's attack
    #[serde(default)]
    pub damage: f64,
    #[serde(default)]
    pub range: f64,
    #[serde(default)]
    pub effect: Option<StatusEffectKind>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub magnitude: Option<f64>,
    /// Number of strikes for melee skills
    #[serde(default = "default_hits")]
    pub hits: u32,
    #[serde(default)]
    pub projectile_speed: Option<f64>,
    /// Fraction of max health restored by heal skills
    #[serde(default)]
    pub heal_percent: Option<f64>,
    /// Always crits when the caster stands behind the target
    #[serde(default)]
    pub crit_from_behind: bool,
    /// Melee only: each strike lands on every live target in range
    #[serde(default)]
    pub aoe: bool,
}

/// A resolved effect application: kind, duration and magnitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSpec {
    pub kind: StatusEffectKind,
    pub duration_ms: u64,
    pub magnitude: f64,
}

impl SkillDefinition {
    /// The effect this skill applies, with fallbacks filled in
    pub fn effect_spec(&self, defaults: &EffectConstants) -> Option<EffectSpec> {
        let kind = self.effect?;
        let (duration_ms, magnitude) = match kind {
            StatusEffectKind::Stun => (defaults.stun_ms, 0.0),
            StatusEffectKind::Slow => (defaults.slow_ms, defaults.slow_magnitude),
            StatusEffectKind::Poison => (defaults.poison_ms, 0.0),
            StatusEffectKind::Burn => (defaults.burn_ms, 0.0),
            StatusEffectKind::AttackBoost => (defaults.buff_ms, defaults.attack_boost_magnitude),
            StatusEffectKind::Invulnerable | StatusEffectKind::ManaShield => {
                (defaults.buff_ms, 0.0)
            }
        };
        Some(EffectSpec {
            kind,
            duration_ms: self.duration_ms.unwrap_or(duration_ms),
            magnitude: self.magnitude.unwrap_or(magnitude),
        })
    }
}

/// Wrapper for deserializing skills.toml
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SkillsConfig {
    pub skills: Vec<SkillDefinition>,
}
