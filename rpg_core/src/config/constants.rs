//! Game constants configuration

use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub effects: EffectConstants,
    #[serde(default)]
    pub skills: SkillConstants,
    #[serde(default)]
    pub ai: AiConstants,
    #[serde(default)]
    pub world: WorldConstants,
    #[serde(default)]
    pub inventory: InventoryConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Formula constant: reduction = defense / (defense + constant)
    #[serde(default = "default_defense_constant")]
    pub defense_constant: f64,
    /// Critical strike damage multiplier (2.0 = 200%)
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    #[serde(default = "default_variance_min")]
    pub variance_min: f64,
    #[serde(default = "default_variance_max")]
    pub variance_max: f64,
    /// Crit chance used when an attacker has none
    #[serde(default = "default_crit_chance")]
    pub default_crit_chance: f64,
    /// Interval between poison/burn ticks
    #[serde(default = "default_dot_tick_ms")]
    pub dot_tick_ms: u64,
    /// Fraction of max health dealt per poison/burn tick
    #[serde(default = "default_dot_percent")]
    pub dot_percent: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            defense_constant: default_defense_constant(),
            crit_multiplier: default_crit_multiplier(),
            variance_min: default_variance_min(),
            variance_max: default_variance_max(),
            default_crit_chance: default_crit_chance(),
            dot_tick_ms: default_dot_tick_ms(),
            dot_percent: default_dot_percent(),
        }
    }
}

fn default_defense_constant() -> f64 {
    50.0
}
fn default_crit_multiplier() -> f64 {
    2.0
}
fn default_variance_min() -> f64 {
    0.85
}
fn default_variance_max() -> f64 {
    1.15
}
fn default_crit_chance() -> f64 {
    0.05
}
fn default_dot_tick_ms() -> u64 {
    1000
}
fn default_dot_percent() -> f64 {
    0.05
}

/// Fallback durations and magnitudes when a skill names an effect without them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectConstants {
    #[serde(default = "default_stun_ms")]
    pub stun_ms: u64,
    #[serde(default = "default_slow_ms")]
    pub slow_ms: u64,
    /// Fraction of speed removed by slow
    #[serde(default = "default_slow_magnitude")]
    pub slow_magnitude: f64,
    #[serde(default = "default_poison_ms")]
    pub poison_ms: u64,
    #[serde(default = "default_burn_ms")]
    pub burn_ms: u64,
    /// Fraction of attack added by attack boost
    #[serde(default = "default_attack_boost")]
    pub attack_boost_magnitude: f64,
    /// Used for buffs without an explicit duration
    #[serde(default = "default_buff_ms")]
    pub buff_ms: u64,
}

impl Default for EffectConstants {
    fn default() -> Self {
        EffectConstants {
            stun_ms: default_stun_ms(),
            slow_ms: default_slow_ms(),
            slow_magnitude: default_slow_magnitude(),
            poison_ms: default_poison_ms(),
            burn_ms: default_burn_ms(),
            attack_boost_magnitude: default_attack_boost(),
            buff_ms: default_buff_ms(),
        }
    }
}

fn default_stun_ms() -> u64 {
    2000
}
fn default_slow_ms() -> u64 {
    3000
}
fn default_slow_magnitude() -> f64 {
    0.3
}
fn default_poison_ms() -> u64 {
    5000
}
fn default_burn_ms() -> u64 {
    3000
}
fn default_attack_boost() -> f64 {
    0.3
}
fn default_buff_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillConstants {
    /// Distance at which a projectile connects with a target
    #[serde(default = "default_hit_radius")]
    pub projectile_hit_radius: f64,
    /// Horizontal offset from the caster where projectiles spawn
    #[serde(default = "default_spawn_offset")]
    pub projectile_spawn_offset: f64,
    #[serde(default = "default_projectile_speed")]
    pub default_projectile_speed: f64,
    /// How far behind the target a teleport lands
    #[serde(default = "default_teleport_offset")]
    pub teleport_offset: f64,
}

impl Default for SkillConstants {
    fn default() -> Self {
        SkillConstants {
            projectile_hit_radius: default_hit_radius(),
            projectile_spawn_offset: default_spawn_offset(),
            default_projectile_speed: default_projectile_speed(),
            teleport_offset: default_teleport_offset(),
        }
    }
}

fn default_hit_radius() -> f64 {
    40.0
}
fn default_spawn_offset() -> f64 {
    30.0
}
fn default_projectile_speed() -> f64 {
    400.0
}
fn default_teleport_offset() -> f64 {
    50.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConstants {
    #[serde(default = "default_idle_min_ms")]
    pub idle_min_ms: u64,
    #[serde(default = "default_idle_max_ms")]
    pub idle_max_ms: u64,
    #[serde(default = "default_patrol_min_ms")]
    pub patrol_min_ms: u64,
    #[serde(default = "default_patrol_max_ms")]
    pub patrol_max_ms: u64,
    /// Patrol speed as a fraction of base speed
    #[serde(default = "default_patrol_speed_factor")]
    pub patrol_speed_factor: f64,
    /// Patrol bounds extend this far either side of spawn
    #[serde(default = "default_patrol_half_width")]
    pub patrol_half_width: f64,
    /// Patrol bounds never come closer than this to the map edge
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f64,
    /// Chase and attack give up beyond this multiple of their range
    #[serde(default = "default_disengage_factor")]
    pub disengage_factor: f64,
}

impl Default for AiConstants {
    fn default() -> Self {
        AiConstants {
            idle_min_ms: default_idle_min_ms(),
            idle_max_ms: default_idle_max_ms(),
            patrol_min_ms: default_patrol_min_ms(),
            patrol_max_ms: default_patrol_max_ms(),
            patrol_speed_factor: default_patrol_speed_factor(),
            patrol_half_width: default_patrol_half_width(),
            edge_margin: default_edge_margin(),
            disengage_factor: default_disengage_factor(),
        }
    }
}

fn default_idle_min_ms() -> u64 {
    1000
}
fn default_idle_max_ms() -> u64 {
    3000
}
fn default_patrol_min_ms() -> u64 {
    2000
}
fn default_patrol_max_ms() -> u64 {
    4000
}
fn default_patrol_speed_factor() -> f64 {
    0.3
}
fn default_patrol_half_width() -> f64 {
    200.0
}
fn default_edge_margin() -> f64 {
    50.0
}
fn default_disengage_factor() -> f64 {
    1.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConstants {
    #[serde(default = "default_map_width")]
    pub map_width: f64,
    /// Closest the player may stand to either map edge
    #[serde(default = "default_player_edge_margin")]
    pub player_edge_margin: f64,
    /// Player move speed before the speed stat is added
    #[serde(default = "default_base_move_speed")]
    pub base_move_speed: f64,
    #[serde(default = "default_mana_regen")]
    pub mana_regen_per_sec: u32,
    #[serde(default = "default_respawn_ms")]
    pub respawn_ms: u64,
    #[serde(default = "default_boss_respawn_ms")]
    pub boss_respawn_ms: u64,
    /// Minimum spacing between relay snapshots (50 ms = 20 Hz)
    #[serde(default = "default_relay_interval_ms")]
    pub relay_interval_ms: u64,
}

impl Default for WorldConstants {
    fn default() -> Self {
        WorldConstants {
            map_width: default_map_width(),
            player_edge_margin: default_player_edge_margin(),
            base_move_speed: default_base_move_speed(),
            mana_regen_per_sec: default_mana_regen(),
            respawn_ms: default_respawn_ms(),
            boss_respawn_ms: default_boss_respawn_ms(),
            relay_interval_ms: default_relay_interval_ms(),
        }
    }
}

fn default_map_width() -> f64 {
    1280.0
}
fn default_player_edge_margin() -> f64 {
    30.0
}
fn default_base_move_speed() -> f64 {
    200.0
}
fn default_mana_regen() -> u32 {
    2
}
fn default_respawn_ms() -> u64 {
    10_000
}
fn default_boss_respawn_ms() -> u64 {
    60_000
}
fn default_relay_interval_ms() -> u64 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConstants {
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,
}

impl Default for InventoryConstants {
    fn default() -> Self {
        InventoryConstants {
            max_slots: default_max_slots(),
        }
    }
}

fn default_max_slots() -> usize {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert!((constants.combat.defense_constant - 50.0).abs() < f64::EPSILON);
        assert!((constants.combat.crit_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(constants.combat.dot_tick_ms, 1000);
        assert_eq!(constants.inventory.max_slots, 30);
        assert_eq!(constants.world.boss_respawn_ms, 60_000);
    }

    #[test]
    fn test_parse_constants() {
        let toml = r#"
[combat]
defense_constant = 40
crit_multiplier = 1.5

[ai]
patrol_half_width = 120

[inventory]
max_slots = 12
"#;

        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert!((constants.combat.defense_constant - 40.0).abs() < f64::EPSILON);
        assert!((constants.combat.crit_multiplier - 1.5).abs() < f64::EPSILON);
        // Unlisted fields keep their defaults
        assert!((constants.combat.variance_min - 0.85).abs() < f64::EPSILON);
        assert!((constants.ai.patrol_half_width - 120.0).abs() < f64::EPSILON);
        assert_eq!(constants.ai.idle_max_ms, 3000);
        assert_eq!(constants.inventory.max_slots, 12);
        assert!((constants.world.map_width - 1280.0).abs() < f64::EPSILON);
    }
}
