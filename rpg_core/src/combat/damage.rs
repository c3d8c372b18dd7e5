//! Damage calculation - The hit formula and critical rolls

use super::result::DamageRoll;
use crate::combatant::Combatant;
use crate::config::CombatConstants;
use rand::Rng;

/// Core hit formula with an explicit variance factor.
///
/// `attack × multiplier × crit × (1 − def / (def + K)) × variance`, floored,
/// never below 1. Defense has diminishing returns and can never reach full
/// reduction.
pub fn damage_formula(
    attack: f64,
    skill_multiplier: f64,
    defense: f64,
    is_critical: bool,
    variance: f64,
    constants: &CombatConstants,
) -> u32 {
    let crit = if is_critical {
        constants.crit_multiplier
    } else {
        1.0
    };
    let defense = defense.max(0.0);
    let reduction = defense / (defense + constants.defense_constant);
    let raw = attack * skill_multiplier * crit * (1.0 - reduction) * variance;
    raw.floor().max(1.0) as u32
}

/// Calculate damage for one hit using the thread RNG
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    skill_multiplier: f64,
    is_critical: bool,
    constants: &CombatConstants,
) -> DamageRoll {
    let mut rng = rand::thread_rng();
    calculate_damage_with_rng(attacker, defender, skill_multiplier, is_critical, constants, &mut rng)
}

/// Calculate damage with a provided RNG (for deterministic testing)
pub fn calculate_damage_with_rng(
    attacker: &Combatant,
    defender: &Combatant,
    skill_multiplier: f64,
    is_critical: bool,
    constants: &CombatConstants,
    rng: &mut impl Rng,
) -> DamageRoll {
    let variance = if constants.variance_max > constants.variance_min {
        rng.gen_range(constants.variance_min..constants.variance_max)
    } else {
        constants.variance_min
    };

    let damage = damage_formula(
        attacker.effective_attack(),
        skill_multiplier,
        defender.stats.defense as f64,
        is_critical,
        variance,
        constants,
    );

    DamageRoll {
        damage,
        is_critical,
    }
}

/// Roll for a critical hit using the thread RNG
pub fn roll_critical(attacker: &Combatant, constants: &CombatConstants) -> bool {
    let mut rng = rand::thread_rng();
    roll_critical_with_rng(attacker, constants, &mut rng)
}

/// Roll for a critical hit. A zero crit chance falls back to the default.
pub fn roll_critical_with_rng(
    attacker: &Combatant,
    constants: &CombatConstants,
    rng: &mut impl Rng,
) -> bool {
    let chance = if attacker.stats.crit_chance > 0.0 {
        attacker.stats.crit_chance
    } else {
        constants.default_crit_chance
    };
    rng.gen_bool(chance.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Side;
    use crate::stat_block::StatBlock;
    use crate::types::EntityId;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fighter(attack: u32, defense: u32, crit_chance: f64) -> Combatant {
        let stats = StatBlock {
            max_health: 100,
            max_mana: 0,
            attack,
            defense,
            speed: 100,
            crit_chance,
        };
        Combatant::new(EntityId(1), "Fighter", Side::Player, stats)
    }

    #[test]
    fn test_warrior_basic_attack_on_slime() {
        let constants = CombatConstants::default();
        let warrior = fighter(15, 12, 0.1);
        let slime = fighter(5, 2, 0.05);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let roll = calculate_damage_with_rng(&warrior, &slime, 1.0, false, &constants, &mut rng);
            // 15 × (1 − 2/52) = 14.42, times [0.85, 1.15)
            assert!(roll.damage >= 12 && roll.damage <= 16, "got {}", roll.damage);
            assert!(!roll.is_critical);
        }
    }

    #[test]
    fn test_minimum_one_damage() {
        let constants = CombatConstants::default();
        let weak = fighter(1, 0, 0.0);
        let wall = fighter(1, 10_000, 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        let roll = calculate_damage_with_rng(&weak, &wall, 0.1, false, &constants, &mut rng);
        assert_eq!(roll.damage, 1);
    }

    #[test]
    fn test_attack_multiplier_applies() {
        let constants = CombatConstants::default();
        let mut boosted = fighter(20, 0, 0.0);
        boosted.attack_multiplier = 1.5;
        // 20 × 1.5 × (1 − 0/50) × 1.0
        assert_eq!(damage_formula(boosted.effective_attack(), 1.0, 0.0, false, 1.0, &constants), 30);
    }

    #[test]
    fn test_crit_doubles() {
        let constants = CombatConstants::default();
        let normal = damage_formula(40.0, 1.0, 0.0, false, 1.0, &constants);
        let crit = damage_formula(40.0, 1.0, 0.0, true, 1.0, &constants);
        assert_eq!(normal, 40);
        assert_eq!(crit, 80);
    }

    #[test]
    fn test_roll_critical_extremes() {
        let constants = CombatConstants::default();
        let mut rng = StdRng::seed_from_u64(1);
        let always = fighter(10, 0, 1.0);
        assert!((0..50).all(|_| roll_critical_with_rng(&always, &constants, &mut rng)));
    }

    #[test]
    fn test_zero_crit_uses_default_rate() {
        let constants = CombatConstants::default();
        let mut rng = StdRng::seed_from_u64(99);
        let attacker = fighter(10, 0, 0.0);
        let crits = (0..10_000)
            .filter(|_| roll_critical_with_rng(&attacker, &constants, &mut rng))
            .count();
        // Expect about 500
        assert!(crits > 350 && crits < 650, "got {}", crits);
    }

    proptest! {
        #[test]
        fn prop_damage_at_least_one_and_monotone_in_defense(
            attack in 0.0f64..500.0,
            multiplier in 0.0f64..5.0,
            defense in 0.0f64..1000.0,
            extra in 0.0f64..1000.0,
            variance in 0.85f64..1.15,
            crit in any::<bool>(),
        ) {
            let constants = CombatConstants::default();
            let low = damage_formula(attack, multiplier, defense, crit, variance, &constants);
            let high = damage_formula(attack, multiplier, defense + extra, crit, variance, &constants);
            prop_assert!(low >= 1);
            prop_assert!(high >= 1);
            prop_assert!(high <= low);
        }

        #[test]
        fn prop_crit_never_below_normal_minimum(
            attack in 0.0f64..500.0,
            multiplier in 0.0f64..5.0,
            defense in 0.0f64..1000.0,
            variance in 0.85f64..1.15,
        ) {
            let constants = CombatConstants::default();
            let crit = damage_formula(attack, multiplier, defense, true, variance, &constants);
            let normal_min = damage_formula(attack, multiplier, defense, false, constants.variance_min, &constants);
            prop_assert!(crit >= normal_min);
        }
    }
}
