//! Integration test: spawn -> fight -> quest credit -> level up -> turn in
//!
//! Drives the public `World` surface the way a host game loop would.

use rpg_core::ai::AiState;
use rpg_core::combat::calculate_damage_with_rng;
use rpg_core::enemy::Enemy;
use rpg_core::prelude::*;
use rpg_core::quest::QuestError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn new_world(class_id: &str, seed: u64) -> World {
    let catalog = Arc::new(Catalog::load_default().expect("built-in catalog loads"));
    World::with_seed(catalog, class_id, seed).expect("class exists")
}

fn cast(slot: usize) -> TickInput {
    TickInput {
        movement: MoveIntent::None,
        skill_slot: Some(slot),
    }
}

/// Spawn a one-hit slime next to the player and swing at it
fn kill_adjacent_slime(world: &mut World) -> (EntityId, TickReport) {
    let x = world.player().combatant.position.x;
    let id = world.spawn_enemy("slime", Position::new(x + 30.0, 0.0)).unwrap();
    world.enemy_mut(id).unwrap().combatant.health = 1;
    world.input(cast(0));
    (id, world.tick(1000))
}

fn count_events(events: &[GameEvent], predicate: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| predicate(e)).count()
}

#[test]
fn test_warrior_basic_attack_on_slime() {
    let catalog = Catalog::load_default().unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let warrior = Player::new(&catalog, EntityId(0), "warrior").unwrap();
    let slime = Enemy::spawn_with_rng(
        catalog.enemy("slime").unwrap(),
        EntityId(1),
        Position::new(0.0, 0.0),
        catalog.constants(),
        &mut rng,
    );

    for _ in 0..500 {
        let roll = calculate_damage_with_rng(
            &warrior.combatant,
            &slime.combatant,
            1.0,
            false,
            &catalog.constants().combat,
            &mut rng,
        );
        assert!((12..=16).contains(&roll.damage), "damage {} out of range", roll.damage);
    }
}

#[test]
fn test_basic_attack_through_world_damages_slime() {
    let mut world = new_world("warrior", 3);
    let x = world.player().combatant.position.x;
    let id = world.spawn_enemy("slime", Position::new(x + 40.0, 0.0)).unwrap();

    world.input(cast(0));
    let report = world.tick(16);
    let outcome = report.cast.unwrap().unwrap();
    assert_eq!(outcome.hits.len(), 1);
    let hit = outcome.hits[0];
    assert_eq!(hit.target, id);
    let expected = if hit.is_critical { 24..=33 } else { 12..=16 };
    assert!(expected.contains(&hit.damage));

    let slime = world.enemy(id).unwrap();
    assert_eq!(slime.combatant.health, 30 - hit.damage);
}

#[test]
fn test_wolf_hunt_requires_slime_trouble() {
    let mut world = new_world("warrior", 4);
    assert_eq!(
        world.accept_quest("wolf_hunt"),
        Err(WorldError::Quest(QuestError::PrerequisiteUnmet {
            quest: "wolf_hunt".into(),
            prerequisite: "slime_trouble".into(),
        }))
    );
    assert!(!world.player().quests.is_active("wolf_hunt"));
    assert_eq!(world.available_quests("elder_marcus"), vec!["slime_trouble"]);
}

#[test]
fn test_fireball_without_mana_is_rejected() {
    let mut world = new_world("mage", 5);
    world.player_mut().combatant.mana = 20;

    world.input(cast(1));
    let report = world.tick(16);
    assert_eq!(
        report.cast.unwrap().unwrap_err(),
        SkillError::InsufficientMana {
            needed: 25,
            available: 20
        }
    );
    assert_eq!(world.player().combatant.mana, 20);
    assert_eq!(world.cooldown_percent(1), 0.0);
    assert!(world.projectiles().is_empty());
}

#[test]
fn test_passive_slime_ignores_player() {
    let mut world = new_world("warrior", 6);
    let x = world.player().combatant.position.x;
    let id = world.spawn_enemy("slime", Position::new(x + 20.0, 0.0)).unwrap();

    for _ in 0..600 {
        world.tick(50);
        let slime = world.enemy(id).unwrap();
        assert!(matches!(slime.brain.state, AiState::Idle | AiState::Patrol));
    }
    assert_eq!(world.player().combatant.health, world.player().combatant.stats.max_health);
}

#[test]
fn test_aggressive_wolf_attacks_player() {
    let mut world = new_world("warrior", 7);
    let x = world.player().combatant.position.x;
    world.spawn_enemy("forest_wolf", Position::new(x + 120.0, 0.0)).unwrap();

    for _ in 0..200 {
        world.tick(50);
    }
    assert!(world.player().combatant.health < world.player().combatant.stats.max_health);
}

#[test]
fn test_final_slime_completes_quest_once() {
    let mut world = new_world("warrior", 8);
    world.accept_quest("slime_trouble").unwrap();
    world.drain_events();

    for kill in 1..=5 {
        let (id, report) = kill_adjacent_slime(&mut world);
        assert_eq!(report.kills, vec![id]);
        let events = world.drain_events();
        let completed = count_events(&events, |e| matches!(e, GameEvent::QuestCompleted { .. }));
        assert_eq!(completed, usize::from(kill == 5), "kill {kill}");
    }

    let quests = &world.player().quests;
    assert!(quests.is_complete("slime_trouble"));
    assert!(!quests.is_turned_in("slime_trouble"));
    assert_eq!(world.turn_in_ready("elder_marcus"), vec!["slime_trouble"]);
}

#[test]
fn test_kill_quest_and_level_up_in_one_tick() {
    let mut world = new_world("warrior", 9);
    world.accept_quest("slime_trouble").unwrap();
    for _ in 0..4 {
        kill_adjacent_slime(&mut world);
    }
    world.drain_events();
    world.player_mut().xp = 90;
    world.player_mut().combatant.health = 20;

    let (id, report) = kill_adjacent_slime(&mut world);
    assert_eq!(report.kills, vec![id]);
    assert_eq!(report.levels_gained, 1);

    let events = world.drain_events();
    let died = events
        .iter()
        .position(|e| *e == GameEvent::EntityDied { entity: id })
        .unwrap();
    let completed = events
        .iter()
        .position(|e| matches!(e, GameEvent::QuestCompleted { .. }))
        .unwrap();
    let leveled = events
        .iter()
        .position(|e| *e == GameEvent::LeveledUp { level: 2 })
        .unwrap();
    assert!(died < completed && completed < leveled);

    let player = world.player();
    assert_eq!(player.level, 2);
    assert_eq!(player.xp, 105);
    assert!(player.quests.is_complete("slime_trouble"));
    assert_eq!(player.combatant.health, player.combatant.stats.max_health);
}

#[test]
fn test_turn_in_grants_rewards_once() {
    let mut world = new_world("warrior", 10);
    world.accept_quest("slime_trouble").unwrap();
    for _ in 0..5 {
        kill_adjacent_slime(&mut world);
    }

    let potions = world.player().inventory.count("health_potion");
    let gold = world.player().inventory.gold();
    let xp = world.player().xp;

    let rewards = world.turn_in_quest("slime_trouble").unwrap();
    assert_eq!(rewards.xp, 100);
    assert_eq!(world.player().inventory.count("health_potion"), potions + 2);
    assert_eq!(world.player().inventory.gold(), gold + 50);
    assert_eq!(world.player().xp, xp + 100);

    assert_eq!(
        world.turn_in_quest("slime_trouble"),
        Err(WorldError::Quest(QuestError::AlreadyTurnedIn("slime_trouble".into())))
    );
    assert_eq!(world.player().inventory.gold(), gold + 50);

    // The follow-up unlocks
    world.accept_quest("wolf_hunt").unwrap();
    world.pick_up_item("wolf_fang", 3).unwrap();
    assert!(world.player().quests.is_complete("wolf_hunt"));
    world.turn_in_quest("wolf_hunt").unwrap();
    assert_eq!(world.player().inventory.count("wolf_fang"), 0);
    assert_eq!(world.player().inventory.count("leather_armor"), 1);
}

#[test]
fn test_selling_collected_items_reopens_quest() {
    let mut world = new_world("rogue", 11);
    world.accept_quest("goblin_menace").unwrap();
    world.pick_up_item("goblin_ear", 5).unwrap();
    assert!(world.player().quests.is_complete("goblin_menace"));

    world.sell_item("goblin_ear", 1).unwrap();
    assert!(!world.player().quests.is_complete("goblin_menace"));
    assert!(matches!(
        world.turn_in_quest("goblin_menace"),
        Err(WorldError::Quest(QuestError::QuestNotComplete(_)))
    ));
}

#[test]
fn test_area_kills_resolve_in_id_order() {
    let mut world = new_world("mage", 12);
    let x = world.player().combatant.position.x;
    let mut ids = Vec::new();
    for offset in [120.0, -80.0, 40.0] {
        let id = world.spawn_enemy("slime", Position::new(x + offset, 0.0)).unwrap();
        world.enemy_mut(id).unwrap().combatant.health = 1;
        ids.push(id);
    }

    world.input(cast(3));
    let report = world.tick(16);
    assert_eq!(report.kills, ids);
    let died: Vec<EntityId> = world
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::EntityDied { entity } => Some(entity),
            _ => None,
        })
        .collect();
    assert_eq!(died, ids);
}

#[test]
fn test_shadow_step_miss_still_costs() {
    let mut world = new_world("rogue", 13);
    world.input(cast(3));
    let outcome = world.tick(16).cast.unwrap().unwrap();
    assert_eq!(outcome.teleported_to, None);
    assert_eq!(world.player().combatant.mana, 50);
    assert!(world.cooldown_percent(3) > 0.0);
}

#[test]
fn test_enemy_respawns_at_spawn() {
    let mut world = new_world("warrior", 14);
    let (id, _) = kill_adjacent_slime(&mut world);
    let spawn = world.enemy(id).unwrap().spawn;

    for _ in 0..10 {
        world.tick(1000);
    }
    let slime = world.enemy(id).unwrap();
    assert!(slime.is_alive());
    assert_eq!(slime.combatant.position, spawn);
    assert_eq!(slime.brain.state, AiState::Idle);
}

#[test]
fn test_snapshot_round_trip_through_world() {
    let mut world = new_world("healer", 15);
    world.player_mut().inventory.add_gold(500);
    world.buy_item("blacksmith", "iron_sword", 1).unwrap();
    world.equip("iron_sword").unwrap();
    let before = world.player().combatant.stats;

    let snapshot = world.snapshot();
    let mut other = new_world("warrior", 16);
    other.load_player(&snapshot).unwrap();
    assert_eq!(other.player().class_id, "healer");
    assert_eq!(other.player().combatant.stats, before);
    assert_eq!(other.player().inventory.gold(), snapshot.gold);
}
