//! Scripted encounter simulation

use rpg_core::{GameEvent, MoveIntent, TickInput, World};
use serde::Serialize;
use tracing::{debug, info};

/// Totals gathered while an encounter runs
#[derive(Debug, Default, Serialize)]
pub struct EncounterSummary {
    pub ticks: u32,
    pub elapsed_ms: u64,
    pub casts: u32,
    pub rejected_casts: u32,
    pub kills: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub critical_hits: u32,
    pub levels_gained: u32,
    pub player_deaths: u32,
}

/// Drives the player: walk to the nearest living enemy, then try the
/// highest skill slot that is ready, falling back to the basic attack.
#[derive(Default)]
pub struct Pilot {
    slot_cursor: usize,
}

impl Pilot {
    pub fn new() -> Self {
        Pilot { slot_cursor: 0 }
    }

    fn decide(&mut self, world: &World) -> TickInput {
        let player = &world.player().combatant;
        let nearest = world
            .enemies()
            .iter()
            .filter(|e| e.is_alive())
            .min_by(|a, b| {
                let da = a.combatant.distance_to(player);
                let db = b.combatant.distance_to(player);
                da.total_cmp(&db)
            });
        let Some(target) = nearest else {
            return TickInput::default();
        };

        let distance = target.combatant.distance_to(player);
        let movement = if distance > 60.0 {
            if target.combatant.position.x > player.position.x {
                MoveIntent::Right
            } else {
                MoveIntent::Left
            }
        } else {
            MoveIntent::None
        };

        // Cycle through the class skills so every archetype gets exercised
        let slots = world.player().skills.len().max(1);
        self.slot_cursor = (self.slot_cursor + 1) % slots;
        let slot = if world.cooldown_percent(self.slot_cursor) == 0.0 {
            self.slot_cursor
        } else {
            0
        };
        TickInput {
            movement,
            skill_slot: Some(slot),
        }
    }
}

/// Run `ticks` steps of `tick_ms`, respawning the player on death
pub fn run_encounter(world: &mut World, pilot: &mut Pilot, ticks: u32, tick_ms: u64) -> EncounterSummary {
    let mut summary = EncounterSummary::default();
    let player_id = world.player().id();

    for _ in 0..ticks {
        let input = pilot.decide(world);
        world.input(input);
        let report = world.tick(tick_ms);

        summary.ticks += 1;
        summary.elapsed_ms += tick_ms;
        summary.kills += report.kills.len() as u32;
        summary.levels_gained += report.levels_gained;
        match report.cast {
            Some(Ok(outcome)) => {
                summary.casts += 1;
                debug!(skill = %outcome.skill_id, damage = outcome.total_damage(), "cast");
            }
            Some(Err(_)) => summary.rejected_casts += 1,
            None => {}
        }

        for event in world.drain_events() {
            match event {
                GameEvent::DamageApplied {
                    target,
                    amount,
                    is_critical,
                    ..
                } => {
                    if target == player_id {
                        summary.damage_taken += amount as u64;
                    } else {
                        summary.damage_dealt += amount as u64;
                        if is_critical {
                            summary.critical_hits += 1;
                        }
                    }
                }
                GameEvent::QuestCompleted { quest_id } => info!(quest = %quest_id, "quest ready to turn in"),
                GameEvent::LeveledUp { level } => info!(level, "level up"),
                _ => {}
            }
        }

        if report.player_died {
            summary.player_deaths += 1;
            let x = world.catalog().constants().world.map_width / 2.0;
            world.respawn_player(rpg_core::Position::new(x, 0.0));
        }
    }
    summary
}
