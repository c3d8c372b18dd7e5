//! Game events raised by the simulation for presentation layers

use crate::types::{EntityId, StatusEffectKind};
use serde::{Deserialize, Serialize};

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Damage number to draw at a world position
    DamageApplied {
        target: EntityId,
        x: f64,
        y: f64,
        amount: u32,
        is_critical: bool,
    },
    Healed {
        target: EntityId,
        amount: u32,
    },
    EntityDied {
        entity: EntityId,
    },
    EntityRespawned {
        entity: EntityId,
    },
    EffectApplied {
        target: EntityId,
        kind: StatusEffectKind,
    },
    EffectExpired {
        target: EntityId,
        kind: StatusEffectKind,
    },
    SkillUsed {
        caster: EntityId,
        skill_id: String,
    },
    ItemGained {
        item_id: String,
        quantity: u32,
    },
    GoldGained {
        amount: u64,
    },
    XpGained {
        amount: u64,
    },
    QuestAccepted {
        quest_id: String,
    },
    QuestAdvanced {
        quest_id: String,
    },
    QuestCompleted {
        quest_id: String,
    },
    QuestTurnedIn {
        quest_id: String,
    },
    LeveledUp {
        level: u32,
    },
}

/// Ordered buffer of events; the host drains it after each tick
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
