//! Quest tracking - Objective progress, completion and turn-in
//!
//! Kill objectives count events. Collect objectives are always re-derived
//! from the live inventory, so items lost out of band are reflected the next
//! time the log looks at them.

use crate::catalog::{Catalog, ObjectiveKind, QuestRewards};
use crate::event::{EventQueue, GameEvent};
use crate::inventory::{Inventory, InventoryError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, info};

/// Quest gating and turn-in failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestError {
    #[error("Unknown quest: {0}")]
    UnknownQuest(String),
    #[error("Quest {0} is already active")]
    AlreadyActive(String),
    #[error("Quest {0} was already turned in")]
    AlreadyTurnedIn(String),
    #[error("Quest {quest} requires {prerequisite} first")]
    PrerequisiteUnmet { quest: String, prerequisite: String },
    #[error("Quest {0} is not active")]
    NotActive(String),
    #[error("Quest {0} is not complete")]
    QuestNotComplete(String),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    pub kind: ObjectiveKind,
    pub target: String,
    /// Never exceeds `count`
    pub current: u32,
    pub count: u32,
}

impl ObjectiveProgress {
    pub fn is_met(&self) -> bool {
        self.current >= self.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest_id: String,
    pub objectives: Vec<ObjectiveProgress>,
}

impl QuestProgress {
    pub fn is_met(&self) -> bool {
        self.objectives.iter().all(ObjectiveProgress::is_met)
    }
}

/// A player's quest state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestLog {
    active: BTreeMap<String, QuestProgress>,
    /// Active quests whose objectives are all met
    completed: BTreeSet<String>,
    turned_in: BTreeSet<String>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from saved parts
    pub fn from_parts(active: Vec<QuestProgress>, turned_in: BTreeSet<String>) -> Self {
        let completed = active
            .iter()
            .filter(|p| p.is_met())
            .map(|p| p.quest_id.clone())
            .collect();
        QuestLog {
            active: active.into_iter().map(|p| (p.quest_id.clone(), p)).collect(),
            completed,
            turned_in,
        }
    }

    // === Queries ===

    pub fn progress(&self, quest_id: &str) -> Option<&QuestProgress> {
        self.active.get(quest_id)
    }

    pub fn active(&self) -> impl Iterator<Item = &QuestProgress> {
        self.active.values()
    }

    pub fn is_active(&self, quest_id: &str) -> bool {
        self.active.contains_key(quest_id)
    }

    /// Completed and waiting to be turned in
    pub fn is_complete(&self, quest_id: &str) -> bool {
        self.completed.contains(quest_id) && self.active.contains_key(quest_id)
    }

    pub fn is_turned_in(&self, quest_id: &str) -> bool {
        self.turned_in.contains(quest_id)
    }

    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }

    pub fn turned_in(&self) -> &BTreeSet<String> {
        &self.turned_in
    }

    /// Check whether a quest could be accepted right now
    pub fn can_accept(&self, catalog: &Catalog, quest_id: &str) -> Result<(), QuestError> {
        let quest = catalog
            .quest(quest_id)
            .ok_or_else(|| QuestError::UnknownQuest(quest_id.to_string()))?;

        if self.active.contains_key(quest_id) {
            return Err(QuestError::AlreadyActive(quest_id.to_string()));
        }
        if self.turned_in.contains(quest_id) && !quest.repeatable {
            return Err(QuestError::AlreadyTurnedIn(quest_id.to_string()));
        }
        if let Some(prereq) = &quest.prerequisite {
            if !self.turned_in.contains(prereq) {
                return Err(QuestError::PrerequisiteUnmet {
                    quest: quest_id.to_string(),
                    prerequisite: prereq.clone(),
                });
            }
        }
        Ok(())
    }

    /// Quests an NPC offers that can be accepted now, in the NPC's order
    pub fn available_quests<'a>(&self, catalog: &'a Catalog, npc_id: &str) -> Vec<&'a str> {
        catalog
            .npc(npc_id)
            .map(|npc| {
                npc.quests
                    .iter()
                    .filter(|id| self.can_accept(catalog, id).is_ok())
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Completed quests an NPC will take back
    pub fn turn_in_ready<'a>(&self, catalog: &'a Catalog, npc_id: &str) -> Vec<&'a str> {
        catalog
            .npc(npc_id)
            .map(|npc| {
                npc.quests
                    .iter()
                    .filter(|id| self.is_complete(id))
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    // === Transitions ===

    /// Start a quest. Collect objectives immediately count items already held.
    pub fn accept(
        &mut self,
        catalog: &Catalog,
        quest_id: &str,
        inventory: &Inventory,
        events: &mut EventQueue,
    ) -> Result<(), QuestError> {
        self.can_accept(catalog, quest_id)?;
        let quest = catalog
            .quest(quest_id)
            .ok_or_else(|| QuestError::UnknownQuest(quest_id.to_string()))?;

        let mut progress = QuestProgress {
            quest_id: quest_id.to_string(),
            objectives: quest
                .objectives
                .iter()
                .map(|o| ObjectiveProgress {
                    kind: o.kind,
                    target: o.target.clone(),
                    current: 0,
                    count: o.count,
                })
                .collect(),
        };
        sync_collect(&mut progress, inventory, None);
        self.active.insert(quest_id.to_string(), progress);

        events.push(GameEvent::QuestAccepted {
            quest_id: quest_id.to_string(),
        });
        info!(quest = quest_id, "quest accepted");

        self.check_completion(quest_id, events);
        Ok(())
    }

    /// Drop an active quest and its progress
    pub fn abandon(&mut self, quest_id: &str) -> Result<(), QuestError> {
        if self.active.remove(quest_id).is_none() {
            return Err(QuestError::NotActive(quest_id.to_string()));
        }
        self.completed.remove(quest_id);
        info!(quest = quest_id, "quest abandoned");
        Ok(())
    }

    /// Count a kill toward every matching objective, capped at its target
    pub fn on_enemy_killed(&mut self, enemy_id: &str, events: &mut EventQueue) {
        let mut advanced = Vec::new();
        for (quest_id, progress) in self.active.iter_mut() {
            let mut changed = false;
            for objective in progress.objectives.iter_mut() {
                if objective.kind == ObjectiveKind::Kill
                    && objective.target == enemy_id
                    && objective.current < objective.count
                {
                    objective.current += 1;
                    changed = true;
                    debug!(
                        quest = %quest_id,
                        target = enemy_id,
                        current = objective.current,
                        count = objective.count,
                        "kill counted"
                    );
                }
            }
            if changed {
                advanced.push(quest_id.clone());
            }
        }

        for quest_id in advanced {
            events.push(GameEvent::QuestAdvanced {
                quest_id: quest_id.clone(),
            });
            self.check_completion(&quest_id, events);
        }
    }

    /// Re-derive collect objectives on `item_id` from the inventory
    pub fn on_item_collected(&mut self, item_id: &str, inventory: &Inventory, events: &mut EventQueue) {
        self.sync_inventory(inventory, Some(item_id), events);
    }

    /// Re-derive every collect objective from the inventory
    pub fn refresh_collect(&mut self, inventory: &Inventory, events: &mut EventQueue) {
        self.sync_inventory(inventory, None, events);
    }

    fn sync_inventory(&mut self, inventory: &Inventory, item_id: Option<&str>, events: &mut EventQueue) {
        let mut touched = Vec::new();
        for (quest_id, progress) in self.active.iter_mut() {
            if sync_collect(progress, inventory, item_id) {
                touched.push(quest_id.clone());
            }
        }

        for quest_id in touched {
            events.push(GameEvent::QuestAdvanced {
                quest_id: quest_id.clone(),
            });
            self.check_completion(&quest_id, events);
        }
    }

    /// Update the completed set for one quest. Returns whether every
    /// objective is met. Raises `QuestCompleted` only on the transition.
    pub fn check_completion(&mut self, quest_id: &str, events: &mut EventQueue) -> bool {
        let Some(progress) = self.active.get(quest_id) else {
            return false;
        };

        if progress.is_met() {
            if self.completed.insert(quest_id.to_string()) {
                events.push(GameEvent::QuestCompleted {
                    quest_id: quest_id.to_string(),
                });
                info!(quest = quest_id, "quest ready to turn in");
            }
            true
        } else {
            if self.completed.remove(quest_id) {
                debug!(quest = quest_id, "quest no longer complete");
            }
            false
        }
    }

    /// Hand in a completed quest.
    ///
    /// Removes the collected items and grants gold and reward items to the
    /// inventory. The returned rewards carry the XP for the caller to apply.
    /// Nothing changes if the reward items would not fit.
    pub fn turn_in(
        &mut self,
        catalog: &Catalog,
        quest_id: &str,
        inventory: &mut Inventory,
        events: &mut EventQueue,
    ) -> Result<QuestRewards, QuestError> {
        let quest = catalog
            .quest(quest_id)
            .ok_or_else(|| QuestError::UnknownQuest(quest_id.to_string()))?;

        if !self.active.contains_key(quest_id) {
            if self.turned_in.contains(quest_id) {
                return Err(QuestError::AlreadyTurnedIn(quest_id.to_string()));
            }
            return Err(QuestError::NotActive(quest_id.to_string()));
        }

        // Items may have left the bag since the last check
        if let Some(progress) = self.active.get_mut(quest_id) {
            sync_collect(progress, inventory, None);
        }
        if !self.check_completion(quest_id, events) {
            return Err(QuestError::QuestNotComplete(quest_id.to_string()));
        }

        let mut next = inventory.clone();
        for objective in &quest.objectives {
            if objective.kind == ObjectiveKind::Collect {
                next.remove_item(&objective.target, objective.count)?;
            }
        }
        next.add_gold(quest.rewards.gold);
        for item_id in &quest.rewards.items {
            next.add_item(catalog, item_id, 1)?;
        }
        *inventory = next;

        self.active.remove(quest_id);
        self.completed.remove(quest_id);
        self.turned_in.insert(quest_id.to_string());

        events.push(GameEvent::QuestTurnedIn {
            quest_id: quest_id.to_string(),
        });
        if quest.rewards.gold > 0 {
            events.push(GameEvent::GoldGained {
                amount: quest.rewards.gold,
            });
        }
        for item_id in &quest.rewards.items {
            events.push(GameEvent::ItemGained {
                item_id: item_id.clone(),
                quantity: 1,
            });
        }
        info!(
            quest = quest_id,
            xp = quest.rewards.xp,
            gold = quest.rewards.gold,
            "quest turned in"
        );

        Ok(quest.rewards.clone())
    }
}

/// Recompute collect objectives from inventory counts. Returns whether any
/// objective changed.
fn sync_collect(progress: &mut QuestProgress, inventory: &Inventory, item_id: Option<&str>) -> bool {
    let mut changed = false;
    for objective in progress.objectives.iter_mut() {
        if objective.kind != ObjectiveKind::Collect {
            continue;
        }
        if item_id.is_some_and(|id| id != objective.target) {
            continue;
        }
        let current = inventory.count(&objective.target).min(objective.count);
        if current != objective.current {
            objective.current = current;
            changed = true;
        }
    }
    changed
}
