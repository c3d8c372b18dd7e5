//! Inventory - Stacked item storage, equipment slots and gold
//!
//! Every operation validates first and commits last, so a rejected call
//! leaves slots, equipment and gold exactly as they were.

mod equipment;
mod shop;

use crate::catalog::{Catalog, ConsumableEffect};
use crate::types::EquipSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Inventory and equipment failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    #[error("Item {0} cannot be equipped")]
    SlotIncompatible(String),
    #[error("Not enough of item {0}")]
    ItemNotPossessed(String),
    #[error("Inventory is full")]
    InventoryFull,
    #[error("Nothing equipped in {0:?} slot")]
    SlotEmpty(EquipSlot),
    #[error("Item {0} is not for sale")]
    NotForSale(String),
    #[error("Shop does not stock {0}")]
    NotInShop(String),
    #[error("Not enough gold: need {needed}, have {available}")]
    InsufficientGold { needed: u64, available: u64 },
    #[error("Item {0} is not consumable")]
    NotConsumable(String),
}

/// One occupied inventory slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: u32,
}

/// A player's items, equipment and gold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<ItemStack>,
    equipment: BTreeMap<EquipSlot, String>,
    gold: u64,
    max_slots: usize,
}

impl Inventory {
    pub fn new(max_slots: usize) -> Self {
        Inventory {
            slots: Vec::new(),
            equipment: BTreeMap::new(),
            gold: 0,
            max_slots,
        }
    }

    /// Rebuild an inventory from saved parts. Zero-quantity stacks are dropped.
    pub fn from_parts(
        slots: Vec<ItemStack>,
        equipment: BTreeMap<EquipSlot, String>,
        gold: u64,
        max_slots: usize,
    ) -> Self {
        Inventory {
            slots: slots.into_iter().filter(|s| s.quantity > 0).collect(),
            equipment,
            gold,
            max_slots,
        }
    }

    // === Queries ===

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    pub fn gold(&self) -> u64 {
        self.gold
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn free_slots(&self) -> usize {
        self.max_slots.saturating_sub(self.slots.len())
    }

    /// Total quantity of an item across all stacks (equipped items excluded)
    pub fn count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    pub fn has(&self, item_id: &str, quantity: u32) -> bool {
        self.count(item_id) >= quantity
    }

    // === Mutation ===

    /// Add items, topping up existing stacks before opening new slots.
    /// Fails without change if the items do not all fit.
    pub fn add_item(&mut self, catalog: &Catalog, item_id: &str, quantity: u32) -> Result<(), InventoryError> {
        let slots = self.slots_with_added(catalog, item_id, quantity)?;
        self.slots = slots;
        Ok(())
    }

    /// Whether a batch of (item, quantity) pairs would all fit at once
    pub fn can_fit(&self, catalog: &Catalog, items: &[(&str, u32)]) -> bool {
        let mut probe = self.clone();
        items
            .iter()
            .all(|(item_id, quantity)| probe.add_item(catalog, item_id, *quantity).is_ok())
    }

    fn slots_with_added(
        &self,
        catalog: &Catalog,
        item_id: &str,
        quantity: u32,
    ) -> Result<Vec<ItemStack>, InventoryError> {
        let item = catalog
            .item(item_id)
            .ok_or_else(|| InventoryError::UnknownItem(item_id.to_string()))?;
        let limit = item.stack_limit();

        let mut slots = self.slots.clone();
        let mut remaining = quantity;

        for stack in slots.iter_mut().filter(|s| s.item_id == item_id) {
            if remaining == 0 {
                break;
            }
            let room = limit.saturating_sub(stack.quantity);
            let moved = room.min(remaining);
            stack.quantity += moved;
            remaining -= moved;
        }

        while remaining > 0 {
            if slots.len() >= self.max_slots {
                return Err(InventoryError::InventoryFull);
            }
            let moved = remaining.min(limit);
            slots.push(ItemStack {
                item_id: item_id.to_string(),
                quantity: moved,
            });
            remaining -= moved;
        }

        Ok(slots)
    }

    /// Remove items, draining the last stacks first.
    /// Fails without change if not enough are held.
    pub fn remove_item(&mut self, item_id: &str, quantity: u32) -> Result<(), InventoryError> {
        if !self.has(item_id, quantity) {
            return Err(InventoryError::ItemNotPossessed(item_id.to_string()));
        }

        let mut remaining = quantity;
        for stack in self.slots.iter_mut().rev().filter(|s| s.item_id == item_id) {
            if remaining == 0 {
                break;
            }
            let taken = stack.quantity.min(remaining);
            stack.quantity -= taken;
            remaining -= taken;
        }
        self.slots.retain(|s| s.quantity > 0);
        Ok(())
    }

    pub fn add_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub fn spend_gold(&mut self, amount: u64) -> Result<(), InventoryError> {
        if self.gold < amount {
            return Err(InventoryError::InsufficientGold {
                needed: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    /// Consume one unit of a consumable and return its effect
    pub fn use_item(&mut self, catalog: &Catalog, item_id: &str) -> Result<ConsumableEffect, InventoryError> {
        let item = catalog
            .item(item_id)
            .ok_or_else(|| InventoryError::UnknownItem(item_id.to_string()))?;
        let effect = item
            .consumable
            .ok_or_else(|| InventoryError::NotConsumable(item_id.to_string()))?;
        self.remove_item(item_id, 1)?;
        Ok(effect)
    }
}
