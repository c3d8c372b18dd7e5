//! Equipment slots and the stat bonuses they provide

use super::{Inventory, InventoryError};
use crate::catalog::Catalog;
use crate::source::GearSource;
use crate::stat_block::StatBonuses;
use crate::types::EquipSlot;
use std::collections::BTreeMap;

impl Inventory {
    pub fn equipped(&self, slot: EquipSlot) -> Option<&str> {
        self.equipment.get(&slot).map(String::as_str)
    }

    pub fn equipment(&self) -> &BTreeMap<EquipSlot, String> {
        &self.equipment
    }

    /// Move an item from the bag into its slot.
    ///
    /// Any item already in that slot goes back into the bag; the call fails
    /// cleanly if it would not fit. Returns the replaced item id.
    pub fn equip(&mut self, catalog: &Catalog, item_id: &str) -> Result<Option<String>, InventoryError> {
        let item = catalog
            .item(item_id)
            .ok_or_else(|| InventoryError::UnknownItem(item_id.to_string()))?;
        let slot = item
            .equip_slot()
            .ok_or_else(|| InventoryError::SlotIncompatible(item_id.to_string()))?;
        if !self.has(item_id, 1) {
            return Err(InventoryError::ItemNotPossessed(item_id.to_string()));
        }

        let mut next = self.clone();
        next.remove_item(item_id, 1)?;
        let previous = next.equipment.insert(slot, item_id.to_string());
        if let Some(previous_id) = &previous {
            next.add_item(catalog, previous_id, 1)?;
        }

        *self = next;
        Ok(previous)
    }

    /// Move the item in `slot` back into the bag
    pub fn unequip(&mut self, catalog: &Catalog, slot: EquipSlot) -> Result<String, InventoryError> {
        let item_id = self
            .equipment
            .get(&slot)
            .cloned()
            .ok_or(InventoryError::SlotEmpty(slot))?;

        self.add_item(catalog, &item_id, 1)?;
        self.equipment.remove(&slot);
        Ok(item_id)
    }

    /// Sum of every equipped item's bonuses
    pub fn equipment_stats(&self, catalog: &Catalog) -> StatBonuses {
        let mut total = StatBonuses::default();
        for item_id in self.equipment.values() {
            if let Some(item) = catalog.item(item_id) {
                total.add(&item.stats);
            }
        }
        total
    }

    /// One stat source per equipped item, in slot order
    pub fn gear_sources(&self, catalog: &Catalog) -> Vec<GearSource> {
        self.equipment
            .values()
            .filter_map(|item_id| {
                catalog
                    .item(item_id)
                    .map(|item| GearSource::new(item_id.clone(), item.stats))
            })
            .collect()
    }
}
