//! Shop transactions - Atomic gold/item exchanges

use super::{Inventory, InventoryError};
use crate::catalog::Catalog;

impl Inventory {
    /// Buy `quantity` of an item from a shop. Returns the gold spent.
    pub fn buy_item(
        &mut self,
        catalog: &Catalog,
        shop_id: &str,
        item_id: &str,
        quantity: u32,
    ) -> Result<u64, InventoryError> {
        let stocked = catalog.shop(shop_id).is_some_and(|shop| shop.sells(item_id));
        if !stocked {
            return Err(InventoryError::NotInShop(item_id.to_string()));
        }
        let item = catalog
            .item(item_id)
            .ok_or_else(|| InventoryError::UnknownItem(item_id.to_string()))?;
        let price = item
            .price
            .ok_or_else(|| InventoryError::NotForSale(item_id.to_string()))?;

        let cost = price.saturating_mul(quantity as u64);
        if self.gold < cost {
            return Err(InventoryError::InsufficientGold {
                needed: cost,
                available: self.gold,
            });
        }

        self.add_item(catalog, item_id, quantity)?;
        self.gold -= cost;
        Ok(cost)
    }

    /// Sell `quantity` of an item from the bag. Returns the gold earned.
    pub fn sell_item(&mut self, catalog: &Catalog, item_id: &str, quantity: u32) -> Result<u64, InventoryError> {
        let item = catalog
            .item(item_id)
            .ok_or_else(|| InventoryError::UnknownItem(item_id.to_string()))?;
        let earned = item.sell_value().saturating_mul(quantity as u64);

        self.remove_item(item_id, quantity)?;
        self.add_gold(earned);
        Ok(earned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::load_default().unwrap()
    }

    #[test]
    fn test_buy_item() {
        let catalog = catalog();
        let mut inv = Inventory::new(30);
        inv.add_gold(100);

        let cost = inv.buy_item(&catalog, "potions", "health_potion", 3).unwrap();
        assert_eq!(cost, 75);
        assert_eq!(inv.gold(), 25);
        assert_eq!(inv.count("health_potion"), 3);
    }

    #[test]
    fn test_buy_insufficient_gold_is_atomic() {
        let catalog = catalog();
        let mut inv = Inventory::new(30);
        inv.add_gold(40);

        let result = inv.buy_item(&catalog, "blacksmith", "iron_sword", 1);
        assert_eq!(
            result,
            Err(InventoryError::InsufficientGold {
                needed: 50,
                available: 40
            })
        );
        assert_eq!(inv.gold(), 40);
        assert_eq!(inv.count("iron_sword"), 0);
    }

    #[test]
    fn test_buy_full_inventory_keeps_gold() {
        let catalog = catalog();
        let mut inv = Inventory::new(1);
        inv.add_gold(1000);
        inv.add_item(&catalog, "wolf_fang", 1).unwrap();

        assert_eq!(
            inv.buy_item(&catalog, "blacksmith", "iron_sword", 1),
            Err(InventoryError::InventoryFull)
        );
        assert_eq!(inv.gold(), 1000);
    }

    #[test]
    fn test_buy_from_wrong_shop() {
        let catalog = catalog();
        let mut inv = Inventory::new(30);
        inv.add_gold(1000);
        assert_eq!(
            inv.buy_item(&catalog, "potions", "iron_sword", 1),
            Err(InventoryError::NotInShop("iron_sword".into()))
        );
    }

    #[test]
    fn test_sell_item() {
        let catalog = catalog();
        let mut inv = Inventory::new(30);
        inv.add_item(&catalog, "wolf_fang", 4).unwrap();

        assert_eq!(inv.sell_item(&catalog, "wolf_fang", 3).unwrap(), 15);
        assert_eq!(inv.gold(), 15);
        assert_eq!(inv.count("wolf_fang"), 1);

        assert_eq!(
            inv.sell_item(&catalog, "wolf_fang", 2),
            Err(InventoryError::ItemNotPossessed("wolf_fang".into()))
        );
        assert_eq!(inv.gold(), 15);
    }

    #[test]
    fn test_worthless_item_sells_for_one() {
        let catalog = catalog();
        let mut inv = Inventory::new(30);
        inv.add_item(&catalog, "ancient_key", 1).unwrap();
        assert_eq!(inv.sell_item(&catalog, "ancient_key", 1).unwrap(), 1);
    }
}
