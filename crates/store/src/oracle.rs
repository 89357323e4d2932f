use std::sync::Arc;

use borong_core::domain::inventory::{AvailabilityResult, InventoryItem, InventoryQuery};
use borong_core::errors::StoreError;

use crate::CatalogStore;

/// Resolves whether a requested item/quantity/attribute combination is
/// currently purchasable. Read-only: a successful check reserves nothing,
/// so two concurrent customers can both be told the last unit is available.
pub struct InventoryOracle {
    catalog: Arc<dyn CatalogStore>,
}

impl InventoryOracle {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Fetches a fresh snapshot and returns the first matching item in
    /// snapshot order. `available` reflects the requested quantity;
    /// `remaining_stock` always reports the matched item's current stock.
    pub async fn check_availability(
        &self,
        query: &InventoryQuery,
    ) -> Result<AvailabilityResult, StoreError> {
        let snapshot = self.catalog.fetch_catalog().await?;

        let Some(item) = snapshot.into_iter().find(|item| matches(item, query)) else {
            return Ok(AvailabilityResult::no_match());
        };

        Ok(AvailabilityResult {
            available: item.stock >= query.quantity,
            remaining_stock: Some(item.stock),
            item: Some(item),
        })
    }
}

/// Conjunctive match: name containment is mandatory; color/size predicates
/// apply only when the query carries those attributes and contribute `true`
/// otherwise.
fn matches(item: &InventoryItem, query: &InventoryQuery) -> bool {
    let name_matches =
        item.name.to_lowercase().contains(&query.item_name.to_lowercase());

    let color_matches = match &query.attributes.color {
        Some(color) => item.color.to_lowercase().contains(&color.to_lowercase()),
        None => true,
    };

    let size_matches = match &query.attributes.size {
        Some(size) => item.size.to_uppercase() == size.to_uppercase(),
        None => true,
    };

    name_matches && color_matches && size_matches
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use borong_core::domain::inventory::{InventoryItem, InventoryQuery, ItemAttributes};

    use crate::memory::InMemoryCatalog;

    use super::InventoryOracle;

    fn blue_tshirt_catalog() -> Vec<InventoryItem> {
        vec![
            InventoryItem {
                sku: "TS-002".to_string(),
                name: "Red Polo".to_string(),
                color: "Red".to_string(),
                size: "L".to_string(),
                stock: 20,
                price: Decimal::new(3500, 2),
            },
            InventoryItem {
                sku: "TS-001".to_string(),
                name: "Blue T-Shirt".to_string(),
                color: "Blue".to_string(),
                size: "M".to_string(),
                stock: 5,
                price: Decimal::new(2500, 2),
            },
        ]
    }

    fn oracle() -> InventoryOracle {
        InventoryOracle::new(Arc::new(InMemoryCatalog::new(blue_tshirt_catalog())))
    }

    fn query(quantity: u32, color: Option<&str>, size: Option<&str>) -> InventoryQuery {
        InventoryQuery {
            item_name: "t-shirt".to_string(),
            quantity,
            attributes: ItemAttributes {
                color: color.map(str::to_string),
                size: size.map(str::to_string),
            },
        }
    }

    #[tokio::test]
    async fn matching_item_with_enough_stock_is_available() {
        let result = oracle()
            .check_availability(&query(3, Some("blue"), Some("M")))
            .await
            .expect("catalog readable");

        assert!(result.available);
        assert_eq!(result.remaining_stock, Some(5));
        assert_eq!(result.item.expect("matched item").sku, "TS-001");
    }

    #[tokio::test]
    async fn insufficient_stock_still_reports_the_matched_item() {
        let result = oracle()
            .check_availability(&query(10, Some("blue"), Some("M")))
            .await
            .expect("catalog readable");

        assert!(!result.available);
        assert_eq!(result.remaining_stock, Some(5));
        assert!(result.item.is_some());
    }

    #[tokio::test]
    async fn unmatched_size_returns_no_item_at_all() {
        let result = oracle()
            .check_availability(&query(1, None, Some("XL")))
            .await
            .expect("catalog readable");

        assert!(!result.available);
        assert!(result.item.is_none());
        assert!(result.remaining_stock.is_none());
    }

    #[tokio::test]
    async fn absent_attributes_are_automatically_satisfied() {
        let result = oracle()
            .check_availability(&query(1, None, None))
            .await
            .expect("catalog readable");

        assert!(result.available);
        assert_eq!(result.item.expect("matched item").name, "Blue T-Shirt");
    }

    #[tokio::test]
    async fn first_snapshot_match_wins() {
        let oracle = InventoryOracle::new(Arc::new(InMemoryCatalog::new(vec![
            InventoryItem {
                sku: "TS-010".to_string(),
                name: "Blue T-Shirt Slim".to_string(),
                color: "Blue".to_string(),
                size: "M".to_string(),
                stock: 1,
                price: Decimal::new(2900, 2),
            },
            InventoryItem {
                sku: "TS-011".to_string(),
                name: "Blue T-Shirt Classic".to_string(),
                color: "Blue".to_string(),
                size: "M".to_string(),
                stock: 50,
                price: Decimal::new(2500, 2),
            },
        ])));

        let result = oracle
            .check_availability(&query(2, None, None))
            .await
            .expect("catalog readable");

        // Snapshot order decides, even when a later row could satisfy the
        // quantity.
        assert!(!result.available);
        assert_eq!(result.item.expect("matched item").sku, "TS-010");
    }
}
