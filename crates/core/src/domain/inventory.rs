use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the catalog snapshot. Read-only from the pipeline's
/// perspective; the snapshot is re-read in full on every availability check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub sku: String,
    pub name: String,
    pub color: String,
    pub size: String,
    pub stock: u32,
    pub price: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Structured stock question derived from free text, by remote extraction or
/// the fallback heuristic. `item_name` is always resolvable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryQuery {
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub attributes: ItemAttributes,
}

fn default_quantity() -> u32 {
    1
}

/// Outcome of one availability check. `item` and `remaining_stock` are
/// present iff a matching catalog row was found, regardless of `available`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<InventoryItem>,
    #[serde(rename = "remainingStock", skip_serializing_if = "Option::is_none")]
    pub remaining_stock: Option<u32>,
}

impl AvailabilityResult {
    pub fn no_match() -> Self {
        Self { available: false, item: None, remaining_stock: None }
    }
}
