use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "itemName")]
    pub item_name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// A captured wholesale order, handed to the order store for append-only
/// persistence. Invariant: `line_items` is never empty — both extraction
/// paths synthesize at least one line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "lineItems")]
    pub line_items: Vec<LineItem>,
    #[serde(rename = "deliveryAddress")]
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    /// The persisted row projection covers only the first line item; this
    /// accessor is the single place that encodes that limitation.
    pub fn first_line(&self) -> Option<&LineItem> {
        self.line_items.first()
    }
}
