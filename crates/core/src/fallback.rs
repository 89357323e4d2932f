//! Deterministic, network-free substitutes for every remote capability.
//!
//! These are pure functions of their inputs and never fail; they are the
//! guaranteed answer path whenever the remote table service is unconfigured
//! or unhealthy.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::intent::Intent;
use crate::domain::inventory::{InventoryQuery, ItemAttributes};
use crate::domain::order::{LineItem, Order};

// Matching order is policy, not accident: stock questions are more common
// and more specific than generic order language, so inventory keywords win
// over order keywords, which win over FAQ keywords.
const INVENTORY_KEYWORDS: &[&str] = &["stok", "stock", "ada tak", "availability"];
const ORDER_KEYWORDS: &[&str] = &["order", "tempah", "purchase", "buy"];
const FAQ_KEYWORDS: &[&str] = &["refund", "return", "policy", "time"];

pub const DEFAULT_INVENTORY_ITEM: &str = "t-shirt";
pub const DEFAULT_ORDER_ITEM: &str = "Bulk T-Shirt";
pub const DEFAULT_ORDER_QUANTITY: u32 = 10;
pub const DEFAULT_CUSTOMER_NAME: &str = "WhatsApp Customer";
pub const DEFAULT_DELIVERY_ADDRESS: &str = "To be confirmed";

static QUANTITY_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(pcs|pieces|unit|units)?\s*(?:of)?\s*([a-z0-9\s\-]+)")
        .expect("quantity/item pattern is valid")
});

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(xs|s|m|l|xl|xxl)").expect("size pattern is valid"));

static FIRST_INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer pattern is valid"));

/// Keyword classification: case-insensitive substring matching, first match
/// wins, no match buckets to `General`.
pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();

    let contains_any = |keywords: &[&str]| keywords.iter().any(|kw| lowered.contains(kw));

    if contains_any(INVENTORY_KEYWORDS) {
        Intent::Inventory
    } else if contains_any(ORDER_KEYWORDS) {
        Intent::Order
    } else if contains_any(FAQ_KEYWORDS) {
        Intent::Faq
    } else {
        Intent::General
    }
}

/// Heuristic `{quantity}{unit?}{item}` extraction. Quantity defaults to 1
/// and the item name to a generic placeholder when the pattern finds
/// nothing, so the resulting query is always resolvable.
pub fn extract_inventory_query(text: &str) -> InventoryQuery {
    let lowered = text.to_lowercase();
    let captures = QUANTITY_ITEM_RE.captures(text);

    let (quantity, item_name) = match &captures {
        Some(caps) => {
            let quantity = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(1);
            let item_name = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_INVENTORY_ITEM.to_string());
            (quantity, item_name)
        }
        None => (1, DEFAULT_INVENTORY_ITEM.to_string()),
    };

    let color = lowered.contains("blue").then(|| "Blue".to_string());
    let size = SIZE_RE.find(text).map(|m| m.as_str().to_uppercase());

    InventoryQuery {
        item_name,
        quantity,
        attributes: ItemAttributes { color, size },
    }
}

/// Synthesizes a single-line order when remote extraction is unavailable.
/// The full original text is kept as both line remarks and order notes so a
/// human can recover whatever the heuristic dropped.
pub fn extract_order(text: &str, phone_number: &str, display_name: Option<&str>) -> Order {
    let quantity = FIRST_INTEGER_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(DEFAULT_ORDER_QUANTITY);

    Order {
        customer_name: display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_CUSTOMER_NAME)
            .to_string(),
        phone_number: phone_number.to_string(),
        line_items: vec![LineItem {
            item_name: DEFAULT_ORDER_ITEM.to_string(),
            quantity,
            remarks: Some(text.to_string()),
        }],
        delivery_address: DEFAULT_DELIVERY_ADDRESS.to_string(),
        notes: Some(text.to_string()),
    }
}

/// Fixed apology-plus-redirect answer, parameterized only by the echoed
/// query text.
pub fn faq_answer(query: &str) -> String {
    format!(
        "Maaf, saya tidak jumpa maklumat tepat untuk soalan \"{query}\". \
         Boleh saya bantu dengan stok atau buat pesanan?"
    )
}

/// Aggregated order figures fed to the trends capability.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendDataset {
    #[serde(rename = "totalOrders", default)]
    pub total_orders: u64,
    #[serde(rename = "topProduct", default)]
    pub top_product: Option<String>,
    #[serde(rename = "topProductShare", default)]
    pub top_product_share: u32,
}

pub fn analyze_trends(dataset: &TrendDataset) -> String {
    let top_product = dataset.top_product.as_deref().unwrap_or("Blue T-Shirt");
    format!(
        "Jumlah pesanan mingguan: {}. {} menyumbang {}% daripada jualan. \
         Cadangan: tambah stok warna paling laris dan jalankan promosi hujung minggu.",
        dataset.total_orders, top_product, dataset.top_product_share
    )
}

#[cfg(test)]
mod tests {
    use crate::domain::intent::Intent;

    use super::{
        analyze_trends, classify, extract_inventory_query, extract_order, faq_answer,
        TrendDataset,
    };

    #[test]
    fn inventory_keywords_win_over_order_and_faq_keywords() {
        // Contains "stock", "order", and "refund"; precedence picks inventory.
        let intent = classify("Before I order, is this in stock or do I ask for a refund?");
        assert_eq!(intent, Intent::Inventory);
    }

    #[test]
    fn order_keywords_win_over_faq_keywords() {
        assert_eq!(classify("saya nak tempah, apa return policy?"), Intent::Order);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("ADA TAK baju?"), Intent::Inventory);
        assert_eq!(classify("REFUND please"), Intent::Faq);
    }

    #[test]
    fn unmatched_text_buckets_to_general() {
        assert_eq!(classify("hello there"), Intent::General);
    }

    #[test]
    fn classification_is_idempotent() {
        let text = "boleh buy 3 unit?";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn extracts_quantity_unit_and_item() {
        let query = extract_inventory_query("ada 5 pcs of red shirt?");
        assert_eq!(query.quantity, 5);
        assert_eq!(query.item_name, "red shirt");
    }

    #[test]
    fn inventory_extraction_defaults_when_nothing_matches() {
        let query = extract_inventory_query("???");
        assert_eq!(query.item_name, "t-shirt");
        assert_eq!(query.quantity, 1);
        assert!(query.attributes.color.is_none());
    }

    #[test]
    fn detects_blue_color_and_uppercases_size() {
        let query = extract_inventory_query("blue shirt size xl, 2 units tolong");
        assert_eq!(query.attributes.color.as_deref(), Some("Blue"));
        // The unanchored scan takes the first letter hit ('l' in "blue");
        // the behavior is intentionally bug-for-bug stable.
        assert_eq!(query.attributes.size.as_deref(), Some("L"));
    }

    #[test]
    fn malay_stock_question_extracts_via_fallback() {
        let query = extract_inventory_query("ada tak baju biru saiz M 3 unit");
        assert_eq!(query.quantity, 3);
        assert_eq!(query.attributes.size.as_deref(), Some("S"));
        assert!(query.attributes.color.is_none());
    }

    #[test]
    fn order_fallback_uses_first_integer_and_echoes_message() {
        let order = extract_order("nak tempah 25 baju korporat", "+60123", None);
        assert_eq!(order.customer_name, "WhatsApp Customer");
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].quantity, 25);
        assert_eq!(order.line_items[0].remarks.as_deref(), Some("nak tempah 25 baju korporat"));
        assert_eq!(order.notes.as_deref(), Some("nak tempah 25 baju korporat"));
        assert_eq!(order.delivery_address, "To be confirmed");
    }

    #[test]
    fn order_fallback_defaults_quantity_and_uses_display_name() {
        let order = extract_order("nak tempah banyak", "+60123", Some("Aina"));
        assert_eq!(order.customer_name, "Aina");
        assert_eq!(order.line_items[0].quantity, 10);
    }

    #[test]
    fn faq_answer_echoes_query_verbatim() {
        let answer = faq_answer("berapa lama refund?");
        assert!(answer.contains("\"berapa lama refund?\""));
    }

    #[test]
    fn trend_summary_uses_defaults_for_empty_dataset() {
        let summary = analyze_trends(&TrendDataset::default());
        assert!(summary.contains("Jumlah pesanan mingguan: 0."));
        assert!(summary.contains("Blue T-Shirt"));
    }
}
