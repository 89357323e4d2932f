//! Outbound reply templates used by the pipeline orchestrator.

use crate::domain::inventory::AvailabilityResult;
use crate::domain::inventory::InventoryQuery;
use crate::domain::order::Order;

pub fn greeting() -> String {
    "Hai! Saya bot borong anda. Saya boleh bantu semak stok, jawab FAQ, \
     atau urus pesanan borong anda."
        .to_string()
}

pub fn availability(query: &InventoryQuery, availability: &AvailabilityResult) -> String {
    match (&availability.item, availability.remaining_stock) {
        (Some(item), Some(remaining)) if availability.available => format!(
            "Yes, stok {} unit untuk {} tersedia. Baki stok: {}. Mahu teruskan pesanan?",
            query.quantity, item.name, remaining
        ),
        _ => "Maaf, stok tidak mencukupi sekarang. Boleh kami cadangkan pilihan lain?"
            .to_string(),
    }
}

pub fn order_recorded(order: &Order) -> String {
    let (item_name, quantity) = order
        .first_line()
        .map(|line| (line.item_name.as_str(), line.quantity.to_string()))
        .unwrap_or(("produk", String::new()));

    format!(
        "Terima kasih {}! Pesanan {} ({} unit) telah direkod. \
         Kami akan hubungi anda untuk pengesahan penghantaran.",
        order.customer_name, item_name, quantity
    )
}
