use serde::Serialize;

use borong_core::fallback;
use borong_core::{Intent, InventoryQuery, Order};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ClassifyReport {
    text: String,
    intent: Intent,
    inventory_query: Option<InventoryQuery>,
    order_preview: Option<Order>,
    faq_answer: Option<String>,
}

/// Offline preview of what the pipeline would do with a message when every
/// remote capability is unconfigured. Extraction previews are only shown for
/// the intent the classifier actually picked.
pub fn run(text: &str, json_output: bool) -> CommandResult {
    let intent = fallback::classify(text);

    let report = ClassifyReport {
        text: text.to_string(),
        intent,
        inventory_query: match intent {
            Intent::Inventory => Some(fallback::extract_inventory_query(text)),
            _ => None,
        },
        order_preview: match intent {
            Intent::Order => Some(fallback::extract_order(text, "unknown", None)),
            _ => None,
        },
        faq_answer: match intent {
            Intent::Faq => Some(fallback::faq_answer(text)),
            _ => None,
        },
    };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"intent\":\"general\",\"error\":\"{}\"}}",
                error.to_string().replace('"', "\\\"")
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code: 0, output }
}

fn render_human(report: &ClassifyReport) -> String {
    let mut lines = vec![format!("intent: {}", report.intent.as_str())];
    if let Some(query) = &report.inventory_query {
        lines.push(format!(
            "inventory query: item={:?} color={:?} size={:?} quantity={}",
            query.item_name, query.attributes.color, query.attributes.size, query.quantity
        ));
    }
    if let Some(order) = &report.order_preview {
        if let Some(line) = order.first_line() {
            lines.push(format!(
                "order preview: customer={:?} item={:?} quantity={}",
                order.customer_name, line.item_name, line.quantity
            ));
        }
    }
    if let Some(answer) = &report.faq_answer {
        lines.push(format!("faq answer: {answer}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn inventory_text_includes_extraction_preview() {
        let result = run("ada stok 3 unit t-shirt?", false);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.starts_with("intent: inventory"));
        assert!(result.output.contains("quantity=3"));
    }

    #[test]
    fn order_text_renders_json_preview() {
        let result = run("saya nak order 5 pcs baju", true);
        assert_eq!(result.exit_code, 0);
        let value: serde_json::Value =
            serde_json::from_str(&result.output).expect("json output parses");
        assert_eq!(value["intent"], "order");
        assert!(value["order_preview"].is_object());
        assert!(value["inventory_query"].is_null());
    }

    #[test]
    fn general_text_has_no_extraction_sections() {
        let result = run("hello there", false);
        assert_eq!(result.output, "intent: general");
    }
}
