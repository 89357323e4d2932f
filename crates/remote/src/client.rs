use std::time::Duration;

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use borong_core::config::RemoteConfig;
use borong_core::domain::intent::Intent;
use borong_core::domain::inventory::InventoryQuery;
use borong_core::domain::order::Order;
use borong_core::errors::RemoteError;
use borong_core::fallback::{self, TrendDataset};

use crate::resolved::Resolved;

#[derive(Clone, Copy, Debug)]
enum TableKind {
    Action,
    Knowledge,
    Generative,
}

impl TableKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Knowledge => "knowledge",
            Self::Generative => "generative",
        }
    }
}

/// Adapter for the external table-invocation service.
///
/// Uniform contract across all five capabilities: capability table id unset
/// → deterministic fallback with no network activity; table id set but the
/// call fails or the response lacks the expected field → warn and fall back.
/// No capability method ever returns an error.
pub struct RemoteIntentClient {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteIntentClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|error| RemoteError::Transport(error.to_string()))?;
        Ok(Self { http, config })
    }

    pub async fn detect_intent(&self, message: &str) -> Resolved<Intent> {
        let Some(table_id) = self.config.tables.intent.clone() else {
            return self.skip("detect_intent", fallback::classify(message));
        };

        let payload = json!({ "input": { "message": message } });
        match self.invoke_field::<String>(TableKind::Action, &table_id, payload, "intent").await {
            Ok(label) => Resolved::Remote(Intent::from_label(&label)),
            Err(error) => self.degrade("detect_intent", error, fallback::classify(message)),
        }
    }

    pub async fn answer_faq(&self, query: &str) -> Resolved<String> {
        let Some(table_id) = self.config.tables.faq.clone() else {
            return self.skip("answer_faq", fallback::faq_answer(query));
        };

        let payload = json!({ "query": query, "options": { "language": "ms-en" } });
        match self.invoke_field::<String>(TableKind::Knowledge, &table_id, payload, "answer").await
        {
            Ok(answer) => Resolved::Remote(answer),
            Err(error) => self.degrade("answer_faq", error, fallback::faq_answer(query)),
        }
    }

    pub async fn extract_inventory_query(&self, message: &str) -> Resolved<InventoryQuery> {
        let Some(table_id) = self.config.tables.inventory.clone() else {
            return self.skip("extract_inventory_query", fallback::extract_inventory_query(message));
        };

        let payload = json!({ "input": { "message": message } });
        match self
            .invoke_field::<InventoryQuery>(TableKind::Action, &table_id, payload, "inventoryRequest")
            .await
        {
            Ok(query) => Resolved::Remote(query),
            Err(error) => self.degrade(
                "extract_inventory_query",
                error,
                fallback::extract_inventory_query(message),
            ),
        }
    }

    pub async fn extract_order(
        &self,
        message: &str,
        phone_number: &str,
        display_name: Option<&str>,
    ) -> Resolved<Order> {
        let synthesize = || fallback::extract_order(message, phone_number, display_name);

        let Some(table_id) = self.config.tables.order.clone() else {
            return self.skip("extract_order", synthesize());
        };

        let payload = json!({
            "input": {
                "message": message,
                "phoneNumber": phone_number,
                "displayName": display_name,
            }
        });
        match self.invoke_field::<Order>(TableKind::Action, &table_id, payload, "order").await {
            Ok(order) if !order.line_items.is_empty() => Resolved::Remote(order),
            Ok(_) => self.degrade(
                "extract_order",
                RemoteError::MissingField("order.lineItems"),
                synthesize(),
            ),
            Err(error) => self.degrade("extract_order", error, synthesize()),
        }
    }

    pub async fn analyze_trends(&self, dataset: &TrendDataset) -> Resolved<String> {
        let Some(table_id) = self.config.tables.analytics.clone() else {
            return self.skip("analyze_trends", fallback::analyze_trends(dataset));
        };

        let payload = json!({
            "input": { "prompt": "Analyze SME sales trends", "data": dataset }
        });
        match self
            .invoke_field::<String>(TableKind::Generative, &table_id, payload, "insights")
            .await
        {
            Ok(insights) => Resolved::Remote(insights),
            Err(error) => self.degrade("analyze_trends", error, fallback::analyze_trends(dataset)),
        }
    }

    /// Configuration-gated short-circuit: not an error path, so only a debug
    /// trace is emitted.
    fn skip<T>(&self, capability: &'static str, value: T) -> Resolved<T> {
        debug!(
            event_name = "remote.capability.unconfigured",
            capability, "capability table id unset, using fallback"
        );
        Resolved::Fallback(value)
    }

    fn degrade<T>(&self, capability: &'static str, error: RemoteError, value: T) -> Resolved<T> {
        warn!(
            event_name = "remote.capability.degraded",
            capability,
            error = %error,
            "remote invocation failed, using fallback"
        );
        Resolved::Fallback(value)
    }

    async fn invoke_field<T: DeserializeOwned>(
        &self,
        kind: TableKind,
        table_id: &str,
        payload: Value,
        field: &'static str,
    ) -> Result<T, RemoteError> {
        let response = self.invoke(kind, table_id, payload).await?;
        let value = response.get(field).ok_or(RemoteError::MissingField(field))?;
        serde_json::from_value(value.clone())
            .map_err(|error| RemoteError::Decode(error.to_string()))
    }

    async fn invoke(
        &self,
        kind: TableKind,
        table_id: &str,
        payload: Value,
    ) -> Result<Value, RemoteError> {
        let url = format!(
            "{}/tables/{}/{}/invoke",
            self.config.base_url.trim_end_matches('/'),
            kind.as_str(),
            table_id
        );

        let mut request = self.http.post(&url).json(&payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|error| RemoteError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status { status: status.as_u16() });
        }

        response
            .json::<Value>()
            .await
            .map_err(|error| RemoteError::Decode(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use borong_core::config::{RemoteConfig, RemoteTableIds};
    use borong_core::domain::intent::Intent;

    use super::RemoteIntentClient;

    fn unconfigured() -> RemoteIntentClient {
        RemoteIntentClient::new(RemoteConfig {
            base_url: "https://remote.invalid/v1".to_string(),
            api_key: None,
            timeout_secs: 1,
            tables: RemoteTableIds::default(),
        })
        .expect("client should build")
    }

    /// Table ids are set but the endpoint is unreachable, so every call must
    /// degrade to the fallback.
    fn unreachable() -> RemoteIntentClient {
        RemoteIntentClient::new(RemoteConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
            timeout_secs: 1,
            tables: RemoteTableIds {
                intent: Some("tbl-intent".to_string()),
                faq: Some("tbl-faq".to_string()),
                inventory: Some("tbl-inventory".to_string()),
                order: Some("tbl-order".to_string()),
                analytics: Some("tbl-analytics".to_string()),
            },
        })
        .expect("client should build")
    }

    #[tokio::test]
    async fn unconfigured_intent_table_short_circuits_to_fallback() {
        let client = unconfigured();
        let resolved = client.detect_intent("ada tak stok baju?").await;
        assert!(!resolved.is_remote());
        assert_eq!(resolved.into_inner(), Intent::Inventory);
    }

    #[tokio::test]
    async fn unreachable_intent_table_degrades_to_fallback() {
        let client = unreachable();
        let resolved = client.detect_intent("nak tempah baju").await;
        assert!(!resolved.is_remote());
        assert_eq!(resolved.into_inner(), Intent::Order);
    }

    #[tokio::test]
    async fn unreachable_faq_table_returns_exact_fallback_template() {
        let client = unreachable();
        let resolved = client.answer_faq("berapa lama penghantaran?").await;
        assert_eq!(
            resolved.into_inner(),
            "Maaf, saya tidak jumpa maklumat tepat untuk soalan \
             \"berapa lama penghantaran?\". Boleh saya bantu dengan stok atau buat pesanan?"
        );
    }

    #[tokio::test]
    async fn unreachable_order_table_synthesizes_fallback_order() {
        let client = unreachable();
        let order = client.extract_order("nak 40 baju", "+60123", Some("Aina")).await.into_inner();
        assert_eq!(order.customer_name, "Aina");
        assert_eq!(order.phone_number, "+60123");
        assert_eq!(order.line_items[0].quantity, 40);
    }

    #[tokio::test]
    async fn unconfigured_inventory_table_uses_fallback_extraction() {
        let client = unconfigured();
        let query = client.extract_inventory_query("5 units blue tee").await.into_inner();
        assert_eq!(query.quantity, 5);
        assert_eq!(query.attributes.color.as_deref(), Some("Blue"));
    }
}
