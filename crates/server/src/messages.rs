use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use borong_core::domain::message::InboundMessage;

use crate::bootstrap::AppState;

/// Inbound webhook payload from the messaging channel integration.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

pub async fn process_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> (StatusCode, Json<Value>) {
    // Malformed input is rejected before the pipeline starts.
    let (Some(text), Some(phone_number)) = (request.message, request.phone_number) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Message and phoneNumber are required" })),
        );
    };

    let inbound = match InboundMessage::new(
        text,
        phone_number,
        request.display_name,
        request.channel,
        request.locale,
    ) {
        Ok(inbound) => inbound,
        Err(validation) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": validation.to_string() })),
            );
        }
    };

    match state.pipeline.process(&inbound).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "intent": outcome.intent,
                "reply": outcome.reply,
                "metadata": outcome.metadata,
            })),
        ),
        Err(pipeline_error) => {
            error!(
                event_name = "server.message.fulfillment_failed",
                error = %pipeline_error,
                "message fulfillment failed"
            );
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "success": false, "error": pipeline_error.to_string() })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;

    use crate::testsupport::{state_with, StoreSetup};

    use super::{process_message, MessageRequest};

    fn request(message: Option<&str>, phone: Option<&str>) -> MessageRequest {
        MessageRequest {
            message: message.map(str::to_string),
            phone_number: phone.map(str::to_string),
            display_name: Some("Aina".to_string()),
            channel: None,
            locale: None,
        }
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_the_pipeline() {
        let state = state_with(StoreSetup::default()).await;
        let (status, Json(body)) =
            process_message(State(state), Json(request(None, Some("+60123")))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn stock_question_replies_with_intent_and_metadata() {
        let state = state_with(StoreSetup::default()).await;
        let (status, Json(body)) =
            process_message(State(state), Json(request(Some("ada stok 3 unit t-shirt?"), Some("+60123"))))
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], serde_json::json!(true));
        assert_eq!(body["intent"], serde_json::json!("inventory"));
        assert!(body["metadata"]["availability"].is_object());
    }

    #[tokio::test]
    async fn order_store_outage_maps_to_bad_gateway() {
        let state = state_with(StoreSetup { failing_orders: true, ..StoreSetup::default() }).await;
        let (status, Json(body)) =
            process_message(State(state), Json(request(Some("nak order 20 baju"), Some("+60123"))))
                .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], serde_json::json!(false));
        assert!(body["error"].as_str().unwrap_or_default().contains("order"));
    }
}
