//! Lead capture for the dashboard collaborator: listing reads the last ten
//! order-intent turns out of the conversation journal, creation appends a
//! lead row.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use borong_core::Intent;
use borong_db::NewLead;

use crate::bootstrap::AppState;

const LEAD_LIST_LIMIT: u32 = 10;

pub async fn list_leads(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.log.recent_by_intent(Intent::Order, LEAD_LIST_LIMIT).await {
        Ok(records) => (StatusCode::OK, Json(json!({ "success": true, "data": records }))),
        Err(log_error) => {
            error!(
                event_name = "server.leads.list_failed",
                error = %log_error,
                "lead listing failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": log_error.to_string() })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LeadRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn create_lead(
    State(state): State<AppState>,
    Json(request): Json<LeadRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(phone) = request.phone.filter(|phone| !phone.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "phone is required" })),
        );
    };

    let lead = NewLead { name: request.name, phone, notes: request.notes };
    match state.leads.create(&lead).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "success": true, "id": id }))),
        Err(store_error) => {
            error!(
                event_name = "server.leads.create_failed",
                error = %store_error,
                "lead creation failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": store_error.to_string() })),
            )
        }
    }
}
