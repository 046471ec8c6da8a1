use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::router::AppState;
use crate::models::webhook::WebhookEvent;
use crate::services::webhook_reconciler::WebhookError;

/// POST /api/webhook: provider notifications. Always acknowledges with
/// 200 "OK" once the reconciliation attempt ran; only a structurally
/// unusable event (no payment id) earns a 400, since redelivering it
/// could never succeed either.
pub async fn webhook(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let event: WebhookEvent = match serde_json::from_value(payload) {
        Ok(event) => event,
        Err(e) => {
            // Unknown notification format: acknowledge so the provider
            // does not keep redelivering something we will never parse.
            warn!("Unparseable webhook payload: {}", e);
            return (StatusCode::OK, "OK").into_response();
        }
    };

    match state.webhooks.process(event).await {
        Ok(outcome) => {
            info!("Webhook processed: {:?}", outcome);
            (StatusCode::OK, "OK").into_response()
        }
        Err(err @ WebhookError::MissingPaymentId) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": err.to_string()})),
        )
            .into_response(),
    }
}
