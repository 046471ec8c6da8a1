use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::app::router::AppState;
use crate::models::payment::StatusSnapshot;
use crate::services::status_service::QueryError;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(alias = "paymentId")]
    payment_id: Option<String>,
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

/// POST /api/checkPaymentStatus: read by body, with optional caller token.
pub async fn check_payment_status(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let request: StatusRequest = match serde_json::from_value(payload) {
        Ok(req) => req,
        Err(e) => {
            error!("Invalid status request body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Corpo da requisição inválido"})),
            );
        }
    };

    let payment_id = request.payment_id.unwrap_or_default();
    let result = state
        .status
        .query_status(&payment_id, request.access_token.as_deref())
        .await;

    status_response(result)
}

/// GET /api/mercadoPagoStatus/{id}: same read by path, no token override.
pub async fn payment_status_by_id(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    status_response(state.status.query_status(&payment_id, None).await)
}

fn status_response(result: Result<StatusSnapshot, QueryError>) -> (StatusCode, Json<Value>) {
    match result {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "payment_id": snapshot.id,
                "status": snapshot.status,
                "status_detail": snapshot.status_detail,
                "date_approved": snapshot.date_approved,
                "transaction_amount": snapshot.transaction_amount,
            })),
        ),
        Err(err) => {
            let status = match &err {
                QueryError::MissingId => StatusCode::BAD_REQUEST,
                QueryError::NotFound => StatusCode::NOT_FOUND,
                // Mirror the provider's own status when it is an error code
                QueryError::ProviderUnavailable { status, .. } => status
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .filter(|code| code.is_client_error() || code.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
            };
            (
                status,
                Json(json!({"success": false, "message": err.to_string()})),
            )
        }
    }
}
