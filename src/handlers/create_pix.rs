use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::error;

use crate::app::router::AppState;
use crate::models::payment::ChargeRequest;
use crate::services::charge_service::ChargeError;

pub async fn create_pix(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let request: ChargeRequest = match serde_json::from_value(payload) {
        Ok(req) => req,
        Err(e) => {
            error!("Invalid charge request body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Corpo da requisição inválido"})),
            );
        }
    };

    match state.charges.create_charge(request).await {
        Ok(created) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "payment_id": created.charge.id,
                "qr_code": created.charge.qr_code,
                "qr_code_base64": created.charge.qr_code_base64,
                "amount": created.charge.amount,
                "status": created.charge.status,
                "ticket_url": created.charge.ticket_url,
                "expiration_date": created.charge.expiration_date,
                "platform_fee": created.platform_fee,
                "instructor_amount": created.instructor_amount,
            })),
        ),
        Err(err) => charge_error_response(err),
    }
}

fn charge_error_response(err: ChargeError) -> (StatusCode, Json<Value>) {
    match err {
        ChargeError::InvalidAmount | ChargeError::MissingPayerEmail => (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": err.to_string()})),
        ),
        ChargeError::ProviderRejected { ref message, ref cause } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "message": message,
                "error": {"message": message, "cause": cause},
            })),
        ),
        ChargeError::ProviderResponseIncomplete(ref norm_err) => {
            let crate::services::normalizer::NormalizationError::MissingTransactionData {
                received,
            } = norm_err;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": err.to_string(),
                    "debug": {"received": received},
                })),
            )
        }
    }
}
