use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};

use crate::app::config::Config;
use crate::handlers;
use crate::services::entity_store::{Base44Client, EntityStoreUpdater};
use crate::services::mercado_pago::{MercadoPagoClient, PaymentProvider};
use crate::services::{ChargeService, StatusService, WebhookReconciler};

#[derive(Clone)]
pub struct AppState {
    pub charges: Arc<ChargeService>,
    pub status: Arc<StatusService>,
    pub webhooks: Arc<WebhookReconciler>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(5000))
            .build()
            .expect("Failed to create HTTP client");

        let provider: Arc<dyn PaymentProvider> =
            Arc::new(MercadoPagoClient::new(client.clone(), config));
        let entity_store: Arc<dyn EntityStoreUpdater> =
            Arc::new(Base44Client::new(client, config));

        Self {
            charges: Arc::new(ChargeService::new(
                provider.clone(),
                &config.webhook_base_url,
            )),
            status: Arc::new(StatusService::new(provider.clone())),
            webhooks: Arc::new(WebhookReconciler::new(provider, entity_store)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/mercadoPagoCreatePix", post(handlers::create_pix))
        .route("/api/checkPaymentStatus", post(handlers::check_payment_status))
        .route(
            "/api/mercadoPagoStatus/:id",
            get(handlers::payment_status_by_id),
        )
        .route("/api/webhook", post(handlers::webhook))
        .with_state(state)
}

async fn index() -> &'static str {
    "API Mercado Pago PIX funcionando corretamente"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::Json;
    use axum::routing::put;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn test_config(provider_url: &str, store_url: &str) -> Config {
        Config {
            server_port: 0,
            mp_access_token: "TEST-TOKEN".to_string(),
            mp_api_url: provider_url.to_string(),
            base44_api_key: Some("test-key".to_string()),
            base44_api_url: store_url.to_string(),
            webhook_base_url: "http://localhost:3000".to_string(),
        }
    }

    async fn spawn_app(provider_url: &str, store_url: &str) -> String {
        let state = AppState::from_config(&test_config(provider_url, store_url));
        spawn(build_router(state)).await
    }

    fn create_stub(response: Value) -> Router {
        Router::new().route(
            "/v1/payments",
            post(move || {
                let response = response.clone();
                async move { (StatusCode::CREATED, Json(response)) }
            }),
        )
    }

    #[tokio::test]
    async fn test_liveness_probe() {
        let app = spawn_app("http://localhost:1", "http://localhost:1").await;

        let response = reqwest::get(format!("{}/", app)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.text().await.unwrap().contains("Mercado Pago PIX"));
    }

    #[tokio::test]
    async fn test_create_pix_end_to_end() {
        let provider = spawn(create_stub(json!({
            "id": "123",
            "status": "pending",
            "point_of_interaction": {
                "transaction_data": {
                    "qr_code": "00020126360014BR.GOV.BCB.PIX",
                    "qr_code_base64": "iVBORw0KGgo="
                }
            }
        })))
        .await;
        let app = spawn_app(&provider, "http://localhost:1").await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/mercadoPagoCreatePix", app))
            .json(&json!({"amount": 50, "payer": {"email": "a@b.com"}}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["payment_id"], json!("123"));
        assert_eq!(body["qr_code"], json!("00020126360014BR.GOV.BCB.PIX"));
        assert_eq!(body["qr_code_base64"], json!("iVBORw0KGgo="));
        assert_eq!(body["status"], json!("pending"));
        assert_eq!(body["amount"], json!(50.0));
    }

    #[tokio::test]
    async fn test_create_pix_unrecognized_provider_shape_returns_debug_payload() {
        let stub_body = json!({"id": 1, "status": "pending"});
        let provider = spawn(create_stub(stub_body.clone())).await;
        let app = spawn_app(&provider, "http://localhost:1").await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/mercadoPagoCreatePix", app))
            .json(&json!({"amount": 50, "payer": {"email": "a@b.com"}}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["debug"]["received"], stub_body);
    }

    #[tokio::test]
    async fn test_create_pix_validation_errors_are_400() {
        let app = spawn_app("http://localhost:1", "http://localhost:1").await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/mercadoPagoCreatePix", app))
            .json(&json!({"amount": -5, "payer": {"email": "a@b.com"}}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let response = client
            .post(format!("{}/api/mercadoPagoCreatePix", app))
            .json(&json!({"amount": 50}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_webhook_reconciles_into_entity_store() {
        let updates = Arc::new(Mutex::new(Vec::<Value>::new()));

        let provider = spawn(Router::new().route(
            "/v1/payments/:id",
            get(|Path(id): Path<String>| async move {
                Json(json!({"id": id, "status": "approved"}))
            }),
        ))
        .await;

        let store = spawn(Router::new().route(
            "/entities/Payment",
            put({
                let updates = updates.clone();
                move |Json(body): Json<Value>| {
                    let updates = updates.clone();
                    async move {
                        updates.lock().unwrap().push(body);
                        StatusCode::OK
                    }
                }
            }),
        ))
        .await;

        let app = spawn_app(&provider, &store).await;
        let client = reqwest::Client::new();

        // Redelivered twice; both reconciliations must converge to the
        // same entity-store write.
        for _ in 0..2 {
            let response = client
                .post(format!("{}/api/webhook", app))
                .json(&json!({"action": "payment.updated", "data": {"id": 123}}))
                .send()
                .await
                .unwrap();

            assert_eq!(response.status(), 200);
            assert_eq!(response.text().await.unwrap(), "OK");
        }

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0]["filter"]["transaction_id"], json!("123"));
        assert_eq!(updates[0]["data"]["status"], json!("completed"));
        assert_eq!(updates[0], updates[1]);
    }

    #[tokio::test]
    async fn test_webhook_missing_id_is_400_and_foreign_action_is_ignored() {
        let app = spawn_app("http://localhost:1", "http://localhost:1").await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/webhook", app))
            .json(&json!({"action": "payment.updated", "data": {}}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        // Foreign action: acknowledged even though no provider is reachable
        let response = client
            .post(format!("{}/api/webhook", app))
            .json(&json!({"action": "plan.updated", "data": {"id": 1}}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_check_payment_status_end_to_end() {
        let provider = spawn(Router::new().route(
            "/v1/payments/:id",
            get(|Path(id): Path<String>| async move {
                if id == "404" {
                    return (StatusCode::NOT_FOUND, Json(json!({"message": "not found"})));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "id": id,
                        "status": "approved",
                        "status_detail": "accredited",
                        "transaction_amount": 50.0,
                        "date_approved": "2025-01-15T10:00:00.000-03:00"
                    })),
                )
            }),
        ))
        .await;
        let app = spawn_app(&provider, "http://localhost:1").await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/checkPaymentStatus", app))
            .json(&json!({"paymentId": "123"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["payment_id"], json!("123"));
        assert_eq!(body["status"], json!("approved"));
        assert_eq!(body["status_detail"], json!("accredited"));

        // Same read through the path-parameter route
        let response = client
            .get(format!("{}/api/mercadoPagoStatus/123", app))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let response = client
            .post(format!("{}/api/checkPaymentStatus", app))
            .json(&json!({"payment_id": "404"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);

        let response = client
            .post(format!("{}/api/checkPaymentStatus", app))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }
}
