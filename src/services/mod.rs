pub mod charge_service;
pub mod entity_store;
pub mod mercado_pago;
pub mod normalizer;
pub mod status_service;
pub mod webhook_reconciler;

pub use charge_service::{ChargeError, ChargeService};
pub use status_service::{QueryError, StatusService};
pub use webhook_reconciler::{ReconcileOutcome, WebhookError, WebhookReconciler};
