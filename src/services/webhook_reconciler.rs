use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::webhook::{EntityFilter, EntityPatch, ReconciliationUpdate, WebhookEvent};
use crate::services::entity_store::EntityStoreUpdater;
use crate::services::mercado_pago::PaymentProvider;
use crate::services::normalizer;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("data.id ausente no evento do webhook")]
    MissingPaymentId,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Event acknowledged with no downstream effect.
    Ignored,
    Reconciled {
        payment_id: String,
        entity_status: String,
    },
}

/// Maps the provider's status vocabulary to the entity store's. Only
/// `approved` changes name; everything else passes through as-is.
pub fn to_entity_status(provider_status: &str) -> &str {
    match provider_status {
        "approved" => "completed",
        other => other,
    }
}

pub struct WebhookReconciler {
    provider: Arc<dyn PaymentProvider>,
    entity_store: Arc<dyn EntityStoreUpdater>,
}

impl WebhookReconciler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        entity_store: Arc<dyn EntityStoreUpdater>,
    ) -> Self {
        Self {
            provider,
            entity_store,
        }
    }

    /// Reconciles one provider notification. The notification body is only
    /// a trigger: the authoritative status is re-fetched from the provider
    /// before anything is pushed downstream. Entity-store failures are
    /// logged and swallowed, otherwise the provider would redeliver the
    /// event indefinitely.
    pub async fn process(&self, event: WebhookEvent) -> Result<ReconcileOutcome, WebhookError> {
        if !event.is_payment_event() {
            info!("Ignoring webhook action {:?}", event.action);
            return Ok(ReconcileOutcome::Ignored);
        }

        let payment_id = event.payment_id().ok_or(WebhookError::MissingPaymentId)?;
        info!("Webhook received for payment {}", payment_id);

        let raw = match self.provider.find_payment(&payment_id, None).await {
            Ok(raw) => raw,
            Err(err) => {
                // Acknowledge anyway; the provider redelivers the event and
                // the whole reconciliation runs again.
                warn!(
                    "Could not re-fetch payment {} for reconciliation: {}",
                    payment_id, err
                );
                return Ok(ReconcileOutcome::Ignored);
            }
        };

        let snapshot = normalizer::normalize_status(&raw);
        let update = ReconciliationUpdate {
            filter: EntityFilter {
                transaction_id: payment_id.clone(),
            },
            patch: EntityPatch {
                status: to_entity_status(&snapshot.status).to_string(),
            },
        };

        if let Err(err) = self.entity_store.update(&update.filter, &update.patch).await {
            error!(
                "Entity store update failed for payment {}: {}",
                payment_id, err
            );
        }

        Ok(ReconcileOutcome::Reconciled {
            payment_id,
            entity_status: update.patch.status,
        })
    }
}
