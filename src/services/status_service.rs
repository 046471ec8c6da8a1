use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::payment::StatusSnapshot;
use crate::services::mercado_pago::{PaymentProvider, ProviderError};
use crate::services::normalizer;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("payment_id é obrigatório")]
    MissingId,
    #[error("Pagamento não encontrado")]
    NotFound,
    #[error("{message}")]
    ProviderUnavailable {
        status: Option<u16>,
        message: String,
    },
}

pub struct StatusService {
    provider: Arc<dyn PaymentProvider>,
}

impl StatusService {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    /// Reads authoritative payment status from the provider. A credential
    /// supplied by the caller takes precedence over the configured one.
    pub async fn query_status(
        &self,
        payment_id: &str,
        access_token: Option<&str>,
    ) -> Result<StatusSnapshot, QueryError> {
        let payment_id = payment_id.trim();
        if payment_id.is_empty() {
            return Err(QueryError::MissingId);
        }

        let raw = self
            .provider
            .find_payment(payment_id, access_token)
            .await
            .map_err(|err| match err {
                ProviderError::NotFound => {
                    warn!("Payment {} not found at provider", payment_id);
                    QueryError::NotFound
                }
                ProviderError::Rejected {
                    status, message, ..
                } => QueryError::ProviderUnavailable { status, message },
                ProviderError::Transport(err) => QueryError::ProviderUnavailable {
                    status: None,
                    message: err.to_string(),
                },
            })?;

        let mut snapshot = normalizer::normalize_status(&raw);
        if snapshot.id.is_none() {
            snapshot.id = Some(payment_id.to_string());
        }

        info!(
            "Payment {} status: {} ({:?})",
            payment_id, snapshot.status, snapshot.status_detail
        );
        Ok(snapshot)
    }
}
