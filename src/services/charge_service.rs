use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::models::payment::{ChargeRequest, CreatePaymentParams, CreatedCharge, PaymentPayer};
use crate::services::mercado_pago::{PaymentProvider, ProviderError};
use crate::services::normalizer::{self, NormalizationError};
use crate::utils::money::parse_amount;

const DEFAULT_DESCRIPTION: &str = "Pagamento via PIX";
const DEFAULT_FIRST_NAME: &str = "Cliente";
const DEFAULT_LAST_NAME: &str = "App Base44";

#[derive(Debug, Error)]
pub enum ChargeError {
    #[error("Valor (amount) inválido")]
    InvalidAmount,
    #[error("E-mail do pagador é obrigatório")]
    MissingPayerEmail,
    #[error("{message}")]
    ProviderRejected {
        message: String,
        cause: Option<Value>,
    },
    #[error(transparent)]
    ProviderResponseIncomplete(#[from] NormalizationError),
}

pub struct ChargeService {
    provider: Arc<dyn PaymentProvider>,
    webhook_url: String,
}

impl ChargeService {
    pub fn new(provider: Arc<dyn PaymentProvider>, webhook_base_url: &str) -> Self {
        Self {
            provider,
            webhook_url: format!("{}/api/webhook", webhook_base_url.trim_end_matches('/')),
        }
    }

    /// Validates the request, issues exactly one provider call and returns
    /// the normalized charge. Validation failures never reach the network,
    /// and nothing here retries: a duplicate PIX charge is a second
    /// real-world payment, not a harmless replay.
    pub async fn create_charge(&self, request: ChargeRequest) -> Result<CreatedCharge, ChargeError> {
        let amount = parse_amount(request.amount.as_ref()).ok_or(ChargeError::InvalidAmount)?;

        let payer = request.payer.as_ref();
        let email = payer
            .and_then(|p| p.email.as_deref())
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or(ChargeError::MissingPayerEmail)?;

        info!(
            "Creating PIX charge: amount={} payer={} lesson={:?} instructor={:?}",
            amount, email, request.lesson_id, request.instructor_id
        );

        // O Mercado Pago exige nome e sobrenome não vazios
        let params = CreatePaymentParams {
            transaction_amount: amount,
            description: request
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            payment_method_id: "pix".to_string(),
            payer: PaymentPayer {
                email: email.to_string(),
                first_name: payer
                    .and_then(|p| p.first_name.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| DEFAULT_FIRST_NAME.to_string()),
                last_name: payer
                    .and_then(|p| p.last_name.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| DEFAULT_LAST_NAME.to_string()),
            },
            notification_url: Some(self.webhook_url.clone()),
        };

        let raw = self.provider.create_payment(&params).await.map_err(|err| {
            error!("PIX charge creation failed: {}", err);
            match err {
                ProviderError::Rejected { message, cause, .. } => {
                    ChargeError::ProviderRejected { message, cause }
                }
                other => ChargeError::ProviderRejected {
                    message: other.to_string(),
                    cause: None,
                },
            }
        })?;

        let mut charge = normalizer::normalize_charge(&raw)?;
        // Fallback to the requested amount when the provider omits it
        charge.amount = charge.amount.or(Some(amount));

        info!(
            "PIX charge created: id={:?} status={}",
            charge.id, charge.status
        );

        Ok(CreatedCharge {
            charge,
            platform_fee: request.platform_fee,
            instructor_amount: request.instructor_amount,
        })
    }
}
