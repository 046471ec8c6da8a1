use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use thiserror::Error;

use crate::models::payment::{PixCharge, StatusSnapshot};

#[derive(Debug, Error)]
pub enum NormalizationError {
    /// The provider reported success but the payload carried no usable
    /// transaction data. The raw body is kept for diagnosis only.
    #[error("Campo transaction_data não encontrado na resposta do Mercado Pago")]
    MissingTransactionData { received: Value },
}

// The provider's SDK and raw REST responses disagree on where the payment
// lives: at the top level, under `response`, or under `body`. First match
// wins; a new envelope shape is one more entry here.
static ENVELOPES: [Option<&str>; 3] = [None, Some("response"), Some("body")];

fn envelopes(raw: &Value) -> impl Iterator<Item = &Value> {
    ENVELOPES.iter().filter_map(move |key| match key {
        None => Some(raw),
        Some(k) => raw.get(k),
    })
}

fn probe<'a>(raw: &'a Value, field: &str) -> Option<&'a Value> {
    envelopes(raw)
        .find_map(|env| env.get(field))
        .filter(|v| !v.is_null())
}

fn string_field(raw: &Value, field: &str) -> Option<String> {
    probe(raw, field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

// Payment ids arrive as numbers from the REST API and as strings from the
// SDK wrapper.
fn id_field(raw: &Value) -> Option<String> {
    match probe(raw, "id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn amount_field(raw: &Value, field: &str) -> Option<f64> {
    probe(raw, field).and_then(Value::as_f64)
}

fn date_field(raw: &Value, field: &str) -> Option<DateTime<FixedOffset>> {
    probe(raw, field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

fn status_field(raw: &Value) -> String {
    string_field(raw, "status").unwrap_or_else(|| "pending".to_string())
}

/// Extracts the canonical charge from a creation response. A missing
/// `transaction_data.qr_code` is a hard failure: without the QR there is
/// nothing the payer can act on, so this never degrades into a partial
/// success.
pub fn normalize_charge(raw: &Value) -> Result<PixCharge, NormalizationError> {
    let tx_data = match probe(raw, "point_of_interaction").and_then(|poi| poi.get("transaction_data"))
    {
        Some(tx) => tx,
        None => {
            return Err(NormalizationError::MissingTransactionData {
                received: raw.clone(),
            })
        }
    };

    let qr_code = match tx_data.get("qr_code").and_then(Value::as_str) {
        Some(qr) if !qr.is_empty() => qr.to_string(),
        _ => {
            return Err(NormalizationError::MissingTransactionData {
                received: raw.clone(),
            })
        }
    };

    Ok(PixCharge {
        id: id_field(raw),
        qr_code,
        qr_code_base64: tx_data
            .get("qr_code_base64")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        amount: amount_field(raw, "transaction_amount"),
        status: status_field(raw),
        status_detail: string_field(raw, "status_detail"),
        ticket_url: tx_data
            .get("ticket_url")
            .and_then(Value::as_str)
            .map(str::to_string),
        expiration_date: date_field(raw, "date_of_expiration"),
        approved_at: date_field(raw, "date_approved"),
    })
}

/// Extracts the read-path view of a payment. Total over any successful
/// provider read: absent fields fall back instead of failing.
pub fn normalize_status(raw: &Value) -> StatusSnapshot {
    StatusSnapshot {
        id: id_field(raw),
        status: status_field(raw),
        status_detail: string_field(raw, "status_detail"),
        transaction_amount: amount_field(raw, "transaction_amount"),
        date_approved: date_field(raw, "date_approved"),
    }
}
