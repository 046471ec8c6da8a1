use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct ChargeRequest {
    pub amount: Option<Value>,
    pub description: Option<String>,
    pub payer: Option<Payer>,
    #[serde(rename = "lessonId")]
    pub lesson_id: Option<String>,
    #[serde(rename = "instructorId")]
    pub instructor_id: Option<String>,
    #[serde(rename = "platformFee")]
    pub platform_fee: Option<Value>,
    #[serde(rename = "instructorAmount")]
    pub instructor_amount: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Payer {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Canonical charge record extracted from a provider response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixCharge {
    pub id: Option<String>,
    pub qr_code: String,
    pub qr_code_base64: String,
    pub amount: Option<f64>,
    pub status: String,
    pub status_detail: Option<String>,
    pub ticket_url: Option<String>,
    pub expiration_date: Option<DateTime<FixedOffset>>,
    pub approved_at: Option<DateTime<FixedOffset>>,
}

/// Charge creation result: the canonical charge plus the split values the
/// caller sent for its own bookkeeping, echoed back untouched.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedCharge {
    #[serde(flatten)]
    pub charge: PixCharge,
    pub platform_fee: Option<Value>,
    pub instructor_amount: Option<Value>,
}

/// Read-path view of a payment. Unlike [`PixCharge`] it carries no QR data,
/// so it is total over any successful provider read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub id: Option<String>,
    pub status: String,
    pub status_detail: Option<String>,
    pub transaction_amount: Option<f64>,
    pub date_approved: Option<DateTime<FixedOffset>>,
}

// Payload enviado ao Mercado Pago na criação da cobrança
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentParams {
    pub transaction_amount: f64,
    pub description: String,
    pub payment_method_id: String,
    pub payer: PaymentPayer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentPayer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
