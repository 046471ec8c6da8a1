// Utilitários para manipulação de valores monetários

use serde_json::Value;

/// Parses a charge amount from a loose JSON field. The upstream client
/// sends either a JSON number or a numeric string, so both are accepted;
/// anything non-positive or non-finite is rejected.
pub fn parse_amount(raw: Option<&Value>) -> Option<f64> {
    let amount = match raw? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if amount.is_finite() && amount > 0.0 {
        Some(amount)
    } else {
        None
    }
}
