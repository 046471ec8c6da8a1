use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider notification. Only `payment.created` / `payment.updated` are
/// acted upon; every other action is acknowledged and dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub action: Option<WebhookAction>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum WebhookAction {
    #[serde(rename = "payment.created")]
    PaymentCreated,
    #[serde(rename = "payment.updated")]
    PaymentUpdated,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub id: Option<Value>,
}

impl WebhookEvent {
    pub fn is_payment_event(&self) -> bool {
        matches!(
            self.action,
            Some(WebhookAction::PaymentCreated) | Some(WebhookAction::PaymentUpdated)
        )
    }

    /// Live notifications carry the id as a JSON number, test consoles send
    /// it as a string. Both become the provider's canonical string id.
    pub fn payment_id(&self) -> Option<String> {
        match self.data.as_ref()?.id.as_ref()? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Update pushed to the entity store after reconciling one event.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationUpdate {
    pub filter: EntityFilter,
    pub patch: EntityPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFilter {
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityPatch {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_id_from_string_and_number() {
        let event: WebhookEvent =
            serde_json::from_value(json!({"action": "payment.updated", "data": {"id": "123"}}))
                .unwrap();
        assert_eq!(event.payment_id(), Some("123".to_string()));

        let event: WebhookEvent =
            serde_json::from_value(json!({"action": "payment.updated", "data": {"id": 123}}))
                .unwrap();
        assert_eq!(event.payment_id(), Some("123".to_string()));
    }

    #[test]
    fn test_unknown_action_is_not_a_payment_event() {
        let event: WebhookEvent =
            serde_json::from_value(json!({"action": "plan.updated", "data": {"id": "1"}})).unwrap();
        assert!(!event.is_payment_event());

        let event: WebhookEvent = serde_json::from_value(json!({"data": {"id": "1"}})).unwrap();
        assert!(!event.is_payment_event());
    }
}
