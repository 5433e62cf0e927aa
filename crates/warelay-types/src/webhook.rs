//! Inbound webhook payload shapes.
//!
//! The Cloud API delivers a deeply nested envelope: one or more `entry`
//! blocks, each with a WABA id and one or more `changes`, each carrying a
//! `value` with metadata plus message and status lists. Payloads are
//! transient -- parsed once per delivery and never persisted -- so unknown
//! leaves stay as raw `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level webhook delivery envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

/// One entry block; `id` is the WABA id (string or number on the wire).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// One change inside an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: ChangeValue,
}

/// The value block carrying routing metadata, messages, and status updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
    #[serde(default)]
    pub statuses: Vec<Value>,
    #[serde(default)]
    pub contacts: Vec<Value>,
}

/// Routing metadata; `phone_number_id` may be a string or number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub phone_number_id: Option<Value>,
    #[serde(default)]
    pub display_phone_number: Option<Value>,
}

/// One inbound message.
///
/// The type-specific body (`text`, `image`, `location`, ...) lives in the
/// flattened `extra` map keyed by the message type, exactly as delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender wa_id, used as the reply recipient.
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InboundMessage {
    /// The text body, if this is a text message with a non-empty body.
    pub fn text_body(&self) -> Option<&str> {
        self.extra
            .get("text")
            .and_then(|t| t.get("body"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The type-specific body object for this message's declared type.
    pub fn typed_body(&self) -> Option<&Value> {
        self.extra.get(self.kind.as_deref()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_text_delivery() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "1020",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "metadata": {"phone_number_id": 555, "display_phone_number": "15550001111"},
                        "messages": [{
                            "from": "5218112345678",
                            "id": "wamid.X",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": {"body": "hola"}
                        }]
                    }
                }]
            }]
        }))
        .unwrap();

        let msg = &payload.entry[0].changes[0].value.messages[0];
        assert_eq!(msg.kind.as_deref(), Some("text"));
        assert_eq!(msg.text_body(), Some("hola"));
        assert_eq!(msg.from.as_deref(), Some("5218112345678"));
    }

    #[test]
    fn text_body_is_none_for_media() {
        let msg: InboundMessage = serde_json::from_value(json!({
            "from": "521",
            "type": "image",
            "image": {"id": "media-1", "mime_type": "image/jpeg"}
        }))
        .unwrap();
        assert!(msg.text_body().is_none());
        assert_eq!(msg.typed_body().unwrap()["id"], "media-1");
    }

    #[test]
    fn tolerates_status_only_payloads() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "entry": [{"id": 7, "changes": [{"value": {"statuses": [{"status": "read"}]}}]}]
        }))
        .unwrap();
        let value = &payload.entry[0].changes[0].value;
        assert!(value.messages.is_empty());
        assert_eq!(value.statuses.len(), 1);
    }
}
