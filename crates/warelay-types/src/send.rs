//! Outbound send request types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de::opt_flex_string;
use crate::error::SendError;

/// The closed set of outbound message types the Cloud API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    Audio,
    Video,
    Document,
    Sticker,
    Location,
    Contacts,
    Interactive,
    Template,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Audio => "audio",
            MessageType::Video => "video",
            MessageType::Document => "document",
            MessageType::Sticker => "sticker",
            MessageType::Location => "location",
            MessageType::Contacts => "contacts",
            MessageType::Interactive => "interactive",
            MessageType::Template => "template",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /whatsapp/send`.
///
/// The caller selects the tenant with `tenant_id` (preferred) or
/// `phone_number_id`; at least one must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default, deserialize_with = "opt_flex_string")]
    pub tenant_id: Option<String>,
    #[serde(default, deserialize_with = "opt_flex_string")]
    pub phone_number_id: Option<String>,
    /// Recipient in E.164 without the leading plus, e.g. 5218112345678.
    pub to: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    /// Type-dependent content shape, validated by the outbound client.
    pub content: Value,
}

impl SendMessageRequest {
    /// Reject requests that carry no tenant hint at all.
    pub fn validate(&self) -> Result<(), SendError> {
        if self.tenant_id.is_none() && self.phone_number_id.is_none() {
            return Err(SendError::InvalidContent(
                "provide either tenant_id or phone_number_id".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_type_round_trips_snake_case() {
        let kind: MessageType = serde_json::from_value(json!("interactive")).unwrap();
        assert_eq!(kind, MessageType::Interactive);
        assert_eq!(serde_json::to_value(kind).unwrap(), json!("interactive"));
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        assert!(serde_json::from_value::<MessageType>(json!("carrier_pigeon")).is_err());
    }

    #[test]
    fn validate_requires_a_tenant_hint() {
        let req: SendMessageRequest = serde_json::from_value(json!({
            "to": "521811",
            "type": "text",
            "content": {"body": "hi"}
        }))
        .unwrap();
        assert!(req.validate().is_err());

        let req: SendMessageRequest = serde_json::from_value(json!({
            "phone_number_id": 555,
            "to": "521811",
            "type": "text",
            "content": {"body": "hi"}
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.phone_number_id.as_deref(), Some("555"));
    }
}
