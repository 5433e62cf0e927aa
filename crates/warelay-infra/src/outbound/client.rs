//! WhatsApp Cloud API client.
//!
//! One instance per (phone_number_id, access_token) pair. The generic
//! [`send`](WhatsAppClient::send) entrypoint validates and shapes the
//! type-dependent content into a Cloud API message payload, then POSTs it
//! to `{base}/{version}/{phone_number_id}/messages`. Content validation
//! failures surface before any HTTP call is attempted.

use std::time::Duration;

use futures_util::future::BoxFuture;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use warelay_core::outbound::OutboundSender;
use warelay_types::error::SendError;
use warelay_types::send::MessageType;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct WhatsAppClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    phone_number_id: String,
}

impl WhatsAppClient {
    pub fn new(
        base_url: &str,
        api_version: &str,
        phone_number_id: &str,
        access_token: &str,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create reqwest client");
        Self {
            client,
            endpoint: format!(
                "{}/{api_version}/{phone_number_id}/messages",
                base_url.trim_end_matches('/')
            ),
            access_token: SecretString::from(access_token.to_string()),
            phone_number_id: phone_number_id.to_string(),
        }
    }

    /// Send a message of any supported type and return the provider response.
    pub async fn send_message(
        &self,
        to: &str,
        kind: MessageType,
        content: &Value,
    ) -> Result<Value, SendError> {
        let payload = build_payload(to, kind, content)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.access_token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SendError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(SendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            phone_number_id = %self.phone_number_id,
            kind = %kind,
            "outbound message accepted"
        );
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }
}

impl OutboundSender for WhatsAppClient {
    fn send<'a>(
        &'a self,
        to: &'a str,
        kind: MessageType,
        content: &'a Value,
    ) -> BoxFuture<'a, Result<Value, SendError>> {
        Box::pin(self.send_message(to, kind, content))
    }
}

/// Shape `content` into a full Cloud API message payload for `kind`.
///
/// Pure and synchronous so malformed content is rejected before any
/// network call.
pub fn build_payload(to: &str, kind: MessageType, content: &Value) -> Result<Value, SendError> {
    let mut payload = json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": to,
        "type": kind.as_str(),
    });
    let body = build_typed_body(kind, content)?;
    payload
        .as_object_mut()
        .expect("payload is an object")
        .insert(kind.as_str().to_string(), body);
    Ok(payload)
}

fn build_typed_body(kind: MessageType, content: &Value) -> Result<Value, SendError> {
    match kind {
        MessageType::Text => {
            let body = content.get("body").and_then(Value::as_str).unwrap_or("");
            Ok(json!({"preview_url": false, "body": body}))
        }

        MessageType::Image | MessageType::Video => {
            let link = require_str(content, "link", kind)?;
            let mut media = json!({"link": link});
            copy_opt_str(content, &mut media, "caption");
            Ok(media)
        }

        MessageType::Audio | MessageType::Sticker => {
            let link = require_str(content, "link", kind)?;
            Ok(json!({"link": link}))
        }

        MessageType::Document => {
            let link = require_str(content, "link", kind)?;
            let mut media = json!({"link": link});
            copy_opt_str(content, &mut media, "caption");
            copy_opt_str(content, &mut media, "filename");
            Ok(media)
        }

        MessageType::Location => {
            // Accept latitude/longitude with lat/long aliases, as numbers
            // or numeric strings.
            let latitude = coordinate(content, "latitude", "lat")
                .ok_or_else(|| invalid(kind, "latitude/longitude are required"))?;
            let longitude = coordinate(content, "longitude", "long")
                .ok_or_else(|| invalid(kind, "latitude/longitude are required"))?;
            let mut location = json!({"latitude": latitude, "longitude": longitude});
            copy_opt_str(content, &mut location, "name");
            copy_opt_str(content, &mut location, "address");
            Ok(location)
        }

        MessageType::Contacts => content
            .get("contacts")
            .filter(|c| c.is_array())
            .cloned()
            .ok_or_else(|| invalid(kind, "a 'contacts' array is required")),

        MessageType::Interactive => build_interactive_body(content),

        MessageType::Template => {
            let name = require_str(content, "name", kind)?;
            // Language code fallback chain: "lang", then "language.code",
            // then en_US.
            let lang = content
                .get("lang")
                .and_then(Value::as_str)
                .or_else(|| {
                    content
                        .get("language")
                        .and_then(|l| l.get("code"))
                        .and_then(Value::as_str)
                })
                .unwrap_or("en_US");
            let components = content
                .get("components")
                .cloned()
                .unwrap_or_else(|| json!([]));
            Ok(json!({
                "name": name,
                "language": {"code": lang},
                "components": components,
            }))
        }
    }
}

/// Build the interactive object, inferring its interactive `type` when the
/// caller omitted it: reply buttons mean "button", sections mean "list".
fn build_interactive_body(content: &Value) -> Result<Value, SendError> {
    let interactive = content.get("button").unwrap_or(content);
    let object = interactive
        .as_object()
        .ok_or_else(|| invalid(MessageType::Interactive, "an interactive object is required"))?;

    if object.contains_key("type") {
        return Ok(interactive.clone());
    }

    let action = object.get("action");
    let first_button_is_reply = action
        .and_then(|a| a.get("buttons"))
        .and_then(Value::as_array)
        .and_then(|buttons| buttons.first())
        .and_then(|b| b.get("type"))
        .and_then(Value::as_str)
        == Some("reply");
    let has_sections = action.and_then(|a| a.get("sections")).is_some();

    let inferred = if first_button_is_reply {
        "button"
    } else if has_sections {
        "list"
    } else {
        return Err(invalid(
            MessageType::Interactive,
            "could not infer interactive type; provide 'type' explicitly",
        ));
    };

    let mut object = object.clone();
    object.insert("type".to_string(), json!(inferred));
    Ok(Value::Object(object))
}

fn require_str<'a>(
    content: &'a Value,
    field: &str,
    kind: MessageType,
) -> Result<&'a str, SendError> {
    content
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid(kind, &format!("'{field}' is required")))
}

fn copy_opt_str(content: &Value, target: &mut Value, field: &str) {
    if let Some(value) = content.get(field).and_then(Value::as_str) {
        target
            .as_object_mut()
            .expect("target is an object")
            .insert(field.to_string(), json!(value));
    }
}

fn coordinate(content: &Value, primary: &str, alias: &str) -> Option<f64> {
    let value = content.get(primary).or_else(|| content.get(alias))?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn invalid(kind: MessageType, reason: &str) -> SendError {
    SendError::InvalidContent(format!("{kind} content: {reason}"))
}
