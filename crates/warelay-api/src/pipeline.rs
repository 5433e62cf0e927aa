//! Background event processing.
//!
//! Runs on the worker pool after the delivery endpoint has already
//! acknowledged. Takes the first change's value block, builds the tenant's
//! reply engine, and walks the messages in payload order -- sequentially,
//! because engine calls may be rate-limited or stateful per conversation.
//! Failures here are logged and dropped; there is no caller left to
//! respond to.

use std::sync::Arc;

use serde_json::{Value, json};

use warelay_core::outbound::OutboundClients;
use warelay_infra::engine::build_engine;
use warelay_types::config::Settings;
use warelay_types::send::MessageType;
use warelay_types::tenant::TenantRecord;
use warelay_types::webhook::{InboundMessage, WebhookPayload};

pub async fn process_event(
    tenant: Arc<TenantRecord>,
    payload: WebhookPayload,
    outbound: Arc<dyn OutboundClients>,
    settings: Arc<Settings>,
) {
    let Some(value) = payload
        .entry
        .first()
        .and_then(|entry| entry.changes.first())
        .map(|change| &change.value)
    else {
        tracing::warn!(tenant_id = %tenant.tenant_id, "delivery without entry/changes, skipping");
        return;
    };

    let engine = match build_engine(&tenant.engine, &settings) {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!(tenant_id = %tenant.tenant_id, error = %err, "engine construction failed");
            return;
        }
    };
    let client = outbound.client_for(&tenant.phone_number_id, &tenant.access_token);

    for message in &value.messages {
        log_message(&tenant.tenant_id, message);

        match engine.reply(&tenant, message).await {
            Ok(Some(reply)) => {
                let Some(to) = message.from.as_deref() else {
                    tracing::warn!(tenant_id = %tenant.tenant_id, "message without sender, no reply sent");
                    continue;
                };
                if let Err(err) = client
                    .send(to, MessageType::Text, &json!({"body": reply}))
                    .await
                {
                    tracing::error!(tenant_id = %tenant.tenant_id, to, error = %err, "reply send failed");
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(tenant_id = %tenant.tenant_id, error = %err, "engine reply failed");
            }
        }
    }

    // Delivery/read receipts are logged only, never replied to.
    for status in &value.statuses {
        tracing::info!(tenant_id = %tenant.tenant_id, status = %status, "status update");
    }
}

/// Log a normalized, type-specific summary of one inbound message.
///
/// Unrecognized types are still logged, never dropped silently.
fn log_message(tenant_id: &str, message: &InboundMessage) {
    let from = message.from.as_deref().unwrap_or("<unknown>");
    match message.kind.as_deref() {
        Some("text") => {
            let body = message.text_body().unwrap_or("");
            tracing::info!(tenant_id, from, body, "inbound text");
        }
        Some(kind @ ("image" | "audio" | "video" | "document" | "sticker")) => {
            let media = message.typed_body().cloned().unwrap_or(Value::Null);
            tracing::info!(tenant_id, from, kind, %media, "inbound media");
        }
        Some("location") => {
            let location = message.typed_body().cloned().unwrap_or(Value::Null);
            let latitude = location.get("latitude").cloned().unwrap_or(Value::Null);
            let longitude = location.get("longitude").cloned().unwrap_or(Value::Null);
            tracing::info!(tenant_id, from, %latitude, %longitude, "inbound location");
        }
        Some("contacts") => {
            let contacts = message.typed_body().cloned().unwrap_or(Value::Null);
            tracing::info!(tenant_id, from, %contacts, "inbound contacts");
        }
        Some("interactive") => log_interactive(tenant_id, from, message),
        other => {
            let kind = other.unwrap_or("<missing>");
            let raw = serde_json::to_value(message).unwrap_or(Value::Null);
            tracing::info!(tenant_id, from, kind, %raw, "inbound message of unrecognized type");
        }
    }
}

fn log_interactive(tenant_id: &str, from: &str, message: &InboundMessage) {
    let interactive = message.typed_body().cloned().unwrap_or(Value::Null);
    if let Some(button) = interactive.get("button_reply") {
        let id = button.get("id").cloned().unwrap_or(Value::Null);
        let title = button.get("title").cloned().unwrap_or(Value::Null);
        tracing::info!(tenant_id, from, %id, %title, "inbound interactive button reply");
    } else if let Some(list) = interactive.get("list_reply") {
        let id = list.get("id").cloned().unwrap_or(Value::Null);
        let title = list.get("title").cloned().unwrap_or(Value::Null);
        tracing::info!(tenant_id, from, %id, %title, "inbound interactive list reply");
    } else {
        tracing::info!(tenant_id, from, %interactive, "inbound interactive");
    }
}
