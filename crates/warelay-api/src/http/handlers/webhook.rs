//! Webhook verification and delivery endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use warelay_core::routing::extract_routing_ids;
use warelay_core::signature::verify_signature;
use warelay_types::webhook::WebhookPayload;

use crate::http::error::AppError;
use crate::pipeline;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
}

/// GET /whatsapp/webhook - subscription verification handshake.
///
/// Echoes the challenge as plain text when the verify token resolves to a
/// known tenant; any failure is an explicit rejection, never a silent
/// empty success.
pub async fn verify_subscription(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Response, AppError> {
    let token = params.verify_token.as_deref().unwrap_or("");
    if params.mode.as_deref() != Some("subscribe") || token.is_empty() {
        return Err(AppError::BadRequest(
            "missing or invalid query params".to_string(),
        ));
    }

    match state.directory.resolve_by_verify_token(token).await {
        Some(tenant) => {
            tracing::info!(tenant_id = %tenant.tenant_id, "webhook subscription verified");
            Ok((
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                params.challenge.unwrap_or_default(),
            )
                .into_response())
        }
        None => Err(AppError::Forbidden("verification failed".to_string())),
    }
}

/// POST /whatsapp/webhook - event delivery.
///
/// Acknowledge fast, process later: the handler resolves and authenticates
/// the tenant, enqueues background processing, and returns immediately.
/// Unknown routing gets a soft IGNORED with a 2xx -- returning an error
/// here would eventually get the subscription disabled upstream.
pub async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // The raw bytes are kept for signature verification; the payload is
    // parsed from the same bytes, never re-serialized.
    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|err| AppError::BadRequest(format!("invalid JSON body: {err}")))?;

    let (phone_number_id, waba_id) = extract_routing_ids(&payload);
    tracing::info!(?phone_number_id, ?waba_id, "resolved routing ids");

    let mut tenant = None;
    if let Some(id) = &phone_number_id {
        tenant = state.directory.resolve_by_phone_number_id(id).await;
    }
    if tenant.is_none() {
        if let Some(id) = &waba_id {
            tenant = state.directory.resolve_by_waba_id(id).await;
        }
    }

    let Some(tenant) = tenant else {
        tracing::error!(?phone_number_id, ?waba_id, "no tenant for delivery, ignoring");
        return Ok(Json(json!({"status": "IGNORED"})).into_response());
    };

    if let Some(secret) = &tenant.app_secret {
        let header = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok());
        if !verify_signature(&body, header, secret) {
            tracing::warn!(tenant_id = %tenant.tenant_id, "delivery signature rejected");
            return Err(AppError::Forbidden("invalid signature".to_string()));
        }
    }

    let queued = state.pool.enqueue(pipeline::process_event(
        tenant.clone(),
        payload,
        state.outbound.clone(),
        state.settings.clone(),
    ));
    if !queued {
        // Saturation policy: drop and still acknowledge. The platform will
        // redeliver on its own schedule.
        tracing::warn!(tenant_id = %tenant.tenant_id, "background queue full, event dropped");
    }

    Ok(Json(json!({"status": "EVENT_RECEIVED"})).into_response())
}
