//! Outbound send endpoint and tenant debug listing.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use warelay_types::send::SendMessageRequest;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /whatsapp/send - send a message on behalf of a tenant.
///
/// Resolution is synchronous and local-only: the caller supplies an
/// explicit tenant hint, so a miss is a definitive 404.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    request
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let tenant = state
        .directory
        .resolve_for_send(request.tenant_id.as_deref(), request.phone_number_id.as_deref())
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))?;

    let client = state
        .outbound
        .client_for(&tenant.phone_number_id, &tenant.access_token);

    match client.send(&request.to, request.kind, &request.content).await {
        Ok(result) => Ok(Json(json!({
            "ok": true,
            "tenant": tenant.tenant_id,
            "result": result,
        }))),
        Err(err) => Err(AppError::SendFailed(err.to_string())),
    }
}

/// GET /whatsapp/_debug/tenants - indexed phone-number ids.
pub async fn debug_tenants(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"phone_ids": state.directory.phone_number_ids()}))
}
