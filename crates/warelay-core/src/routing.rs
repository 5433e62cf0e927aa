//! Routing-id extraction from nested webhook payloads.

use warelay_types::tenant::canonical_key;
use warelay_types::webhook::WebhookPayload;

/// Extract `(phone_number_id, waba_id)` from a delivery payload.
///
/// Scans every entry/changes pair; payloads may carry several. The
/// asymmetry is deliberate and load-bearing for compatibility:
/// the *last* non-empty phone_number_id wins, while the *first* non-empty
/// WABA id wins.
pub fn extract_routing_ids(payload: &WebhookPayload) -> (Option<String>, Option<String>) {
    let mut phone_number_id = None;
    let mut waba_id = None;

    for entry in &payload.entry {
        if waba_id.is_none() {
            waba_id = entry.id.as_ref().and_then(canonical_key);
        }
        for change in &entry.changes {
            if let Some(metadata) = &change.value.metadata {
                if let Some(id) = metadata.phone_number_id.as_ref().and_then(canonical_key) {
                    phone_number_id = Some(id);
                }
            }
        }
    }

    (phone_number_id, waba_id)
}
