//! Outbound messaging traits.
//!
//! The background pipeline and the send endpoint talk to these traits, not
//! to the concrete Cloud API client, so tests can substitute a recording
//! fake. Both are object-safe via boxed futures.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use warelay_types::error::SendError;
use warelay_types::send::MessageType;

/// One tenant's outbound channel: a polymorphic `send` dispatching
/// internally to type-specific provider calls.
pub trait OutboundSender: Send + Sync {
    fn send<'a>(
        &'a self,
        to: &'a str,
        kind: MessageType,
        content: &'a Value,
    ) -> BoxFuture<'a, Result<Value, SendError>>;
}

/// Hands out senders keyed by (phone_number_id, access_token).
///
/// Implementations cache instances per key; senders must be stateless
/// enough that a racing duplicate construction is harmless.
pub trait OutboundClients: Send + Sync {
    fn client_for(&self, phone_number_id: &str, access_token: &str) -> Arc<dyn OutboundSender>;
}
