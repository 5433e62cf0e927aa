//! Per-credential outbound client cache.
//!
//! One [`WhatsAppClient`] per (phone_number_id, access_token) pair. The
//! DashMap entry API deduplicates concurrent first-use construction; a
//! client that loses the race is discarded, which is harmless because
//! clients hold no per-message state.

use std::sync::Arc;

use dashmap::DashMap;

use warelay_core::outbound::{OutboundClients, OutboundSender};

use super::WhatsAppClient;

pub struct ClientCache {
    base_url: String,
    api_version: String,
    clients: DashMap<(String, String), Arc<WhatsAppClient>>,
}

impl ClientCache {
    pub fn new(base_url: &str, api_version: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_version: api_version.to_string(),
            clients: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn get_or_build(&self, phone_number_id: &str, access_token: &str) -> Arc<WhatsAppClient> {
        let key = (phone_number_id.to_string(), access_token.to_string());
        self.clients
            .entry(key)
            .or_insert_with(|| {
                Arc::new(WhatsAppClient::new(
                    &self.base_url,
                    &self.api_version,
                    phone_number_id,
                    access_token,
                ))
            })
            .clone()
    }
}

impl OutboundClients for ClientCache {
    fn client_for(&self, phone_number_id: &str, access_token: &str) -> Arc<dyn OutboundSender> {
        self.get_or_build(phone_number_id, access_token)
    }
}
