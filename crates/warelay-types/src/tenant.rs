//! Tenant configuration record and reply-engine descriptor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use crate::de::canonical_key;
use crate::de::{flex_string, opt_flex_string};

/// A single tenant's routing identity, credentials, and reply configuration.
///
/// Every lookup-key field (`tenant_id`, `phone_number_id`, `waba_id`,
/// `verify_token`) deserializes through a flexible string path so numeric
/// and string wire values canonicalize identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRecord {
    /// Opaque stable identifier, unique and immutable once assigned.
    #[serde(deserialize_with = "flex_string")]
    pub tenant_id: String,
    /// Human-facing name, used by the rules engine greeting.
    pub display_name: String,
    /// Business-account id grouping one or more phone numbers.
    #[serde(default, deserialize_with = "opt_flex_string")]
    pub waba_id: Option<String>,
    /// Platform-assigned phone number id, unique across tenants.
    #[serde(deserialize_with = "flex_string")]
    pub phone_number_id: String,
    /// Shared secret for the webhook subscription handshake.
    #[serde(deserialize_with = "flex_string")]
    pub verify_token: String,
    /// Enables X-Hub-Signature-256 verification when present.
    #[serde(default)]
    pub app_secret: Option<String>,
    /// Credential for outbound sends through the Cloud API.
    pub access_token: String,
    /// Which reply engine handles this tenant's messages.
    pub engine: EngineDescriptor,
    /// Lifecycle flag, defaults to "active".
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

/// Structured descriptor selecting and parameterizing a reply engine.
///
/// The `type` tag selects the engine variant; `config` carries engine-specific
/// settings (api_key, model, temperature, system_prompt, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl EngineDescriptor {
    /// Build a descriptor with an empty config (convenient for tests).
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            config: Map::new(),
        }
    }
}
