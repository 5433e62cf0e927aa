//! Process-wide settings.
//!
//! Populated from the environment by `warelay-infra`; every field has a
//! default so a bare process still starts (with no LLM credentials and no
//! dev seed).

use serde::{Deserialize, Serialize};

/// Top-level configuration for the relay process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// "production" disables dev seeding; anything else enables it.
    pub app_env: String,

    /// Path to a JSON array of tenant records for dev seeding.
    pub tenant_seed_file: Option<String>,

    /// Process-wide default OpenAI credential (per-tenant config wins).
    pub openai_api_key: Option<String>,
    /// Process-wide default OpenAI model.
    pub openai_model: Option<String>,

    /// Process-wide default Mistral credential (per-tenant config wins).
    pub mistral_api_key: Option<String>,
    /// Process-wide default Mistral model.
    pub mistral_model: Option<String>,

    /// Base URL for the WhatsApp Cloud (Graph) API.
    pub graph_base_url: String,
    /// Graph API version segment, e.g. "v20.0".
    pub graph_api_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_env: "development".to_string(),
            tenant_seed_file: None,
            openai_api_key: None,
            openai_model: None,
            mistral_api_key: None,
            mistral_model: None,
            graph_base_url: "https://graph.facebook.com".to_string(),
            graph_api_version: "v20.0".to_string(),
        }
    }
}

impl Settings {
    /// True unless explicitly running as "production".
    pub fn is_dev(&self) -> bool {
        self.app_env != "production"
    }
}
