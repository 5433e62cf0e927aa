//! Reply engines and their factory.
//!
//! Engines are a closed set of tagged variants behind one uniform call:
//! `reply(tenant, message) -> Option<text>`. Adding an engine means adding
//! a variant plus a factory arm, nothing else. Unknown type tags fail
//! construction immediately -- there is no silent default engine.
//!
//! An engine instance is built per event from the tenant's descriptor and
//! discarded afterwards; it holds no state across events.

mod chat;
mod rules;

pub use chat::ChatCompletionsEngine;
pub use rules::RulesEngine;

use warelay_types::config::Settings;
use warelay_types::error::EngineError;
use warelay_types::tenant::{EngineDescriptor, TenantRecord};
use warelay_types::webhook::InboundMessage;

use chat::ProviderProfile;

/// A tenant's reply strategy for one event.
pub enum ReplyEngine {
    Rules(RulesEngine),
    OpenAi(ChatCompletionsEngine),
    Mistral(ChatCompletionsEngine),
}

impl ReplyEngine {
    /// Produce a reply for one inbound message, or `None` to send nothing.
    ///
    /// Engines return `None` (never an empty string) for message types they
    /// do not handle.
    pub async fn reply(
        &self,
        tenant: &TenantRecord,
        message: &InboundMessage,
    ) -> Result<Option<String>, EngineError> {
        match self {
            ReplyEngine::Rules(engine) => Ok(engine.reply(tenant, message)),
            ReplyEngine::OpenAi(engine) | ReplyEngine::Mistral(engine) => {
                engine.reply(message).await
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReplyEngine::Rules(_) => "rules",
            ReplyEngine::OpenAi(_) => "openai",
            ReplyEngine::Mistral(_) => "mistral",
        }
    }
}

/// Build an engine from a tenant's descriptor.
///
/// Pure tag-to-constructor mapping. LLM-backed variants resolve their
/// credential and model with precedence: per-tenant config, then
/// process-wide default, then (for the model only) a hardcoded fallback.
/// A missing credential after that chain is a hard construction failure.
pub fn build_engine(
    descriptor: &EngineDescriptor,
    settings: &Settings,
) -> Result<ReplyEngine, EngineError> {
    match descriptor.kind.as_str() {
        "rules" => Ok(ReplyEngine::Rules(RulesEngine)),
        "openai" => Ok(ReplyEngine::OpenAi(ChatCompletionsEngine::new(
            openai_profile(settings),
            &descriptor.config,
        )?)),
        "mistral" => Ok(ReplyEngine::Mistral(ChatCompletionsEngine::new(
            mistral_profile(settings),
            &descriptor.config,
        )?)),
        other => Err(EngineError::UnsupportedKind(other.to_string())),
    }
}

fn openai_profile(settings: &Settings) -> ProviderProfile {
    ProviderProfile {
        name: "openai",
        base_url: "https://api.openai.com/v1",
        credential_name: "OPENAI_API_KEY",
        default_api_key: settings.openai_api_key.clone(),
        default_model: settings.openai_model.clone(),
        fallback_model: "gpt-4o-mini",
    }
}

fn mistral_profile(settings: &Settings) -> ProviderProfile {
    ProviderProfile {
        name: "mistral",
        base_url: "https://api.mistral.ai/v1",
        credential_name: "MISTRAL_API_KEY",
        default_api_key: settings.mistral_api_key.clone(),
        default_model: settings.mistral_model.clone(),
        fallback_model: "mistral-small-latest",
    }
}
