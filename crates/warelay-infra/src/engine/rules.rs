//! Deterministic rules engine. No external calls, no credentials.

use warelay_types::tenant::TenantRecord;
use warelay_types::webhook::InboundMessage;

/// Pattern-matches greetings, otherwise acknowledges.
pub struct RulesEngine;

impl RulesEngine {
    pub fn reply(&self, tenant: &TenantRecord, message: &InboundMessage) -> Option<String> {
        let Some(text) = message.text_body() else {
            // Non-text (or empty-text) messages still get a receipt line.
            return Some("Gracias, recibí tu mensaje.".to_string());
        };
        if matches!(text.to_lowercase().as_str(), "hola" | "hello" | "hi") {
            return Some(format!(
                "¡Hola de {}! ¿En qué puedo ayudarte?",
                tenant.display_name
            ));
        }
        Some("Entendido. Estoy procesando tu solicitud.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tenant() -> TenantRecord {
        serde_json::from_value(json!({
            "tenant_id": "t1",
            "display_name": "Acme Stores",
            "phone_number_id": "555",
            "verify_token": "tok",
            "access_token": "at",
            "engine": {"type": "rules"}
        }))
        .unwrap()
    }

    fn text_message(body: &str) -> InboundMessage {
        serde_json::from_value(json!({
            "from": "521811",
            "type": "text",
            "text": {"body": body}
        }))
        .unwrap()
    }

    #[test]
    fn greeting_is_personalized_with_display_name() {
        let engine = RulesEngine;
        for greeting in ["hola", "Hello", "HI"] {
            let reply = engine.reply(&tenant(), &text_message(greeting)).unwrap();
            assert_eq!(reply, "¡Hola de Acme Stores! ¿En qué puedo ayudarte?");
        }
    }

    #[test]
    fn other_text_gets_processing_acknowledgement() {
        let reply = RulesEngine
            .reply(&tenant(), &text_message("necesito ayuda"))
            .unwrap();
        assert_eq!(reply, "Entendido. Estoy procesando tu solicitud.");
    }

    #[test]
    fn missing_or_empty_text_gets_receipt_line() {
        let empty = text_message("");
        let media: InboundMessage = serde_json::from_value(json!({
            "from": "521811",
            "type": "image",
            "image": {"id": "m1"}
        }))
        .unwrap();

        assert_eq!(
            RulesEngine.reply(&tenant(), &empty).unwrap(),
            "Gracias, recibí tu mensaje."
        );
        assert_eq!(
            RulesEngine.reply(&tenant(), &media).unwrap(),
            "Gracias, recibí tu mensaje."
        );
    }
}
