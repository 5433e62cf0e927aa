//! Environment-driven settings loading.
//!
//! Variable names match what existing deployments already export
//! (APP_ENV, OPENAI_API_KEY, ...). Every field has a default so a bare
//! process still starts.

use warelay_types::config::Settings;

/// Load [`Settings`] from the process environment.
pub fn load_settings() -> Settings {
    settings_from(|name| std::env::var(name).ok())
}

/// Build settings from an arbitrary variable source (testable seam).
pub fn settings_from(get: impl Fn(&str) -> Option<String>) -> Settings {
    let defaults = Settings::default();
    let non_empty = |name: &str| get(name).filter(|v| !v.trim().is_empty());

    Settings {
        app_env: non_empty("APP_ENV").unwrap_or(defaults.app_env),
        tenant_seed_file: non_empty("TENANT_DEV_SEED_FILE"),
        openai_api_key: non_empty("OPENAI_API_KEY"),
        openai_model: non_empty("OPENAI_MODEL"),
        mistral_api_key: non_empty("MISTRAL_API_KEY"),
        mistral_model: non_empty("MISTRAL_MODEL"),
        graph_base_url: non_empty("GRAPH_API_BASE_URL").unwrap_or(defaults.graph_base_url),
        graph_api_version: non_empty("GRAPH_API_VERSION").unwrap_or(defaults.graph_api_version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let settings = settings_from(|_| None);
        assert_eq!(settings.app_env, "development");
        assert_eq!(settings.graph_base_url, "https://graph.facebook.com");
        assert!(settings.openai_api_key.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let vars = env(&[
            ("APP_ENV", "production"),
            ("OPENAI_API_KEY", "sk-test"),
            ("MISTRAL_MODEL", "mistral-large-latest"),
            ("GRAPH_API_VERSION", "v21.0"),
        ]);
        let settings = settings_from(|name| vars.get(name).cloned());
        assert!(!settings.is_dev());
        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.mistral_model.as_deref(), Some("mistral-large-latest"));
        assert_eq!(settings.graph_api_version, "v21.0");
    }

    #[test]
    fn blank_variables_are_treated_as_unset() {
        let vars = env(&[("OPENAI_API_KEY", "  "), ("APP_ENV", "")]);
        let settings = settings_from(|name| vars.get(name).cloned());
        assert!(settings.openai_api_key.is_none());
        assert_eq!(settings.app_env, "development");
    }
}
