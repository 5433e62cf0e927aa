use thiserror::Error;

/// Errors related to tenant directory operations.
///
/// "Tenant not found" is deliberately not an error: resolvers signal a miss
/// with `None` and callers decide how to surface it.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("tenant record missing required field '{0}'")]
    MissingField(&'static str),

    #[error("tenant loader error: {0}")]
    Loader(String),
}

/// Errors from reply-engine construction and invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported engine type: '{0}'")]
    UnsupportedKind(String),

    #[error("missing credential: {0} is required")]
    MissingCredential(&'static str),

    #[error("provider request failed: {0}")]
    Provider(String),

    #[error("provider returned malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from the outbound messaging client.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid content: {0}")]
    InvalidContent(String),

    #[error("request failed: {0}")]
    Http(String),

    #[error("Cloud API returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_display() {
        let err = EngineError::UnsupportedKind("magic8ball".to_string());
        assert_eq!(err.to_string(), "unsupported engine type: 'magic8ball'");
    }

    #[test]
    fn directory_error_display() {
        let err = DirectoryError::MissingField("phone_number_id");
        assert!(err.to_string().contains("phone_number_id"));
    }

    #[test]
    fn send_error_display() {
        let err = SendError::Api {
            status: 401,
            body: "bad token".to_string(),
        };
        assert!(err.to_string().contains("401"));
    }
}
