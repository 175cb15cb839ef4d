use groupfund_http_client::HttpError;
use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum AlgodError {
    #[snafu(display("Algod transport error: {source}"))]
    Transport { source: HttpError },

    #[snafu(display("Algod returned status {status}: {message}"))]
    Api { status: u16, message: String },

    #[snafu(display("Failed to decode algod response: {message}"))]
    Decode { message: String },
}

impl AlgodError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AlgodError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// A 4xx answer means the node looked at the request and refused it.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }
}

impl From<HttpError> for AlgodError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::StatusError { status, message } => AlgodError::Api {
                status,
                message: extract_message(&message),
            },
            source => AlgodError::Transport { source },
        }
    }
}

/// algod wraps error text as `{"message": "..."}`; fall back to the raw body otherwise.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_is_unwrapped() {
        let err: AlgodError = HttpError::StatusError {
            status: 400,
            message: r#"{"message":"TransactionPool.Remember: transaction already in ledger"}"#
                .to_string(),
        }
        .into();

        match &err {
            AlgodError::Api { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(
                    message,
                    "TransactionPool.Remember: transaction already in ledger"
                );
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(err.is_client_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_plain_text_body_is_kept() {
        let err: AlgodError = HttpError::StatusError {
            status: 404,
            message: " not found\n".to_string(),
        }
        .into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Algod returned status 404: not found");
    }

    #[test]
    fn test_request_error_is_transport() {
        let err: AlgodError = HttpError::RequestError {
            message: "dns failure".to_string(),
        }
        .into();
        assert!(matches!(err, AlgodError::Transport { .. }));
        assert_eq!(err.status(), None);
    }
}
