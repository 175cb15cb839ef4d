use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum HttpError {
    #[snafu(display("Request failed: {message}"))]
    RequestError { message: String },

    #[snafu(display("Request failed with status {status}: {message}"))]
    StatusError { status: u16, message: String },
}

impl HttpError {
    /// Status code of a non-2xx response, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::StatusError { status, .. } => Some(*status),
            HttpError::RequestError { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_only_reported_for_status_errors() {
        let rejected = HttpError::StatusError {
            status: 400,
            message: "overspend".to_string(),
        };
        assert_eq!(rejected.status(), Some(400));
        assert_eq!(
            rejected.to_string(),
            "Request failed with status 400: overspend"
        );

        let transport = HttpError::RequestError {
            message: "connection refused".to_string(),
        };
        assert_eq!(transport.status(), None);
    }
}
