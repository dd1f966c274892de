use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Upstream rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },
}

impl FeedError {
    /// Classify a non-success HTTP status. 401 and 403 mean the credential itself
    /// was refused; everything else is an ordinary upstream failure.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        match status {
            401 | 403 => FeedError::Unauthorized { status },
            _ => FeedError::Status {
                status,
                body: String::from_utf8_lossy(body).chars().take(200).collect(),
            },
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, FeedError::Unauthorized { .. })
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_are_classified() {
        assert!(FeedError::from_status(401, b"").is_auth_failure());
        assert!(FeedError::from_status(403, b"forbidden").is_auth_failure());
        assert!(!FeedError::from_status(429, b"slow down").is_auth_failure());
        assert!(!FeedError::from_status(500, b"").is_auth_failure());
    }

    #[test]
    fn test_status_body_is_truncated() {
        let body = "x".repeat(1000);
        match FeedError::from_status(502, body.as_bytes()) {
            FeedError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), 200);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
