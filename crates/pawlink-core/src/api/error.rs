use thiserror::Error;

use super::transport::TransportError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request URL")]
    InvalidUrl,

    #[error("Failed to encode request body: {0}")]
    Encoding(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("No response received from server")]
    NoResponse,

    #[error("Unauthorized - please log in again")]
    Unauthorized,

    #[error("Server error (status {0})")]
    Server(u16),

    #[error("Invalid response: {0}")]
    Decoding(String),
}

impl ApiError {
    /// Map a non-2xx status code to the matching error variant.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            _ => ApiError::Server(status),
        }
    }

    /// True when the only sensible recovery is sending the user back to
    /// the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::NoResponse => ApiError::NoResponse,
            TransportError::Timeout | TransportError::Connect(_) | TransportError::Request(_) => {
                ApiError::Network(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_401_to_unauthorized() {
        assert!(matches!(ApiError::from_status(401), ApiError::Unauthorized));
        assert!(matches!(ApiError::from_status(500), ApiError::Server(500)));
    }

    #[test]
    fn test_only_unauthorized_requires_login() {
        assert!(ApiError::Unauthorized.requires_login());
        assert!(!ApiError::Server(500).requires_login());
        assert!(!ApiError::NoResponse.requires_login());
        assert!(!ApiError::Network("offline".to_string()).requires_login());
    }
}
