// ── Core error types ──
//
// User-facing errors from parkdesk-core. Consumers never see raw HTTP
// statuses or JSON failures; `From<parkdesk_api::Error>` sorts transport
// errors into the four failure classes front-ends care about: no
// connection, session gone, backend said no, input rejected locally.

use thiserror::Error;

use crate::messages;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// Business rule rejection from the backend, already translated.
    #[error("Rejected by backend: {message}")]
    Rejected { message: String },

    /// Client-side check failed; nothing was sent.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Short Vietnamese text suitable for a toast or an inline error.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConnectionFailed { .. } => messages::CONNECTION_FAILED.to_owned(),
            Self::Timeout => messages::TIMEOUT.to_owned(),
            Self::AuthenticationFailed { .. } => messages::SESSION_EXPIRED.to_owned(),
            Self::NotFound {
                entity_type,
                identifier,
            } => format!("Không tìm thấy {entity_type} {identifier}"),
            Self::Rejected { message } | Self::ValidationFailed { message } => message.clone(),
            Self::Api { message, .. } if !message.is_empty() => {
                messages::friendly_message(message).into_owned()
            }
            Self::Api { .. } | Self::Config { .. } | Self::Internal(_) => {
                messages::GENERIC_FAILURE.to_owned()
            }
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<parkdesk_api::Error> for CoreError {
    fn from(err: parkdesk_api::Error) -> Self {
        use parkdesk_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::MissingToken => CoreError::AuthenticationFailed {
                message: "not logged in".into(),
            },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() || e.status().is_none() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Api { status: 404, message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            ApiError::Api { status, message } if (400..500).contains(&status) => {
                CoreError::Rejected {
                    message: messages::friendly_message(&message).into_owned(),
                }
            }
            ApiError::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            ApiError::Io(e) => CoreError::ValidationFailed {
                message: format!("Cannot read file: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkdesk_api::Error as ApiError;

    #[test]
    fn client_errors_become_friendly_rejections() {
        let err = CoreError::from(ApiError::Api {
            status: 409,
            message: "Vehicle already has an active registration".into(),
        });
        assert!(matches!(
            err,
            CoreError::Rejected { ref message } if message == "Xe này đã có đăng ký tháng đang hoạt động"
        ));
    }

    #[test]
    fn not_found_keeps_backend_text() {
        let err = CoreError::from(ApiError::Api {
            status: 404,
            message: "Không tìm thấy đăng ký".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn server_errors_stay_api_errors() {
        let err = CoreError::from(ApiError::Api {
            status: 500,
            message: "Internal server error".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    }

    #[test]
    fn auth_errors_map_to_session_message() {
        let err = CoreError::from(ApiError::Authentication {
            message: "jwt expired".into(),
        });
        assert!(err.is_auth());
        assert_eq!(err.user_message(), messages::SESSION_EXPIRED);
    }
}
