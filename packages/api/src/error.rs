//! Error type shared by every sign-in path.
//!
//! Identity Toolkit reports failures as bare codes (`EMAIL_NOT_FOUND`,
//! `WEAK_PASSWORD : Password should be at least 6 characters`). [`AuthError::from_firebase`]
//! maps them onto the `auth/<code>` names the Firebase web SDK shows users, so an alert
//! reads `Firebase: Error (auth/user-not-found).`

use records::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Firebase: Error ({code}).")]
    Provider { code: String },
    #[error("Firebase: Error (auth/popup-closed-by-user).")]
    PopupClosed,
    #[error("Firebase: Error (auth/popup-blocked).")]
    PopupBlocked,
    #[error("Firebase: Error (auth/operation-not-supported-in-this-environment).")]
    Unsupported,
    #[error("Sign-in was rejected: the response did not match the request.")]
    StateMismatch,
    #[error("Sign-in with Google failed: {0}")]
    Federated(String),
    #[error("Firebase: Error (auth/network-request-failed).")]
    Http(#[from] reqwest::Error),
    #[error("Could not save your profile: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Build a provider error from an Identity Toolkit error message.
    pub fn from_firebase(message: &str) -> Self {
        let code = message.split(" : ").next().unwrap_or(message).trim();
        let mapped = match code {
            "EMAIL_NOT_FOUND" => "user-not-found".to_string(),
            "INVALID_PASSWORD" => "wrong-password".to_string(),
            "INVALID_LOGIN_CREDENTIALS" => "invalid-credential".to_string(),
            "USER_DISABLED" => "user-disabled".to_string(),
            "EMAIL_EXISTS" => "email-already-in-use".to_string(),
            "TOO_MANY_ATTEMPTS_TRY_LATER" => "too-many-requests".to_string(),
            "INVALID_ID_TOKEN" => "invalid-user-token".to_string(),
            "TOKEN_EXPIRED" | "USER_NOT_FOUND" => "user-token-expired".to_string(),
            "INVALID_REFRESH_TOKEN" => "invalid-refresh-token".to_string(),
            "" => "internal-error".to_string(),
            other => other.to_lowercase().replace('_', "-"),
        };
        AuthError::Provider {
            code: format!("auth/{mapped}"),
        }
    }

    /// The `auth/<code>` name for provider errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            AuthError::Provider { code } => Some(code),
            _ => None,
        }
    }
}
