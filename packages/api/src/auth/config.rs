//! OAuth configuration for the federated popup flow.

use oauth2::{AuthUrl, ClientId, RedirectUrl};

use crate::config::{ConfigError, FirebaseConfig};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: ClientId,
    pub auth_url: AuthUrl,
    pub redirect_url: RedirectUrl,
}

impl OAuthConfig {
    /// Google OAuth config from the Firebase project config.
    pub fn google(config: &FirebaseConfig) -> Result<Self, ConfigError> {
        let client_id = config
            .google_client_id
            .clone()
            .ok_or(ConfigError::Missing("GOOGLE_CLIENT_ID"))?;

        Ok(Self {
            client_id: ClientId::new(client_id),
            auth_url: AuthUrl::new(GOOGLE_AUTH_URL.to_string()).map_err(|e| {
                ConfigError::Invalid {
                    name: "GOOGLE_AUTH_URL",
                    reason: e.to_string(),
                }
            })?,
            redirect_url: RedirectUrl::new(config.auth_redirect_uri.clone()).map_err(|e| {
                ConfigError::Invalid {
                    name: "AUTH_REDIRECT_URI",
                    reason: e.to_string(),
                }
            })?,
        })
    }
}
