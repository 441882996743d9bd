//! # Google OAuth 2.0 popup flow
//!
//! Browser apps cannot keep a client secret, so Google is driven with the implicit
//! grant: the popup is sent to Google's consent page with `response_type=token`, and
//! Google redirects back to [`OAuthConfig::redirect_url`] with the access token in the
//! URL fragment.
//!
//! 1. **[`generate_auth_url`](GoogleOAuth::generate_auth_url)** builds the consent URL
//!    for the `openid`, `email` and `profile` scopes and returns it with a random CSRF
//!    state.
//! 2. **[`parse_callback`](GoogleOAuth::parse_callback)** reads the fragment of the URL
//!    the popup landed on, checks the state against the one issued in step 1 and
//!    returns the access token. The token is then exchanged for a Firebase session by
//!    [`FirebaseAuth`](super::FirebaseAuth).

use oauth2::basic::BasicClient;
use oauth2::url::{form_urlencoded, Url};
use oauth2::{CsrfToken, Scope};

use super::config::OAuthConfig;
use crate::config::FirebaseConfig;
use crate::error::AuthError;

/// Google OAuth handler.
#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    config: OAuthConfig,
}

impl GoogleOAuth {
    pub fn new(config: &FirebaseConfig) -> Result<Self, AuthError> {
        Ok(Self {
            config: OAuthConfig::google(config)?,
        })
    }

    pub fn redirect_uri(&self) -> &str {
        self.config.redirect_url.as_str()
    }

    /// Consent URL and the CSRF state it carries.
    pub fn generate_auth_url(&self) -> (String, CsrfToken) {
        let client = BasicClient::new(self.config.client_id.clone())
            .set_auth_uri(self.config.auth_url.clone())
            .set_redirect_uri(self.config.redirect_url.clone());

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .add_extra_param("prompt", "select_account")
            .use_implicit_flow()
            .url();

        (auth_url.to_string(), csrf_state)
    }

    /// Extract the access token from the redirect URL.
    pub fn parse_callback(callback_url: &str, expected_state: &CsrfToken) -> Result<String, AuthError> {
        let url = Url::parse(callback_url)
            .map_err(|e| AuthError::Federated(format!("bad callback URL: {e}")))?;

        // Implicit grant answers in the fragment; errors may arrive in the query.
        let fragment = url.fragment().unwrap_or_default();
        let params: Vec<(String, String)> = form_urlencoded::parse(fragment.as_bytes())
            .chain(url.query_pairs())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let param = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        if let Some(error) = param("error") {
            return Err(match error {
                "access_denied" => AuthError::PopupClosed,
                other => AuthError::Federated(other.to_string()),
            });
        }

        if param("state") != Some(expected_state.secret().as_str()) {
            return Err(AuthError::StateMismatch);
        }

        param("access_token")
            .map(str::to_string)
            .ok_or_else(|| AuthError::Federated("no access token in response".to_string()))
    }
}
