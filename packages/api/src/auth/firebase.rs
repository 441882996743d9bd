//! # Firebase Authentication over REST
//!
//! [`FirebaseAuth`] implements [`IdentityProvider`] against the Identity Toolkit and
//! Secure Token REST APIs, the same endpoints the Firebase web SDK uses.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | password sign-in | `accounts:signInWithPassword` |
//! | account creation | `accounts:signUp` |
//! | display name | `accounts:update` |
//! | password reset mail | `accounts:sendOobCode` (`PASSWORD_RESET`) |
//! | Google popup | consent popup, then `accounts:signInWithIdp` |
//! | session restore | Secure Token `token` (refresh grant) |
//!
//! Every call that yields a session persists it through the [`SessionStorage`] and
//! publishes it on the [`SessionHub`]. Sign-out is local: the stored session is
//! dropped and `None` is published.

use oauth2::url::form_urlencoded;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::google::GoogleOAuth;
use super::{FederatedProvider, IdentityProvider};
use crate::config::{Endpoints, FirebaseConfig};
use crate::error::AuthError;
use crate::platform::{PopupOpener, SessionStorage};
use crate::session::{Credential, Session, SessionHub};

/// Account payload shared by the sign-in and sign-up responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
}

impl From<AccountResponse> for Session {
    fn from(r: AccountResponse) -> Self {
        Session::new(
            r.local_id,
            r.display_name,
            r.email,
            Credential {
                id_token: r.id_token,
                refresh_token: r.refresh_token,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Firebase identity provider.
pub struct FirebaseAuth<P> {
    http: reqwest::Client,
    config: FirebaseConfig,
    popup: P,
    storage: Box<dyn SessionStorage>,
    sessions: SessionHub,
}

impl<P: PopupOpener> FirebaseAuth<P> {
    pub fn new(config: FirebaseConfig, popup: P, storage: Box<dyn SessionStorage>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            popup,
            storage,
            sessions: SessionHub::new(),
        }
    }

    fn endpoints(&self) -> &Endpoints {
        &self.config.endpoints
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/accounts:{}", self.endpoints().identity_toolkit, method);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        read_response(response).await
    }

    /// Persist and publish a freshly issued session.
    fn establish(&self, session: Session) -> Session {
        self.storage.save(&session);
        self.sessions.publish(Some(session.clone()));
        session
    }

    async fn refresh(&self, stored: &Session) -> Result<Session, AuthError> {
        let url = format!("{}/token", self.endpoints().secure_token);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", stored.credential.refresh_token.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = read_response(response).await?;

        Ok(Session::new(
            token.user_id,
            stored.display_name.clone(),
            stored.email.clone(),
            Credential {
                id_token: token.id_token,
                refresh_token: token.refresh_token,
            },
        ))
    }

    async fn sign_in_with_google(&self) -> Result<Session, AuthError> {
        let oauth = GoogleOAuth::new(&self.config)?;
        let (auth_url, state) = oauth.generate_auth_url();
        let callback = self.popup.open(&auth_url, oauth.redirect_uri()).await?;
        let access_token = GoogleOAuth::parse_callback(&callback, &state)?;

        let post_body = form_urlencoded::Serializer::new(String::new())
            .append_pair("access_token", &access_token)
            .append_pair("providerId", FederatedProvider::Google.provider_id())
            .finish();

        let account: AccountResponse = self
            .call(
                "signInWithIdp",
                &json!({
                    "postBody": post_body,
                    "requestUri": oauth.redirect_uri(),
                    "returnSecureToken": true,
                    "returnIdpCredential": true,
                }),
            )
            .await?;
        Ok(self.establish(account.into()))
    }
}

async fn read_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, AuthError> {
    if response.status().is_success() {
        return Ok(response.json().await?);
    }
    let status = response.status();
    let message = response
        .json::<ErrorEnvelope>()
        .await
        .map(|e| e.error.message)
        .unwrap_or_default();
    tracing::debug!(%status, %message, "identity provider rejected request");
    Err(AuthError::from_firebase(&message))
}

/// True when the request never got an answer. Connection failures surface as
/// request errors on both native and wasm clients.
fn is_unreachable(e: &reqwest::Error) -> bool {
    e.is_request() || e.is_timeout()
}

impl<P: PopupOpener> IdentityProvider for FirebaseAuth<P> {
    fn sessions(&self) -> &SessionHub {
        &self.sessions
    }

    async fn initialize(&self) {
        let Some(stored) = self.storage.load() else {
            self.sessions.publish(None);
            return;
        };

        match self.refresh(&stored).await {
            Ok(session) => {
                self.establish(session);
            }
            Err(AuthError::Http(e)) if is_unreachable(&e) => {
                // Offline: keep the stored identity, its token is refreshed on next start.
                tracing::warn!("Could not refresh stored session: {}", e);
                self.sessions.publish(Some(stored));
            }
            Err(e) => {
                tracing::info!("Stored session is no longer valid: {}", e);
                self.storage.clear();
                self.sessions.publish(None);
            }
        }
    }

    async fn sign_in_with_popup(&self, provider: FederatedProvider) -> Result<Session, AuthError> {
        match provider {
            FederatedProvider::Google => self.sign_in_with_google().await,
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account: AccountResponse = self
            .call(
                "signInWithPassword",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        Ok(self.establish(account.into()))
    }

    async fn create_user_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account: AccountResponse = self
            .call(
                "signUp",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        Ok(self.establish(account.into()))
    }

    async fn update_display_name(&self, session: &Session, name: &str) -> Result<Session, AuthError> {
        let update: UpdateResponse = self
            .call(
                "update",
                &json!({
                    "idToken": session.id_token(),
                    "displayName": name,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let mut updated = session.clone();
        updated.display_name = update.display_name.filter(|n| !n.is_empty());
        if let (Some(id_token), Some(refresh_token)) = (update.id_token, update.refresh_token) {
            updated.credential = Credential {
                id_token,
                refresh_token,
            };
        }
        Ok(self.establish(updated))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let _: IgnoredAny = self
            .call(
                "sendOobCode",
                &json!({ "requestType": "PASSWORD_RESET", "email": email }),
            )
            .await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.storage.clear();
        self.sessions.publish(None);
        Ok(())
    }
}
