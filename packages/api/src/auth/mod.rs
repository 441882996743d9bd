//! Identity provider abstraction and its Firebase implementation.

mod config;
mod firebase;
mod google;

use std::future::Future;

pub use config::OAuthConfig;
pub use firebase::FirebaseAuth;
pub use google::GoogleOAuth;

use crate::error::AuthError;
use crate::session::{Session, SessionHub};

/// Third-party identity services reachable through the popup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
}

impl FederatedProvider {
    /// Provider id as the identity service names it.
    pub fn provider_id(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "google.com",
        }
    }
}

/// Async interface to the external identity service.
///
/// Every successful sign-in publishes the new session on [`sessions`](Self::sessions)
/// before returning it.
pub trait IdentityProvider {
    fn sessions(&self) -> &SessionHub;

    /// Restore the persisted session, if any, and resolve the session stream.
    fn initialize(&self) -> impl Future<Output = ()>;

    fn sign_in_with_popup(
        &self,
        provider: FederatedProvider,
    ) -> impl Future<Output = Result<Session, AuthError>>;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>>;

    fn create_user_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>>;

    fn update_display_name(
        &self,
        session: &Session,
        name: &str,
    ) -> impl Future<Output = Result<Session, AuthError>>;

    fn send_password_reset(&self, email: &str) -> impl Future<Output = Result<(), AuthError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>>;
}
