//! # Session provider client
//!
//! [`AuthClient`] is what the views call. It strings an [`IdentityProvider`], a
//! [`UserRecordStore`] and a [`Notifier`] together and owns the error boundary:
//! every public operation logs and reports its own failures and hands back an
//! `Option`/`bool` instead of an error, so a button handler never has anything left to
//! deal with.
//!
//! Profile records are written with [`UserRecordStore::create_if_absent`]. Signing in
//! with Google again for a known uid therefore leaves the first record untouched.
//!
//! Sign-up and Google sign-in hold the session stream (see [`crate::SessionHub::hold`])
//! until the record write has finished. Views leave the form as soon as a session
//! shows up, and that would drop a handler task still waiting on the store.

use std::rc::Rc;

use records::{AuthProvider, FirestoreUserStore, UserRecord, UserRecordStore};

use crate::auth::{FederatedProvider, FirebaseAuth, IdentityProvider};
use crate::config::FirebaseConfig;
use crate::error::AuthError;
use crate::notify::{AlertNotifier, Notice, Notifier};
use crate::platform::{default_storage, DefaultPopup};
use crate::session::{Session, Subscription};

struct Inner<P, S, N> {
    provider: P,
    records: S,
    notifier: N,
}

pub struct AuthClient<P, S, N> {
    inner: Rc<Inner<P, S, N>>,
}

impl<P, S, N> Clone for AuthClient<P, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P, S, N> PartialEq for AuthClient<P, S, N> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// The client wired to Firebase, Firestore and browser alerts.
pub type AppClient = AuthClient<FirebaseAuth<DefaultPopup>, FirestoreUserStore, AlertNotifier>;

impl AppClient {
    pub fn from_config(config: FirebaseConfig) -> Self {
        let records = FirestoreUserStore::new(
            config.endpoints.firestore.clone(),
            config.project_id.clone(),
            config.api_key.clone(),
        );
        let storage = default_storage(&config.api_key);
        let provider = FirebaseAuth::new(config, DefaultPopup::default(), storage);
        Self::new(provider, records, AlertNotifier)
    }
}

impl<P, S, N> AuthClient<P, S, N>
where
    P: IdentityProvider,
    S: UserRecordStore,
    N: Notifier,
{
    pub fn new(provider: P, records: S, notifier: N) -> Self {
        Self {
            inner: Rc::new(Inner {
                provider,
                records,
                notifier,
            }),
        }
    }

    /// Register `handler` for every session change. See [`crate::SessionHub::subscribe`].
    pub fn subscribe_to_session<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Option<Session>) + 'static,
    {
        self.inner.provider.sessions().subscribe(handler)
    }

    pub async fn initialize(&self) {
        tracing::info!("Restoring session");
        self.inner.provider.initialize().await;
    }

    fn report(&self, context: &str, err: &AuthError) {
        tracing::error!(error = %err, "{}", context);
        self.inner.notifier.notify(Notice::error(err.to_string()));
    }

    pub async fn sign_in_with_google(&self) -> Option<Session> {
        tracing::info!("Signing in with Google");
        match self.try_sign_in_with_google().await {
            Ok(session) => Some(session),
            Err(e) => {
                self.report("Error signing in with Google", &e);
                None
            }
        }
    }

    async fn try_sign_in_with_google(&self) -> Result<Session, AuthError> {
        let _hold = self.inner.provider.sessions().hold();
        let session = self
            .inner
            .provider
            .sign_in_with_popup(FederatedProvider::Google)
            .await?;

        let record = UserRecord::new(
            session.uid.clone(),
            session.display_name.clone(),
            AuthProvider::Google,
            session.email.clone(),
        );
        let created = self
            .inner
            .records
            .create_if_absent(&record, session.id_token())
            .await?;
        tracing::info!(uid = %session.uid, created, "Signed in with Google");
        Ok(session)
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Option<Session> {
        let email = email.trim();
        tracing::info!(email, "Authenticating with email and password");
        match self
            .inner
            .provider
            .sign_in_with_password(email, password)
            .await
        {
            Ok(session) => {
                tracing::info!(uid = %session.uid, "User authenticated");
                Some(session)
            }
            Err(e) => {
                self.report("Error logging in with email and password", &e);
                None
            }
        }
    }

    pub async fn register_with_password(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Option<Session> {
        let email = email.trim();
        tracing::info!(email, "Registering user");
        match self.try_register(name.trim(), email, password).await {
            Ok(session) => Some(session),
            Err(e) => {
                self.report("Error signing up with email and password", &e);
                None
            }
        }
    }

    async fn try_register(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        let provider = &self.inner.provider;
        let _hold = provider.sessions().hold();
        let mut session = provider.create_user_with_password(email, password).await?;
        tracing::info!(uid = %session.uid, "User created");

        if !name.is_empty() {
            match provider.update_display_name(&session, name).await {
                Ok(updated) => session = updated,
                Err(e) => tracing::warn!(error = %e, "Could not set display name"),
            }
        }

        let record = UserRecord::new(
            session.uid.clone(),
            Some(name.to_string()).filter(|n| !n.is_empty()),
            AuthProvider::Local,
            Some(email.to_string()),
        );
        let created = self
            .inner
            .records
            .create_if_absent(&record, session.id_token())
            .await?;
        if !created {
            tracing::warn!(uid = %session.uid, "User record already existed for new account");
        }
        Ok(session)
    }

    /// Returns whether the reset mail was accepted by the provider.
    pub async fn send_password_reset(&self, email: &str) -> bool {
        let email = email.trim();
        tracing::info!(email, "Sending password reset link");
        match self.inner.provider.send_password_reset(email).await {
            Ok(()) => {
                tracing::info!("Password reset request sent");
                self.inner
                    .notifier
                    .notify(Notice::info("Password reset link sent!"));
                true
            }
            Err(e) => {
                self.report("Error sending password reset link", &e);
                false
            }
        }
    }

    pub async fn sign_out(&self) {
        tracing::info!("Logout");
        if let Err(e) = self.inner.provider.sign_out().await {
            tracing::error!(error = %e, "Error signing out");
        }
    }
}
