//! Session context and hooks for the UI.
//!
//! [`SessionProvider`] is the root of the component tree: it builds the
//! [`AppClient`], subscribes to the session stream once, and exposes both through
//! context. Views read the session with [`use_session`] and call operations through
//! [`use_auth_client`].

use std::rc::Rc;

use api::{AppClient, FirebaseConfig, Session};
use dioxus::prelude::*;

use crate::icons::FaRightFromBracket;
use crate::Icon;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// True until the provider reports its initial state.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }
}

/// What a sign-in or sign-up view should show for a given [`AuthState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Loading,
    /// A session exists, leave for the landing page.
    Redirect,
    Form,
}

impl AuthState {
    pub fn gate(&self) -> Gate {
        if self.loading {
            Gate::Loading
        } else if self.session.is_some() {
            Gate::Redirect
        } else {
            Gate::Form
        }
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_session() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_auth_client() -> AppClient {
    use_context::<AppClient>()
}

/// Provider component that owns the client and the session subscription.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn SessionProvider(config: FirebaseConfig, children: Element) -> Element {
    let client = use_hook(|| AppClient::from_config(config.clone()));
    use_context_provider(|| client.clone());

    let auth_state = use_signal(AuthState::default);
    use_context_provider(|| auth_state);

    // Held for the lifetime of this component; dropping it unsubscribes.
    use_hook(|| {
        Rc::new(client.subscribe_to_session(move |session| {
            match &session {
                Some(s) => tracing::info!(uid = %s.uid, "User authenticated"),
                None => tracing::info!("No user session"),
            }
            let mut auth_state = auth_state;
            auth_state.set(AuthState {
                session,
                loading: false,
            });
        }))
    });

    use_future(move || {
        let client = client.clone();
        async move { client.initialize().await }
    });

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let client = use_auth_client();

    let onclick = move |_| {
        let client = client.clone();
        async move { client.sign_out().await }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            Icon { icon: FaRightFromBracket, width: 14, height: 14 }
            " {label}"
        }
    }
}
