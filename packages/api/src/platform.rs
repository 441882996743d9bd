//! Browser glue: the OAuth popup window and session persistence.
//!
//! Both concerns sit behind small traits so the provider logic runs unchanged in
//! native tests. On `wasm32` the defaults are [`WindowPopup`] and `LocalStorage`;
//! elsewhere federated sign-in is unavailable and sessions live in memory.

use std::cell::RefCell;
use std::future::Future;

use crate::error::AuthError;
use crate::session::Session;

/// Opens an authorization page in a popup and waits for it to come back.
pub trait PopupOpener {
    /// Resolves with the full URL the popup reached once it lands on
    /// `redirect_uri`.
    fn open(&self, url: &str, redirect_uri: &str) -> impl Future<Output = Result<String, AuthError>>;
}

/// Where the signed-in session survives page reloads.
pub trait SessionStorage {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    session: RefCell<Option<Session>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RefCell::new(Some(session)),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn save(&self, session: &Session) {
        *self.session.borrow_mut() = Some(session.clone());
    }

    fn clear(&self) {
        self.session.borrow_mut().take();
    }
}

/// Popup opener for targets without a browser window.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPopup;

impl PopupOpener for UnsupportedPopup {
    async fn open(&self, _url: &str, _redirect_uri: &str) -> Result<String, AuthError> {
        Err(AuthError::Unsupported)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{LocalStorage, WindowPopup};

#[cfg(target_arch = "wasm32")]
pub type DefaultPopup = WindowPopup;
#[cfg(not(target_arch = "wasm32"))]
pub type DefaultPopup = UnsupportedPopup;

/// Storage used by the app for the given Firebase API key.
pub fn default_storage(api_key: &str) -> Box<dyn SessionStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorage::new(api_key))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = api_key;
        Box::new(MemoryStorage::new())
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::time::Duration;

    use super::{PopupOpener, SessionStorage};
    use crate::error::AuthError;
    use crate::session::Session;

    const POLL_INTERVAL: Duration = Duration::from_millis(250);
    const POPUP_FEATURES: &str = "width=500,height=600";

    /// Opens the authorization page with `window.open` and polls the popup until
    /// it is back on our origin at the redirect URI.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct WindowPopup;

    impl PopupOpener for WindowPopup {
        async fn open(&self, url: &str, redirect_uri: &str) -> Result<String, AuthError> {
            let window = web_sys::window().ok_or(AuthError::Unsupported)?;
            let popup = window
                .open_with_url_and_target_and_features(url, "firebase-auth", POPUP_FEATURES)
                .ok()
                .flatten()
                .ok_or(AuthError::PopupBlocked)?;

            loop {
                gloo_timers::future::sleep(POLL_INTERVAL).await;

                if popup.closed().unwrap_or(true) {
                    return Err(AuthError::PopupClosed);
                }
                // Reading the location throws while the popup shows Google's origin.
                if let Ok(href) = popup.location().href() {
                    if href.starts_with(redirect_uri) {
                        let _ = popup.close();
                        return Ok(href);
                    }
                }
            }
        }
    }

    /// Session persisted in `window.localStorage` as JSON.
    #[derive(Debug, Clone)]
    pub struct LocalStorage {
        key: String,
    }

    impl LocalStorage {
        pub fn new(api_key: &str) -> Self {
            Self {
                key: format!("firebase:authUser:{api_key}:[DEFAULT]"),
            }
        }

        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()?.local_storage().ok().flatten()
        }
    }

    impl SessionStorage for LocalStorage {
        fn load(&self) -> Option<Session> {
            let raw = Self::storage()?.get_item(&self.key).ok().flatten()?;
            match serde_json::from_str(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Discarding unreadable stored session: {}", e);
                    None
                }
            }
        }

        fn save(&self, session: &Session) {
            let Some(storage) = Self::storage() else {
                return;
            };
            match serde_json::to_string(session) {
                Ok(raw) => {
                    if storage.set_item(&self.key, &raw).is_err() {
                        tracing::warn!("Failed to persist session");
                    }
                }
                Err(e) => tracing::warn!("Failed to serialize session: {}", e),
            }
        }

        fn clear(&self) {
            if let Some(storage) = Self::storage() {
                let _ = storage.remove_item(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Credential;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.load().is_none());

        let session = Session::new(
            "u1",
            None,
            None,
            Credential {
                id_token: "id".to_string(),
                refresh_token: "refresh".to_string(),
            },
        );
        storage.save(&session);
        assert_eq!(storage.load(), Some(session));

        storage.clear();
        assert!(storage.load().is_none());
    }

    #[tokio::test]
    async fn test_unsupported_popup() {
        let result = UnsupportedPopup.open("https://accounts.google.com", "http://localhost").await;
        assert!(matches!(result, Err(AuthError::Unsupported)));
    }
}
