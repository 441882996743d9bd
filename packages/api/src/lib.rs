//! # API crate — the session provider client
//!
//! Everything the views need to authenticate a user lives here. Identity is
//! delegated to Firebase Authentication over REST, user profiles to Cloud Firestore
//! through the `records` crate; this crate only sequences those calls and keeps the
//! current session observable.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`IdentityProvider`] trait, [`FirebaseAuth`], Google popup OAuth |
//! | [`client`] | [`AuthClient`]: the operations views call, with error reporting |
//! | [`config`] | [`FirebaseConfig`] loaded from the environment |
//! | [`error`] | [`AuthError`] and Firebase error code mapping |
//! | [`notify`] | [`Notifier`] for user-visible messages |
//! | [`platform`] | Popup window and session persistence for the browser |
//! | [`session`] | [`Session`], [`SessionHub`], [`Subscription`] and [`Hold`] |

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod platform;
pub mod session;

pub use auth::{FederatedProvider, FirebaseAuth, IdentityProvider};
pub use client::{AppClient, AuthClient};
pub use config::{ConfigError, FirebaseConfig};
pub use error::AuthError;
pub use notify::{AlertNotifier, Notice, NoticeLevel, Notifier};
pub use session::{Credential, Hold, Session, SessionHub, Subscription};
