//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::FaGoogle;
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod auth;
pub use auth::{use_auth_client, use_session, AuthState, Gate, LogoutButton, SessionProvider};

mod navbar;
pub use navbar::{nav_items, NavItem, NavTarget, Navbar};

mod loading;
pub use loading::Loading;
