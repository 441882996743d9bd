use api::Session;
use dioxus::prelude::*;

use crate::auth::LogoutButton;

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Home,
    SignIn,
    /// The signed-in user's display name.
    User(String),
    Logout,
}

/// Routes the navigation bar can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Home,
    SignIn,
}

pub fn nav_items(session: Option<&Session>) -> Vec<NavItem> {
    match session {
        Some(session) => vec![
            NavItem::Home,
            NavItem::User(session.display_label().to_string()),
            NavItem::Logout,
        ],
        None => vec![NavItem::Home, NavItem::SignIn],
    }
}

#[component]
pub fn Navbar(session: Option<Session>, onnavigate: EventHandler<NavTarget>) -> Element {
    let items = nav_items(session.as_ref());

    rsx! {
        div {
            class: "Nav",
            {items.into_iter().map(move |item| match item {
                NavItem::Home => { let key = "home"; rsx! {
                    button { key: "{key}", onclick: move |_| onnavigate.call(NavTarget::Home), "Home" }
                }},
                NavItem::SignIn => { let key = "sign-in"; rsx! {
                    button { key: "{key}", onclick: move |_| onnavigate.call(NavTarget::SignIn), "Sign In" }
                }},
                NavItem::User(name) => { let key = "user"; rsx! {
                    p { key: "{key}", class: "Nav-user", "{name}" }
                }},
                NavItem::Logout => { let key = "logout"; rsx! {
                    LogoutButton { key: "{key}" }
                }},
            })}
        }
    }
}
