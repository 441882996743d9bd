//! Layout shared by every route: navigation bar above the routed view.

use dioxus::prelude::*;
use ui::{use_session, NavTarget, Navbar};

use crate::Route;

#[component]
pub fn Shell() -> Element {
    let auth = use_session();
    let nav = use_navigator();

    let onnavigate = move |target: NavTarget| {
        let route = match target {
            NavTarget::Home => Route::Home {},
            NavTarget::SignIn => Route::Login {},
        };
        nav.push(route);
    };

    rsx! {
        Navbar { session: auth().session, onnavigate }
        Outlet::<Route> {}
    }
}
