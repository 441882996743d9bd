//! Login page view with email/password form and Google popup sign-in.

use dioxus::prelude::*;
use ui::icons::FaGoogle;
use ui::{use_auth_client, use_session, Gate, Icon, Loading};

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_session();
    let client = use_auth_client();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    // Once the provider reports a session, go to the landing page.
    use_effect(move || {
        if auth().gate() == Gate::Redirect {
            nav.replace(Route::Home {});
        }
    });

    if auth().gate() == Gate::Loading {
        return rsx! { Loading {} };
    }

    let sign_in = {
        let client = client.clone();
        move |_: MouseEvent| {
            let client = client.clone();
            let (e, p) = (email(), password());
            async move {
                client.sign_in_with_password(&e, &p).await;
            }
        }
    };

    let sign_in_with_google = {
        let client = client.clone();
        move |_: MouseEvent| {
            let client = client.clone();
            async move {
                client.sign_in_with_google().await;
            }
        }
    };

    let reset_password = move |_: MouseEvent| {
        let client = client.clone();
        let e = email();
        async move {
            client.send_password_reset(&e).await;
        }
    };

    rsx! {
        div {
            class: "View",
            h1 { "Login" }
            input {
                r#type: "text",
                value: "{email}",
                placeholder: "Email Address",
                oninput: move |evt| email.set(evt.value()),
            }
            br {}
            br {}
            input {
                r#type: "password",
                value: "{password}",
                placeholder: "Password",
                oninput: move |evt| password.set(evt.value()),
            }
            br {}
            br {}
            button { onclick: sign_in, "Submit" }
            br {}
            br {}
            button {
                onclick: sign_in_with_google,
                Icon { icon: FaGoogle, width: 14, height: 14 }
                " Login with Google"
            }
            br {}
            br {}
            button { class: "link", onclick: reset_password, "Forgot password?" }
            br {}
            br {}
            Link {
                to: Route::SignUp {},
                button { "I don't have an account" }
            }
        }
    }
}
