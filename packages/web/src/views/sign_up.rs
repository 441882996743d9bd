//! Registration page view with name/email/password form.

use dioxus::prelude::*;
use ui::{use_auth_client, use_session, Gate, Loading};

use crate::Route;

/// Sign-up page component.
#[component]
pub fn SignUp() -> Element {
    let auth = use_session();
    let client = use_auth_client();
    let nav = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    // Registration signs the new account in; leave once the session shows up.
    use_effect(move || {
        if auth().gate() == Gate::Redirect {
            nav.replace(Route::Home {});
        }
    });

    if auth().gate() == Gate::Loading {
        return rsx! { Loading {} };
    }

    let register = move |_: MouseEvent| {
        let client = client.clone();
        let (n, e, p) = (name(), email(), password());
        async move {
            client.register_with_password(&n, &e, &p).await;
        }
    };

    rsx! {
        div {
            class: "View",
            h1 { "Sign Up" }
            input {
                r#type: "text",
                value: "{name}",
                placeholder: "Name",
                oninput: move |evt| name.set(evt.value()),
            }
            br {}
            br {}
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
            button { onclick: register, "Submit" }
            br {}
            br {}
            Link {
                to: Route::Login {},
                button { "I already have an account" }
            }
        }
    }
}
