use dioxus::prelude::*;

/// Placeholder shown while the provider is still restoring the session.
#[component]
pub fn Loading() -> Element {
    rsx! {
        div {
            class: "View",
            h1 { "Loading" }
        }
    }
}
