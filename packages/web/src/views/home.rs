use dioxus::prelude::*;

/// Landing page.
#[component]
pub fn Home() -> Element {
    rsx! {
        div {
            class: "View",
            h1 { "Firebase OAuth 2.0" }
        }
    }
}
