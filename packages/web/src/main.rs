use api::FirebaseConfig;
use dioxus::prelude::*;

use ui::SessionProvider;
use views::{Home, Login, Shell, SignUp};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/sign-in")]
        Login {},
        #[route("/sign-up")]
        SignUp {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::logger::initialize_default();

    // Nothing renders without a complete Firebase config.
    let config = match FirebaseConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            panic!("{e}");
        }
    };
    tracing::info!(project_id = %config.project_id, "Firebase config loaded");

    LaunchBuilder::new().with_context(config).launch(App);
}

#[component]
fn App() -> Element {
    let config = use_context::<FirebaseConfig>();

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div {
            class: "App",
            SessionProvider {
                config,
                Router::<Route> {}
            }
        }
    }
}
