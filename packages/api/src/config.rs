//! # Firebase project configuration
//!
//! The app needs six settings from the Firebase console before it can render
//! anything. They are read from the environment under the names in
//! [`REQUIRED_VARS`]; a missing or empty value is a [`ConfigError::Missing`] and the
//! binary refuses to start.
//!
//! Native builds read the process environment (after loading `.env` through
//! `dotenvy`). Browser builds have no process environment, so the values are baked in
//! at compile time with `option_env!` and [`FirebaseConfig::load`] picks the right
//! source for the target.
//!
//! Optional settings:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `GOOGLE_CLIENT_ID` | OAuth client used by the Google popup flow |
//! | `AUTH_REDIRECT_URI` | Page the Google popup returns to (default [`DEFAULT_REDIRECT_URI`]) |
//! | `FIREBASE_AUTH_EMULATOR_HOST` | Send auth calls to a local emulator, e.g. `127.0.0.1:9099` |
//! | `FIRESTORE_EMULATOR_HOST` | Send document calls to a local emulator, e.g. `127.0.0.1:8080` |

use thiserror::Error;

pub const REQUIRED_VARS: [&str; 6] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_STORAGE_BUCKET",
    "FIREBASE_MESSAGING_SENDER_ID",
    "FIREBASE_APP_ID",
];

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/sign-in";

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing {0} env var.")]
    Missing(&'static str),
    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// REST roots for the Firebase services the app talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub identity_toolkit: String,
    pub secure_token: String,
    pub firestore: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            identity_toolkit: IDENTITY_TOOLKIT_URL.to_string(),
            secure_token: SECURE_TOKEN_URL.to_string(),
            firestore: records::firestore::FIRESTORE_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Endpoints for the Firebase emulator suite. Hosts may be given with or without
    /// a scheme (`127.0.0.1:9099` or `http://127.0.0.1:9099`).
    pub fn emulators(auth_host: Option<&str>, firestore_host: Option<&str>) -> Self {
        let mut endpoints = Self::default();
        if let Some(host) = auth_host {
            let root = with_scheme(host);
            endpoints.identity_toolkit = format!("{root}/identitytoolkit.googleapis.com/v1");
            endpoints.secure_token = format!("{root}/securetoken.googleapis.com/v1");
        }
        if let Some(host) = firestore_host {
            endpoints.firestore = format!("{}/v1", with_scheme(host));
        }
        endpoints
    }
}

fn with_scheme(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    pub google_client_id: Option<String>,
    pub auth_redirect_uri: String,
    pub endpoints: Endpoints,
}

impl FirebaseConfig {
    /// Load from the source appropriate for the compilation target.
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::from_build_env()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_env()
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from values captured when the crate was compiled.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(build_env)
    }

    /// Build a config from an arbitrary variable lookup. Required values are checked
    /// in [`REQUIRED_VARS`] order and the first absent one is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let api_key = require("FIREBASE_API_KEY")?;
        let auth_domain = require("FIREBASE_AUTH_DOMAIN")?;
        let project_id = require("FIREBASE_PROJECT_ID")?;
        let storage_bucket = require("FIREBASE_STORAGE_BUCKET")?;
        let messaging_sender_id = require("FIREBASE_MESSAGING_SENDER_ID")?;
        let app_id = require("FIREBASE_APP_ID")?;

        let endpoints = Endpoints::emulators(
            get("FIREBASE_AUTH_EMULATOR_HOST").as_deref(),
            get("FIRESTORE_EMULATOR_HOST").as_deref(),
        );

        let config = Self {
            api_key,
            auth_domain,
            project_id,
            storage_bucket,
            messaging_sender_id,
            app_id,
            google_client_id: get("GOOGLE_CLIENT_ID"),
            auth_redirect_uri: get("AUTH_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            endpoints,
        };

        tracing::debug!(
            project_id = %config.project_id,
            auth_domain = %config.auth_domain,
            "loaded Firebase config"
        );
        Ok(config)
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

fn build_env(name: &str) -> Option<String> {
    let value = match name {
        "FIREBASE_API_KEY" => option_env!("FIREBASE_API_KEY"),
        "FIREBASE_AUTH_DOMAIN" => option_env!("FIREBASE_AUTH_DOMAIN"),
        "FIREBASE_PROJECT_ID" => option_env!("FIREBASE_PROJECT_ID"),
        "FIREBASE_STORAGE_BUCKET" => option_env!("FIREBASE_STORAGE_BUCKET"),
        "FIREBASE_MESSAGING_SENDER_ID" => option_env!("FIREBASE_MESSAGING_SENDER_ID"),
        "FIREBASE_APP_ID" => option_env!("FIREBASE_APP_ID"),
        "GOOGLE_CLIENT_ID" => option_env!("GOOGLE_CLIENT_ID"),
        "AUTH_REDIRECT_URI" => option_env!("AUTH_REDIRECT_URI"),
        "FIREBASE_AUTH_EMULATOR_HOST" => option_env!("FIREBASE_AUTH_EMULATOR_HOST"),
        "FIRESTORE_EMULATOR_HOST" => option_env!("FIRESTORE_EMULATOR_HOST"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn complete() -> HashMap<&'static str, String> {
        REQUIRED_VARS
            .iter()
            .map(|name| (*name, format!("{}-value", name.to_lowercase())))
            .collect()
    }

    fn load(vars: &HashMap<&'static str, String>) -> Result<FirebaseConfig, ConfigError> {
        FirebaseConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_complete_config_loads() {
        let config = load(&complete()).unwrap();
        assert_eq!(config.api_key, "firebase_api_key-value");
        assert_eq!(config.project_id, "firebase_project_id-value");
        assert_eq!(config.google_client_id, None);
        assert_eq!(config.auth_redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn test_each_required_var_is_fatal_when_missing() {
        for name in REQUIRED_VARS {
            let mut vars = complete();
            vars.remove(name);
            assert_eq!(load(&vars), Err(ConfigError::Missing(name)), "{name}");
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut vars = complete();
        vars.insert("FIREBASE_APP_ID", "   ".to_string());
        assert_eq!(load(&vars), Err(ConfigError::Missing("FIREBASE_APP_ID")));
    }

    #[test]
    fn test_missing_message_names_the_variable() {
        assert_eq!(
            ConfigError::Missing("FIREBASE_API_KEY").to_string(),
            "Missing FIREBASE_API_KEY env var."
        );
    }

    #[test]
    fn test_emulator_hosts() {
        let mut vars = complete();
        vars.insert("FIREBASE_AUTH_EMULATOR_HOST", "127.0.0.1:9099".to_string());
        vars.insert("FIRESTORE_EMULATOR_HOST", "http://localhost:8081/".to_string());
        let config = load(&vars).unwrap();
        assert_eq!(
            config.endpoints.identity_toolkit,
            "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1"
        );
        assert_eq!(
            config.endpoints.secure_token,
            "http://127.0.0.1:9099/securetoken.googleapis.com/v1"
        );
        assert_eq!(config.endpoints.firestore, "http://localhost:8081/v1");
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("FIREBASE_API_KEY", Some("key")),
                ("FIREBASE_AUTH_DOMAIN", Some("demo.firebaseapp.com")),
                ("FIREBASE_PROJECT_ID", Some("demo")),
                ("FIREBASE_STORAGE_BUCKET", Some("demo.appspot.com")),
                ("FIREBASE_MESSAGING_SENDER_ID", Some("1234")),
                ("FIREBASE_APP_ID", Some("1:1234:web:abcd")),
                ("GOOGLE_CLIENT_ID", Some("client.apps.googleusercontent.com")),
                ("AUTH_REDIRECT_URI", Some("https://demo.example/sign-in")),
                ("FIREBASE_AUTH_EMULATOR_HOST", None),
                ("FIRESTORE_EMULATOR_HOST", None),
            ],
            || {
                let config = FirebaseConfig::from_env().unwrap();
                assert_eq!(config.project_id, "demo");
                assert_eq!(
                    config.google_client_id.as_deref(),
                    Some("client.apps.googleusercontent.com")
                );
                assert_eq!(config.auth_redirect_uri, "https://demo.example/sign-in");
            },
        );
    }

    #[test]
    fn test_from_env_missing_project() {
        temp_env::with_vars(
            [
                ("FIREBASE_API_KEY", Some("key")),
                ("FIREBASE_AUTH_DOMAIN", Some("demo.firebaseapp.com")),
                ("FIREBASE_PROJECT_ID", None),
                ("FIREBASE_STORAGE_BUCKET", Some("demo.appspot.com")),
                ("FIREBASE_MESSAGING_SENDER_ID", Some("1234")),
                ("FIREBASE_APP_ID", Some("1:1234:web:abcd")),
            ],
            || {
                assert_eq!(
                    FirebaseConfig::from_env(),
                    Err(ConfigError::Missing("FIREBASE_PROJECT_ID"))
                );
            },
        );
    }
}
