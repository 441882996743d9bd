//! User profile model.

use serde::{Deserialize, Serialize};

/// How the account behind a [`UserRecord`] authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Email and password managed by the identity provider.
    Local,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
        }
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile document written once per uid on first sign-up or federated sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    pub name: Option<String>,
    pub auth_provider: AuthProvider,
    pub email: Option<String>,
}

impl UserRecord {
    pub fn new(
        uid: impl Into<String>,
        name: Option<String>,
        auth_provider: AuthProvider,
        email: Option<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name,
            auth_provider,
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_document_field_names() {
        let record = UserRecord::new(
            "abc",
            Some("Alice".to_string()),
            AuthProvider::Google,
            Some("alice@example.com".to_string()),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["authProvider"], "google");
        assert_eq!(json["uid"], "abc");
        assert_eq!(json["email"], "alice@example.com");
    }
}
