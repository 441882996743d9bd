//! # Cloud Firestore implementation of [`UserRecordStore`]
//!
//! Talks to the Firestore REST API (`/v1/projects/{project}/databases/(default)/documents`).
//! Records live at `users/{uid}`.
//!
//! [`create_if_absent`](FirestoreUserStore::create_if_absent) is a `createDocument`
//! call with an explicit `documentId`. Firestore rejects it with `409 ALREADY_EXISTS`
//! when the document is present, which makes the existence check and the write one
//! atomic operation on the server. Only the status of the reply matters; the echoed
//! document is not read back.
//!
//! Firestore wraps every field in a typed value (`{"stringValue": "..."}`), so the
//! module carries a small [`Document`] encoder limited to the value kinds a user
//! record uses.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Serialize;

use crate::models::UserRecord;
use crate::store::{StoreError, UserRecordStore, USERS_COLLECTION};

/// Production Firestore REST root.
pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// A Firestore document body as sent to `createDocument`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub fields: BTreeMap<String, Value>,
}

/// The subset of Firestore value types used by user records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    StringValue(String),
    NullValue(()),
}

impl From<Option<&String>> for Value {
    fn from(value: Option<&String>) -> Self {
        match value {
            Some(s) => Value::StringValue(s.clone()),
            None => Value::NullValue(()),
        }
    }
}

impl From<&UserRecord> for Document {
    fn from(record: &UserRecord) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("uid".to_string(), Value::StringValue(record.uid.clone()));
        fields.insert("name".to_string(), Value::from(record.name.as_ref()));
        fields.insert(
            "authProvider".to_string(),
            Value::StringValue(record.auth_provider.as_str().to_string()),
        );
        fields.insert("email".to_string(), Value::from(record.email.as_ref()));
        Document { fields }
    }
}

/// Firestore-backed user record store.
#[derive(Clone, Debug)]
pub struct FirestoreUserStore {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: String,
}

impl FirestoreUserStore {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key: api_key.into(),
        }
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, USERS_COLLECTION
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder, id_token: &str) -> reqwest::RequestBuilder {
        let request = request.query(&[("key", self.api_key.as_str())]);
        if id_token.is_empty() {
            request
        } else {
            request.bearer_auth(id_token)
        }
    }
}

/// Turns a non-success Firestore response into [`StoreError::Status`].
async fn status_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body: serde_json::Value = response.json().await.unwrap_or_default();
    let message = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    StoreError::Status { status, message }
}

impl UserRecordStore for FirestoreUserStore {
    async fn create_if_absent(&self, record: &UserRecord, id_token: &str) -> Result<bool, StoreError> {
        let request = self
            .http
            .post(self.collection_url())
            .query(&[("documentId", record.uid.as_str())])
            .json(&Document::from(record));
        let response = self.authorize(request, id_token).send().await?;

        if response.status() == StatusCode::CONFLICT {
            tracing::debug!(uid = %record.uid, "user record already exists");
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        tracing::info!(uid = %record.uid, provider = %record.auth_provider, "user record created");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthProvider;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USERS_PATH: &str = "/v1/projects/demo/databases/(default)/documents/users";

    fn store(server: &MockServer) -> FirestoreUserStore {
        FirestoreUserStore::new(format!("{}/v1", server.uri()), "demo", "api-key")
    }

    fn alice() -> UserRecord {
        UserRecord::new(
            "u1",
            Some("Alice".to_string()),
            AuthProvider::Google,
            Some("alice@example.com".to_string()),
        )
    }

    #[test]
    fn test_document_encoding() {
        let mut record = alice();
        record.name = None;
        let doc = serde_json::to_value(Document::from(&record)).unwrap();
        assert_eq!(
            doc,
            json!({
                "fields": {
                    "authProvider": { "stringValue": "google" },
                    "email": { "stringValue": "alice@example.com" },
                    "name": { "nullValue": null },
                    "uid": { "stringValue": "u1" }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_create_sends_document_id_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(USERS_PATH))
            .and(query_param("documentId", "u1"))
            .and(query_param("key", "api-key"))
            .and(header("Authorization", "Bearer id-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/demo/databases/(default)/documents/users/u1",
                "fields": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = store(&server).create_if_absent(&alice(), "id-token").await.unwrap();
        assert!(created);
    }

    #[tokio::test]
    async fn test_create_ignores_fields_in_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(USERS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/demo/databases/(default)/documents/users/u1",
                "fields": {
                    "uid": { "stringValue": "u1" },
                    "loginCount": { "integerValue": "3" },
                    "createdAt": { "timestampValue": "2024-01-01T00:00:00Z" },
                    "tags": { "arrayValue": { "values": [] } }
                },
                "createTime": "2024-01-01T00:00:00Z"
            })))
            .mount(&server)
            .await;

        assert!(store(&server).create_if_absent(&alice(), "id-token").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_conflict_means_existing_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(USERS_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "error": { "code": 409, "message": "Document already exists", "status": "ALREADY_EXISTS" }
            })))
            .mount(&server)
            .await;

        let created = store(&server).create_if_absent(&alice(), "id-token").await.unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn test_create_permission_denied_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(USERS_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED" }
            })))
            .mount(&server)
            .await;

        let err = store(&server)
            .create_if_absent(&alice(), "id-token")
            .await
            .unwrap_err();
        match err {
            StoreError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Missing or insufficient permissions.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
