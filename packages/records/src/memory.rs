use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::UserRecord;
use crate::store::{StoreError, UserRecordStore};

/// In-memory UserRecordStore for testing and offline development.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserStore {
    records: Arc<Mutex<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, ordered by uid.
    pub fn records(&self) -> Vec<UserRecord> {
        let mut all: Vec<UserRecord> = self.records.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.uid.cmp(&b.uid));
        all
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserRecordStore for MemoryUserStore {
    async fn create_if_absent(
        &self,
        record: &UserRecord,
        _id_token: &str,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.uid) {
            return Ok(false);
        }
        records.insert(record.uid.clone(), record.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthProvider;

    fn record(uid: &str, provider: AuthProvider) -> UserRecord {
        UserRecord::new(
            uid,
            Some("Alice".to_string()),
            provider,
            Some("alice@example.com".to_string()),
        )
    }

    #[tokio::test]
    async fn test_create_stores_record() {
        let store = MemoryUserStore::new();
        assert!(store.is_empty());

        let created = store
            .create_if_absent(&record("u1", AuthProvider::Local), "token")
            .await
            .unwrap();
        assert!(created);

        let loaded = store.records().remove(0);
        assert_eq!(loaded.auth_provider, AuthProvider::Local);
        assert_eq!(loaded.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_second_create_keeps_first_record() {
        let store = MemoryUserStore::new();
        store
            .create_if_absent(&record("u1", AuthProvider::Google), "token")
            .await
            .unwrap();

        let mut changed = record("u1", AuthProvider::Local);
        changed.name = Some("Someone Else".to_string());
        let created = store.create_if_absent(&changed, "token").await.unwrap();

        assert!(!created);
        assert_eq!(store.len(), 1);
        let kept = store.records().remove(0);
        assert_eq!(kept.auth_provider, AuthProvider::Google);
        assert_eq!(kept.name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_records_sorted_by_uid() {
        let store = MemoryUserStore::new();
        store
            .create_if_absent(&record("b", AuthProvider::Local), "")
            .await
            .unwrap();
        store
            .create_if_absent(&record("a", AuthProvider::Google), "")
            .await
            .unwrap();
        let uids: Vec<String> = store.records().into_iter().map(|r| r.uid).collect();
        assert_eq!(uids, vec!["a", "b"]);
    }
}
