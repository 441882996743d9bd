//! # Store abstraction for user records
//!
//! Records are written once and never read back or updated by the app, so
//! [`UserRecordStore`] has a single operation.
//! [`create_if_absent`](UserRecordStore::create_if_absent) writes a record only when
//! no document exists for its uid and reports whether it did. Implementations must
//! make this a single conditional write against the backend: two concurrent sign-ins
//! for the same uid produce one record.
//!
//! The call takes the caller's ID token so backends that enforce per-user security
//! rules can authorize the request. Backends without rules ignore it.

use thiserror::Error;

use crate::models::UserRecord;

/// Name of the collection holding user records.
pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("document store returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Async trait for creating user records.
pub trait UserRecordStore {
    /// Returns `Ok(true)` when the record was written, `Ok(false)` when one
    /// already existed for the uid.
    fn create_if_absent(
        &self,
        record: &UserRecord,
        id_token: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>>;
}
