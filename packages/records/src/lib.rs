//! # Records crate — application-level user profiles
//!
//! Every account that signs in gets exactly one profile document in the `users`
//! collection of the backing document store, keyed by the provider uid. The
//! [`UserRecordStore`] trait is the only way the rest of the workspace touches
//! that collection, so the same sign-in logic runs against Cloud Firestore in the
//! browser and against [`MemoryUserStore`] in tests.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | [`UserRecord`] and the [`AuthProvider`] tag |
//! | [`store`] | [`UserRecordStore`] trait and [`StoreError`] |
//! | [`firestore`] | [`FirestoreUserStore`], the Firestore REST implementation |

pub mod firestore;
pub mod models;
pub mod store;

mod memory;
pub use memory::MemoryUserStore;

pub use firestore::FirestoreUserStore;
pub use models::{AuthProvider, UserRecord};
pub use store::{StoreError, UserRecordStore, USERS_COLLECTION};
