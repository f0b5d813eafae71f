//! The `UserStore` trait.
//!
//! Implemented by storage backends (e.g. `orbit-store-postgres`). The sync
//! handler depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::user::{UserProfile, UserRecord};

/// Error returned by a [`UserStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The step that failed (e.g. `connect`, `query`), for logging.
  fn phase(&self) -> &'static str;
}

/// Abstraction over the relational store holding user profiles.
///
/// All methods return `Send` futures so the trait can be used from the
/// multi-threaded Lambda runtime.
pub trait UserStore: Send + Sync {
  type Error: StoreError;

  /// Insert the profile, or overwrite the mutable fields of the existing row
  /// with the same subject id. Must be a single atomic statement; the store
  /// refreshes `updated_at`.
  fn upsert_user<'a>(
    &'a self,
    profile: &'a UserProfile,
  ) -> impl Future<Output = Result<UserRecord, Self::Error>> + Send + 'a;

  /// Retrieve a row by subject id. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    subject_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + 'a;
}
