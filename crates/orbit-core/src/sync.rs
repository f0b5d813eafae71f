//! The user-sync handler.
//!
//! Reconciles a confirmed signup into the profile store. The handler's one
//! hard rule is that it never blocks account confirmation: every failure is
//! logged and the event is handed back unchanged.

use tracing::{debug, error, info, warn};

use crate::{
  Error,
  event::IdentityEvent,
  store::{StoreError as _, UserStore},
  user::{UserProfile, UserRecord},
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What a single invocation did.
#[derive(Debug)]
pub enum SyncOutcome {
  /// The trigger is not a signup confirmation; nothing was touched.
  Skipped { trigger: String },
  /// The event is malformed; no write was attempted.
  Rejected(Error),
  /// The row now mirrors the event.
  Synced(UserRecord),
  /// The store could not be reached or the statement failed.
  Failed {
    subject_id: String,
    /// The backend step that failed, as reported by the store.
    phase:      &'static str,
    error:      Box<dyn std::error::Error + Send + Sync>,
  },
}

impl SyncOutcome {
  pub fn is_synced(&self) -> bool { matches!(self, SyncOutcome::Synced(_)) }

  /// Emit one log line describing the outcome.
  pub fn log(&self) {
    match self {
      SyncOutcome::Skipped { trigger } => {
        debug!(trigger = %trigger, "ignoring identity event");
      }
      SyncOutcome::Rejected(e @ Error::MissingAttributes) => {
        error!(error = %e, "cannot sync user");
      }
      SyncOutcome::Rejected(e) => {
        warn!(error = %e, "cannot sync user");
      }
      SyncOutcome::Synced(record) => {
        info!(
          subject_id = %record.subject_id,
          updated_at = %record.updated_at,
          "user synced to database"
        );
      }
      SyncOutcome::Failed { subject_id, phase, error } => {
        error!(
          subject_id = %subject_id,
          phase = %phase,
          error = %error,
          "failed to sync user to database"
        );
      }
    }
  }
}

// ─── Handler ─────────────────────────────────────────────────────────────────

/// Mirrors confirmed signups into a [`UserStore`].
pub struct UserSync<S> {
  store: S,
}

impl<S: UserStore> UserSync<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Handle one event and return it unchanged, whatever happened.
  pub async fn handle(&self, event: IdentityEvent) -> IdentityEvent {
    self.sync(&event).await.log();
    event
  }

  /// Run the sync and report the outcome without logging it.
  pub async fn sync(&self, event: &IdentityEvent) -> SyncOutcome {
    if !event.is_signup_confirmation() {
      return SyncOutcome::Skipped {
        trigger: event.trigger_source.clone(),
      };
    }

    let Some(attrs) = event.user_attributes() else {
      return SyncOutcome::Rejected(Error::MissingAttributes);
    };

    let profile = match UserProfile::from_attributes(attrs) {
      Ok(profile) => profile,
      Err(e) => return SyncOutcome::Rejected(e),
    };

    match self.store.upsert_user(&profile).await {
      Ok(record) => SyncOutcome::Synced(record),
      Err(e) => SyncOutcome::Failed {
        subject_id: profile.subject_id,
        phase:      e.phase(),
        error:      Box::new(e),
      },
    }
  }
}
