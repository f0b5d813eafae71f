//! Lambda entry logic for the post-confirmation user sync.
//!
//! The identity provider waits on this function before it activates the
//! account, so every path here returns the payload it was given, untouched.
//! Failures only ever show up in the logs.

use orbit_core::{
  event::{IdentityEvent, POST_CONFIRMATION_SIGN_UP},
  store::UserStore,
  sync::UserSync,
};
use orbit_store_postgres::{DatabaseConfig, PgUserStore};
use serde::Deserialize as _;
use serde_json::Value;
use tracing::{debug, error, warn};

/// Run `sync` over a raw payload and return the payload as received.
///
/// The typed event is parsed from a borrow, so fields the handler does not
/// model come back byte-for-byte. A payload that does not parse as an
/// identity event is logged and passed through.
pub async fn sync_payload<S: UserStore>(sync: &UserSync<S>, payload: Value) -> Value {
  match IdentityEvent::deserialize(&payload) {
    Ok(event) => sync.sync(&event).await.log(),
    Err(e) => warn!(error = %e, "payload is not an identity event; passing through"),
  }
  payload
}

/// Handle one invocation against Postgres.
///
/// Configuration is loaded per invocation and only for signup confirmations.
/// A missing or invalid configuration is logged and the event passes through.
pub async fn invoke<F>(payload: Value, load_config: F) -> Value
where
  F: FnOnce() -> orbit_store_postgres::Result<DatabaseConfig>,
{
  debug!(event = %payload, "event received");

  if !is_signup_confirmation(&payload) {
    debug!(
      trigger = payload.get("triggerSource").and_then(serde_json::Value::as_str).unwrap_or("<none>"),
      "ignoring identity event"
    );
    return payload;
  }

  let config = match load_config() {
    Ok(config) => config,
    Err(e) => {
      error!(
        phase = e.phase(),
        error = %e,
        "database configuration unavailable; user not synced"
      );
      return payload;
    }
  };

  sync_payload(&UserSync::new(PgUserStore::new(config)), payload).await
}

fn is_signup_confirmation(payload: &Value) -> bool {
  payload.get("triggerSource").and_then(Value::as_str) == Some(POST_CONFIRMATION_SIGN_UP)
}

#[cfg(test)]
mod tests;
