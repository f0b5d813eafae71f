//! Tests for the raw-payload entry points.

use std::{
  collections::HashMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  },
};

use chrono::Utc;
use orbit_core::{
  store::{StoreError, UserStore},
  sync::UserSync,
  user::{UserProfile, UserRecord},
};
use orbit_store_postgres::{DatabaseConfig, Error, PgUserStore};
use serde_json::{Value, json};

use crate::{invoke, sync_payload};

// ─── Test store ──────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("never fails")]
struct NeverFails;

impl StoreError for NeverFails {
  fn phase(&self) -> &'static str { "query" }
}

/// Records every profile it is asked to write.
#[derive(Default)]
struct RecordingStore {
  written: Mutex<Vec<UserProfile>>,
}

impl RecordingStore {
  fn written(&self) -> Vec<UserProfile> { self.written.lock().unwrap().clone() }
}

impl UserStore for RecordingStore {
  type Error = NeverFails;

  async fn upsert_user(&self, profile: &UserProfile) -> Result<UserRecord, NeverFails> {
    self.written.lock().unwrap().push(profile.clone());
    Ok(UserRecord {
      subject_id:   profile.subject_id.clone(),
      email:        profile.email.clone(),
      first_name:   profile.first_name.clone(),
      last_name:    profile.last_name.clone(),
      phone_number: profile.phone_number.clone(),
      updated_at:   Utc::now(),
    })
  }

  async fn get_user(&self, _subject_id: &str) -> Result<Option<UserRecord>, NeverFails> {
    Ok(None)
  }
}

// ─── Payloads ────────────────────────────────────────────────────────────────

fn signup_payload() -> Value {
  json!({
    "version": "1",
    "region": "us-east-1",
    "userPoolId": "us-east-1_Example",
    "userName": "abc-123",
    "triggerSource": "PostConfirmation_ConfirmSignUp",
    "request": {
      "userAttributes": {
        "sub": "abc-123",
        "email": "a@b.com",
        "given_name": "Ann",
        "family_name": "Lee"
      }
    },
    "response": {}
  })
}

fn unreachable_config() -> orbit_store_postgres::Result<DatabaseConfig> {
  let vars: HashMap<String, String> = [
    ("DB_HOST", "127.0.0.1"),
    ("DB_USER", "orbit"),
    ("DB_PASSWORD", "orbit"),
    ("DB_NAME", "orbit"),
    ("DB_PORT", "1"),
    ("DB_TLS_MODE", "disable"),
    ("DB_CONNECT_TIMEOUT_SECS", "1"),
  ]
  .into_iter()
  .map(|(k, v)| (k.to_owned(), v.to_owned()))
  .collect();
  DatabaseConfig::from_vars(vars)
}

#[tokio::test]
async fn other_triggers_never_load_config() {
  let loaded = AtomicBool::new(false);
  let mut payload = signup_payload();
  payload["triggerSource"] = json!("TokenGeneration");

  let returned = invoke(payload.clone(), || {
    loaded.store(true, Ordering::SeqCst);
    unreachable_config()
  })
  .await;

  assert_eq!(returned, payload);
  assert!(!loaded.load(Ordering::SeqCst));
}

#[tokio::test]
async fn missing_config_passes_event_through() {
  let payload = signup_payload();
  let returned = invoke(payload.clone(), || {
    Err(Error::InvalidConfig("DB_HOST is empty".into()))
  })
  .await;
  assert_eq!(returned, payload);
}

#[tokio::test]
async fn unreachable_database_passes_event_through() {
  let payload = signup_payload();
  let returned = invoke(payload.clone(), unreachable_config).await;
  assert_eq!(returned, payload);
}

#[tokio::test]
async fn non_string_attribute_still_syncs() {
  let sync = UserSync::new(RecordingStore::default());

  let mut payload = signup_payload();
  payload["request"]["userAttributes"]["custom:age"] = json!(42);
  payload["request"]["userAttributes"]["given_name"] = Value::Null;
  assert_eq!(sync_payload(&sync, payload.clone()).await, payload);

  let written = sync.store().written();
  assert_eq!(written.len(), 1);
  assert_eq!(written[0].subject_id, "abc-123");
  assert_eq!(written[0].email, "a@b.com");
  assert_eq!(written[0].first_name, "");
  assert_eq!(written[0].last_name, "Lee");
}

#[tokio::test]
async fn non_event_payload_is_returned_verbatim() {
  let sync = UserSync::new(RecordingStore::default());

  let not_an_event = json!(["PostConfirmation_ConfirmSignUp"]);
  assert_eq!(sync_payload(&sync, not_an_event.clone()).await, not_an_event);
  assert!(sync.store().written().is_empty());
}

#[tokio::test]
async fn null_attributes_survive_round_trip() {
  let sync = UserSync::new(PgUserStore::new(unreachable_config().unwrap()));

  let mut payload = signup_payload();
  payload["request"]["userAttributes"] = Value::Null;
  assert_eq!(sync_payload(&sync, payload.clone()).await, payload);
}
