//! Identity-provider lifecycle events.
//!
//! Only the fields the handler reads are typed. Everything else in the
//! provider envelope (`version`, `region`, `userPoolId`, `callerContext`,
//! `response`, …) is kept in `extra` maps so the event can be handed back
//! exactly as it arrived.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Trigger ─────────────────────────────────────────────────────────────────

/// The trigger tag for a confirmed signup.
pub const POST_CONFIRMATION_SIGN_UP: &str = "PostConfirmation_ConfirmSignUp";

/// The trigger tag for a confirmed password reset.
pub const POST_CONFIRMATION_FORGOT_PASSWORD: &str =
  "PostConfirmation_ConfirmForgotPassword";

/// Which lifecycle action fired the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerSource {
  /// A new account finished signup confirmation. The only handled kind.
  ConfirmSignUp,
  /// An existing account confirmed a password reset.
  ConfirmForgotPassword,
  /// Any other tag, kept verbatim.
  Other(String),
}

impl TriggerSource {
  pub fn as_str(&self) -> &str {
    match self {
      TriggerSource::ConfirmSignUp => POST_CONFIRMATION_SIGN_UP,
      TriggerSource::ConfirmForgotPassword => POST_CONFIRMATION_FORGOT_PASSWORD,
      TriggerSource::Other(tag) => tag,
    }
  }
}

impl From<&str> for TriggerSource {
  fn from(tag: &str) -> Self {
    match tag {
      POST_CONFIRMATION_SIGN_UP => TriggerSource::ConfirmSignUp,
      POST_CONFIRMATION_FORGOT_PASSWORD => TriggerSource::ConfirmForgotPassword,
      other => TriggerSource::Other(other.to_owned()),
    }
  }
}

impl fmt::Display for TriggerSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Attribute name to value, as supplied by the provider.
///
/// Values are kept as raw JSON so a `null` or non-string value in one
/// attribute does not make the whole event unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAttributes(BTreeMap<String, Value>);

impl UserAttributes {
  /// Look up an attribute. Only non-empty strings count as present.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .0
      .get(name)
      .and_then(Value::as_str)
      .filter(|value| !value.is_empty())
  }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.0.insert(name.into(), Value::String(value.into()));
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K, V> FromIterator<(K, V)> for UserAttributes
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect(),
    )
  }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// The `request` section of an [`IdentityEvent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_attributes: Option<UserAttributes>,
  /// `clientMetadata` and anything else the provider adds.
  #[serde(flatten)]
  pub extra:           Map<String, Value>,
}

/// An inbound notification describing a lifecycle action taken by the
/// identity provider on a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityEvent {
  pub trigger_source: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub request:        Option<EventRequest>,
  #[serde(flatten)]
  pub extra:          Map<String, Value>,
}

impl IdentityEvent {
  /// Build a bare event with the given trigger and attributes.
  pub fn new(
    trigger_source: impl Into<String>,
    user_attributes: Option<UserAttributes>,
  ) -> Self {
    Self {
      trigger_source: trigger_source.into(),
      request:        Some(EventRequest {
        user_attributes,
        extra: Map::new(),
      }),
      extra:          Map::new(),
    }
  }

  pub fn trigger(&self) -> TriggerSource {
    TriggerSource::from(self.trigger_source.as_str())
  }

  pub fn is_signup_confirmation(&self) -> bool {
    self.trigger() == TriggerSource::ConfirmSignUp
  }

  pub fn user_attributes(&self) -> Option<&UserAttributes> {
    self.request.as_ref()?.user_attributes.as_ref()
  }

  /// `userName` from the envelope, if the provider sent one.
  pub fn user_name(&self) -> Option<&str> {
    self.extra.get("userName").and_then(Value::as_str)
  }
}
