//! User profile types.
//!
//! The synced `users` table is a profile mirror of the identity provider's
//! account. Credentials stay with the provider, so none of these types has a
//! password field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, event::UserAttributes};

/// Attribute names read from the provider.
pub mod attr {
  pub const SUB: &str = "sub";
  pub const EMAIL: &str = "email";
  pub const GIVEN_NAME: &str = "given_name";
  pub const FAMILY_NAME: &str = "family_name";
  pub const PHONE_NUMBER: &str = "phone_number";
}

/// A validated profile ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub subject_id:   String,
  pub email:        String,
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
}

impl UserProfile {
  /// Extract a profile from provider attributes.
  ///
  /// `sub` and `email` are required; names and phone default to `""`. The
  /// subject is checked before the email.
  pub fn from_attributes(attrs: &UserAttributes) -> Result<Self> {
    let subject_id = attrs.get(attr::SUB).ok_or(Error::MissingSubject)?;
    let email = attrs.get(attr::EMAIL).ok_or(Error::MissingEmail)?;
    let optional = |name| attrs.get(name).unwrap_or_default().to_owned();

    Ok(Self {
      subject_id:   subject_id.to_owned(),
      email:        email.to_owned(),
      first_name:   optional(attr::GIVEN_NAME),
      last_name:    optional(attr::FAMILY_NAME),
      phone_number: optional(attr::PHONE_NUMBER),
    })
  }
}

/// One persisted row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
  pub subject_id:   String,
  pub email:        String,
  pub first_name:   String,
  pub last_name:    String,
  pub phone_number: String,
  /// Server time of the most recent upsert.
  pub updated_at:   DateTime<Utc>,
}

impl UserRecord {
  /// Whether the mutable fields match `profile`.
  pub fn matches(&self, profile: &UserProfile) -> bool {
    self.subject_id == profile.subject_id
      && self.email == profile.email
      && self.first_name == profile.first_name
      && self.last_name == profile.last_name
      && self.phone_number == profile.phone_number
  }
}
