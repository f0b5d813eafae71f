//! Error types for `orbit-core`.

use thiserror::Error;

/// Reasons an identity event cannot be turned into a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("userAttributes is missing from the event")]
  MissingAttributes,

  #[error("subject id (userAttributes.sub) is missing")]
  MissingSubject,

  #[error("email (userAttributes.email) is missing")]
  MissingEmail,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
