//! SQL for the `users` profile mirror.
//!
//! Identifiers are unquoted, so Postgres folds `firstName` to `firstname`.
//! The statements below and any hand-written migration must agree on that.
//! `updatedAt` is cast on read so `TIMESTAMP` and `TIMESTAMPTZ` columns both
//! decode.

/// Idempotent DDL used by `--init-schema` and the integration tests.
///
/// `passwordHashed` belongs to the identity provider and is never written
/// from this crate.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    cognito_sub     TEXT PRIMARY KEY,
    email           TEXT        NOT NULL,
    firstName       TEXT        NOT NULL DEFAULT '',
    lastName        TEXT        NOT NULL DEFAULT '',
    phoneNumber     TEXT        NOT NULL DEFAULT '',
    passwordHashed  TEXT,
    createdAt       TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updatedAt       TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
)
";

/// Insert a profile, or overwrite the mutable fields of the existing row.
pub const UPSERT_USER: &str = "
INSERT INTO users (cognito_sub, firstName, lastName, phoneNumber, email, updatedAt)
VALUES ($1, $2, $3, $4, $5, CURRENT_TIMESTAMP)
ON CONFLICT (cognito_sub) DO UPDATE
SET
    firstName   = EXCLUDED.firstName,
    lastName    = EXCLUDED.lastName,
    phoneNumber = EXCLUDED.phoneNumber,
    email       = EXCLUDED.email,
    updatedAt   = CURRENT_TIMESTAMP
RETURNING cognito_sub, email, firstName, lastName, phoneNumber,
          updatedAt::timestamptz AS updatedAt
";

pub const SELECT_USER: &str = "
SELECT cognito_sub, email, firstName, lastName, phoneNumber,
       updatedAt::timestamptz AS updatedAt
FROM users
WHERE cognito_sub = $1
";
