//! [`PgUserStore`] — the PostgreSQL implementation of [`UserStore`].

use std::{future::Future, time::Duration};

use chrono::{DateTime, Utc};
use sqlx::{Connection as _, PgConnection};
use tracing::{debug, warn};

use orbit_core::{
  store::UserStore,
  user::{UserProfile, UserRecord},
};

use crate::{
  DatabaseConfig, Error, Result,
  schema::{SCHEMA, SELECT_USER, UPSERT_USER},
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// Row shape for `users`; column names as Postgres folds them.
#[derive(sqlx::FromRow)]
struct RawUser {
  cognito_sub: String,
  email:       String,
  #[sqlx(rename = "firstname")]
  first_name:  String,
  #[sqlx(rename = "lastname")]
  last_name:   String,
  #[sqlx(rename = "phonenumber")]
  phone_number: String,
  #[sqlx(rename = "updatedat")]
  updated_at:  DateTime<Utc>,
}

impl From<RawUser> for UserRecord {
  fn from(raw: RawUser) -> Self {
    Self {
      subject_id:   raw.cognito_sub,
      email:        raw.email,
      first_name:   raw.first_name,
      last_name:    raw.last_name,
      phone_number: raw.phone_number,
      updated_at:   raw.updated_at,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A user store backed by PostgreSQL.
///
/// Holds configuration only. Each call opens its own connection and closes it
/// before returning, on success and on failure alike.
#[derive(Debug, Clone)]
pub struct PgUserStore {
  config: DatabaseConfig,
}

impl PgUserStore {
  pub fn new(config: DatabaseConfig) -> Self { Self { config } }

  pub fn config(&self) -> &DatabaseConfig { &self.config }

  /// Create the `users` table if it does not exist yet.
  pub async fn ensure_schema(&self) -> Result<()> {
    let mut conn = self.connect().await?;
    let result = timed(
      self.config.statement_timeout(),
      sqlx::raw_sql(SCHEMA).execute(&mut conn),
    )
    .await;
    release(conn).await;
    result.map(|_| ())
  }

  /// Open a connection, bounded by the configured connect timeout.
  pub(crate) async fn connect(&self) -> Result<PgConnection> {
    let limit = self.config.connect_timeout();
    let opts = self.config.connect_options();

    debug!(
      host = %self.config.host,
      port = self.config.port,
      database = %self.config.name,
      "connecting to database"
    );
    match tokio::time::timeout(limit, PgConnection::connect_with(&opts)).await {
      Ok(Ok(conn)) => Ok(conn),
      Ok(Err(e)) => Err(Error::Connect(e)),
      Err(_) => Err(Error::ConnectTimeout(limit)),
    }
  }
}

/// Bound a query future by `limit`, mapping both failure kinds.
async fn timed<T>(
  limit: Duration,
  query: impl Future<Output = Result<T, sqlx::Error>>,
) -> Result<T> {
  match tokio::time::timeout(limit, query).await {
    Ok(Ok(value)) => Ok(value),
    Ok(Err(e)) => Err(Error::Query(e)),
    Err(_) => Err(Error::QueryTimeout(limit)),
  }
}

/// Close a connection. Failures are logged and swallowed.
pub(crate) async fn release(conn: PgConnection) {
  if let Err(e) = conn.close().await {
    warn!(error = %e, "failed to close database connection");
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for PgUserStore {
  type Error = Error;

  #[tracing::instrument(name = "db.upsert_user", skip_all, fields(subject_id = %profile.subject_id))]
  async fn upsert_user(&self, profile: &UserProfile) -> Result<UserRecord> {
    let mut conn = self.connect().await?;

    // No `?` until the connection is released.
    let result = timed(
      self.config.statement_timeout(),
      sqlx::query_as::<_, RawUser>(UPSERT_USER)
        .bind(&profile.subject_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone_number)
        .bind(&profile.email)
        .fetch_one(&mut conn),
    )
    .await;
    release(conn).await;

    result.map(UserRecord::from)
  }

  #[tracing::instrument(name = "db.get_user", skip(self))]
  async fn get_user(&self, subject_id: &str) -> Result<Option<UserRecord>> {
    let mut conn = self.connect().await?;

    let result = timed(
      self.config.statement_timeout(),
      sqlx::query_as::<_, RawUser>(SELECT_USER)
        .bind(subject_id)
        .fetch_optional(&mut conn),
    )
    .await;
    release(conn).await;

    result.map(|row| row.map(UserRecord::from))
  }
}
