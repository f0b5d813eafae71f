//! Database configuration, read from `DB_*` environment variables.

use std::{collections::HashMap, fmt, path::PathBuf, time::Duration};

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::{Error, Result};

const ENV_PREFIX: &str = "DB";

fn default_port() -> u16 { 5432 }

fn default_timeout_secs() -> u64 { 5 }

/// How TLS is negotiated with the server. Names follow libpq's `sslmode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TlsMode {
  Disable,
  Allow,
  Prefer,
  /// Encrypt, but do not verify the server certificate.
  #[default]
  Require,
  VerifyCa,
  VerifyFull,
}

impl From<TlsMode> for PgSslMode {
  fn from(mode: TlsMode) -> Self {
    match mode {
      TlsMode::Disable => PgSslMode::Disable,
      TlsMode::Allow => PgSslMode::Allow,
      TlsMode::Prefer => PgSslMode::Prefer,
      TlsMode::Require => PgSslMode::Require,
      TlsMode::VerifyCa => PgSslMode::VerifyCa,
      TlsMode::VerifyFull => PgSslMode::VerifyFull,
    }
  }
}

/// Connection settings for the `users` database.
///
/// | variable | field | default |
/// |----------|-------|---------|
/// | `DB_HOST` | `host` | required |
/// | `DB_USER` | `user` | required |
/// | `DB_PASSWORD` | `password` | required |
/// | `DB_NAME` | `name` | required |
/// | `DB_PORT` | `port` | `5432` |
/// | `DB_TLS_MODE` | `tls_mode` | `require` |
/// | `DB_SSL_ROOT_CERT` | `ssl_root_cert` | none |
/// | `DB_CONNECT_TIMEOUT_SECS` | `connect_timeout_secs` | `5` |
/// | `DB_STATEMENT_TIMEOUT_SECS` | `statement_timeout_secs` | `5` |
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
  pub host:                   String,
  pub user:                   String,
  pub password:               String,
  pub name:                   String,
  #[serde(default = "default_port")]
  pub port:                   u16,
  #[serde(default)]
  pub tls_mode:               TlsMode,
  #[serde(default)]
  pub ssl_root_cert:          Option<PathBuf>,
  #[serde(default = "default_timeout_secs")]
  pub connect_timeout_secs:   u64,
  #[serde(default = "default_timeout_secs")]
  pub statement_timeout_secs: u64,
}

impl DatabaseConfig {
  /// Read the configuration from the process environment. Empty variables
  /// count as unset, so `DB_PORT=""` falls back to 5432.
  pub fn from_env() -> Result<Self> {
    Self::load(config::Environment::with_prefix(ENV_PREFIX).ignore_empty(true))
  }

  /// Read the configuration from an explicit variable map instead of the
  /// process environment. Keys use the same `DB_*` names.
  pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
    Self::load(
      config::Environment::with_prefix(ENV_PREFIX)
        .ignore_empty(true)
        .source(Some(vars)),
    )
  }

  fn load(source: config::Environment) -> Result<Self> {
    let settings = config::Config::builder().add_source(source).build()?;
    let cfg: Self = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  /// Reject settings that would let a connection attempt hang or go nowhere.
  pub fn validate(&self) -> Result<()> {
    if self.host.trim().is_empty() {
      return Err(Error::InvalidConfig("DB_HOST is empty".into()));
    }
    if self.name.trim().is_empty() {
      return Err(Error::InvalidConfig("DB_NAME is empty".into()));
    }
    if self.connect_timeout_secs == 0 {
      return Err(Error::InvalidConfig(
        "DB_CONNECT_TIMEOUT_SECS must be greater than zero".into(),
      ));
    }
    if self.statement_timeout_secs == 0 {
      return Err(Error::InvalidConfig(
        "DB_STATEMENT_TIMEOUT_SECS must be greater than zero".into(),
      ));
    }
    Ok(())
  }

  pub fn connect_timeout(&self) -> Duration {
    Duration::from_secs(self.connect_timeout_secs)
  }

  pub fn statement_timeout(&self) -> Duration {
    Duration::from_secs(self.statement_timeout_secs)
  }

  /// Build the sqlx connect options for a single connection.
  pub fn connect_options(&self) -> PgConnectOptions {
    let mut opts = PgConnectOptions::new()
      .host(&self.host)
      .port(self.port)
      .username(&self.user)
      .password(&self.password)
      .database(&self.name)
      .ssl_mode(self.tls_mode.into())
      .application_name("orbit-user-sync")
      .options([(
        "statement_timeout",
        format!("{}s", self.statement_timeout_secs),
      )]);

    if let Some(cert) = &self.ssl_root_cert {
      opts = opts.ssl_root_cert(cert);
    }
    opts
  }
}

impl fmt::Debug for DatabaseConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DatabaseConfig")
      .field("host", &self.host)
      .field("user", &self.user)
      .field("password", &"<redacted>")
      .field("name", &self.name)
      .field("port", &self.port)
      .field("tls_mode", &self.tls_mode)
      .field("ssl_root_cert", &self.ssl_root_cert)
      .field("connect_timeout_secs", &self.connect_timeout_secs)
      .field("statement_timeout_secs", &self.statement_timeout_secs)
      .finish()
  }
}
