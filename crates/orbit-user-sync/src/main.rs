//! user-sync binary.
//!
//! With no arguments, runs as an AWS Lambda function behind the identity
//! provider's post-confirmation trigger. Database settings come from `DB_*`
//! environment variables (see [`DatabaseConfig`]).
//!
//! # Local use
//!
//! ```sh
//! DB_HOST=localhost DB_USER=orbit DB_PASSWORD=orbit DB_NAME=orbit DB_TLS_MODE=disable \
//!   cargo run -p orbit-user-sync --bin user-sync -- --init-schema
//! cargo run -p orbit-user-sync --bin user-sync -- --event event.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use lambda_runtime::{LambdaEvent, service_fn};
use orbit_store_postgres::{DatabaseConfig, PgUserStore};
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Sync confirmed signups into the users table")]
struct Cli {
  /// Handle one event read from PATH (`-` for stdin), print the returned
  /// event and exit.
  #[arg(long, value_name = "PATH")]
  event: Option<PathBuf>,

  /// Create the `users` table if it is missing and exit.
  #[arg(long, conflicts_with = "event")]
  init_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let lambda = cli.event.is_none() && !cli.init_schema;

  // Initialise tracing. CloudWatch stamps each line itself.
  let builder = tracing_subscriber::fmt().with_env_filter(
    EnvFilter::builder()
      .with_default_directive(LevelFilter::INFO.into())
      .from_env_lossy(),
  );
  if lambda {
    builder.with_ansi(false).without_time().init();
  } else {
    builder.with_writer(std::io::stderr).init();
  }

  if cli.init_schema {
    let config = DatabaseConfig::from_env().context("failed to read DB_* configuration")?;
    PgUserStore::new(config)
      .ensure_schema()
      .await
      .context("failed to create users table")?;
    tracing::info!("users table ready");
    return Ok(());
  }

  if let Some(path) = cli.event {
    let payload = read_event(&path)?;
    let returned = orbit_user_sync::invoke(payload, DatabaseConfig::from_env).await;
    println!("{}", serde_json::to_string_pretty(&returned)?);
    return Ok(());
  }

  lambda_runtime::run(service_fn(handle_invocation))
    .await
    .map_err(|e| anyhow::anyhow!("lambda runtime error: {e}"))
}

async fn handle_invocation(
  event: LambdaEvent<Value>,
) -> Result<Value, lambda_runtime::Error> {
  let (payload, _context) = event.into_parts();
  Ok(orbit_user_sync::invoke(payload, DatabaseConfig::from_env).await)
}

/// Read an event from a file, or from stdin when `path` is `-`.
fn read_event(path: &Path) -> anyhow::Result<Value> {
  let raw = if path.as_os_str() == "-" {
    std::io::read_to_string(std::io::stdin()).context("failed to read event from stdin")?
  } else {
    std::fs::read_to_string(path)
      .with_context(|| format!("failed to read event from {path:?}"))?
  };
  serde_json::from_str(&raw).context("event is not valid JSON")
}
