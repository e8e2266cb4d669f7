//! ecodnp-db binary.
//!
//! Reads `DATABASE_URL` / `SQLITE_DBS_LOCATION` from the environment, opens
//! the selected store and creates any missing tables.
//!
//! ```
//! cargo run -p ecodnp-db -- sync
//! cargo run -p ecodnp-db -- schema
//! ```

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use ecodnp_db::{DatabaseConfig, Schema};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "ecodnp database bootstrap")]
struct Cli {
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Connect to the configured database and create missing tables (default).
  Sync,
  /// Print the table descriptors as JSON and exit.
  Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command.unwrap_or(Command::Sync) {
    Command::Schema => {
      let json = serde_json::to_string_pretty(&Schema::new())
        .context("failed to serialise schema")?;
      println!("{json}");
    }
    Command::Sync => {
      let config = DatabaseConfig::from_env().context("failed to read database configuration")?;
      let db = ecodnp_db::connect(&config)
        .await
        .context("failed to open database")?;

      for table in db.schema().tables() {
        tracing::info!(backend = db.backend_name(), table = table.name, "table ready");
      }
    }
  }

  Ok(())
}
