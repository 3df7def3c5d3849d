//! # NovaResto Service Library
//!
//! Command layer of the NovaResto restaurant manager. A presentation layer
//! (web view, terminal, tests) holds an [`app::App`] and calls functions
//! in [`commands`].
//!
//! ## Module Organization
//! ```text
//! nova_service/
//! ├── lib.rs          ◄─── You are here (boot & logging)
//! ├── app.rs          ◄─── App handle: access checks, commit, persistence
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── restaurant.rs ◄─ Restaurant store (Mutex)
//! │   ├── session.rs  ◄─── Signed-in user (Mutex)
//! │   ├── draft.rs    ◄─── Order being composed (Mutex)
//! │   └── config.rs   ◄─── Environment configuration
//! ├── commands/       ◄─── One module per view
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Initialize Logging     RUST_LOG, default info,nova=debug           │
//! │  2. Read Configuration     NOVA_* environment variables                │
//! │  3. Open Database          SQLite, WAL, migrations                     │
//! │       • Linux: ~/.local/share/novaresto/novaresto.db                   │
//! │       • NOVA_DB_PATH overrides                                          │
//! │  4. Build Advisor          advisor.toml + NOVA_ADVISOR_* / API_KEY     │
//! │  5. App::boot              load state, restore session                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use directories::ProjectDirs;
use nova_advisor::{AdvisorConfig, GeminiAdvisor};
use nova_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{App, ServiceStatus};
use state::ConfigState;

/// Boots the service against the configured database and reports its
/// status.
pub async fn run() -> anyhow::Result<ServiceStatus> {
    init_tracing();
    info!("Starting NovaResto service");

    let config = ConfigState::from_env();
    let db_path = database_path(&config)?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path))
        .await
        .context("failed to open the state database")?;
    let db = Arc::new(db);

    let advisor = GeminiAdvisor::new(AdvisorConfig::load_or_default(None))
        .context("failed to build the advisory client")?;
    if !advisor.config().is_configured() {
        info!("Advisor API key not set; AI features will show the setup message");
    }

    let app = App::boot(config, db.clone(), Arc::new(advisor)).await;
    let status = app.status();

    db.close().await;
    Ok(status)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=nova=trace` - Show trace for nova crates only
/// - Default: INFO, with debug for nova crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nova=debug,sqlx=warn"));

    // A subscriber may already be installed (tests, embedding shells).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Resolves the database file: `NOVA_DB_PATH`, else the platform data
/// directory.
fn database_path(config: &ConfigState) -> anyhow::Result<PathBuf> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let dirs = ProjectDirs::from("com", "novaresto", "novaresto")
        .context("could not determine a data directory")?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    Ok(data_dir.join("novaresto.db"))
}
