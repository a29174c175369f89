//! # Stockbook Desktop Library
//!
//! Backend for the Stockbook desktop application: configuration, the shared
//! database state, and the boundary commands a front end calls. The
//! `stockbook` binary is a thin CLI over [`run`].
//!
//! ## Module Organization
//! ```text
//! stockbook_desktop/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap argument types + dispatch to commands
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── AppConfig (file + environment)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports, as-of parsing
//! │   ├── user.rs     ◄─── Accounts and login
//! │   ├── store.rs    ◄─── Store CRUD
//! │   ├── unit.rs     ◄─── Unit CRUD
//! │   ├── product.rs  ◄─── Product CRUD + balances listing
//! │   ├── transaction.rs ◄─ Stock movement CRUD + history
//! │   └── ledger.rs   ◄─── Single-product balance
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::ApiError;
use state::{AppConfig, DbState};
use stockbook_db::Database;

/// Parses arguments, runs one command and prints the result.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse Arguments ──────────────────────────────────────────────────► │
/// │     • --config, --db, subcommand                                        │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → stockbook.toml → STOCKBOOK_* → --db                    │
/// │                                                                         │
/// │  3. Initialize Logging ───────────────────────────────────────────────► │
/// │     • RUST_LOG wins, else config log_filter                             │
/// │     • Written to stderr so stdout stays pure JSON                       │
/// │                                                                         │
/// │  4. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Create missing tables                                             │
/// │                                                                         │
/// │  5. Execute Command ──────────────────────────────────────────────────► │
/// │     • Ok  → pretty JSON on stdout, exit 0                               │
/// │     • Err → ApiError JSON on stderr, exit 1                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            // Logging isn't up yet
            init_tracing(state::DEFAULT_LOG_FILTER);
            return report(ApiError::from(e));
        }
    };
    if let Some(path) = cli.db.clone() {
        config.database.path = Some(path);
    }

    init_tracing(&config.log_filter);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting Stockbook");

    let db = match open_database(&config).await {
        Ok(db) => db,
        Err(e) => return report(e),
    };

    let state = DbState::new(db.clone()).with_expiry_warning_days(config.inventory.expiry_warning_days);
    let result = cli::execute(&state, cli.command).await;
    db.close().await;

    match result.and_then(|value| {
        serde_json::to_string_pretty(&value).map_err(|e| ApiError::internal(e.to_string()))
    }) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

/// Opens the configured database, creating its directory if needed.
async fn open_database(config: &AppConfig) -> Result<Database, ApiError> {
    let db_config = config.db_config()?;
    let path = &db_config.database_path;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::new(
                error::ErrorCode::ConfigError,
                format!("Could not create data directory {}: {}", parent.display(), e),
            )
        })?;
    }

    info!(path = %path.display(), "Opening database");
    Ok(Database::new(db_config).await?)
}

/// Prints the error as JSON on stderr and returns a failing exit code.
fn report(err: ApiError) -> ExitCode {
    error!(code = ?err.code, message = %err.message, "Command failed");
    match serde_json::to_string(&err) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err),
    }
    ExitCode::FAILURE
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockbook=trace` - Show trace for stockbook crates only
/// - Default: the config's `log_filter`
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
