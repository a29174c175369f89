//! # Stockbook Entry Point
//!
//! ```text
//! $ stockbook products add --name Rice
//! $ stockbook transactions add --product 1 --increase 100 --date 2024-01-01
//! $ stockbook products list --as-of 2024-01-31
//! ```
//!
//! Setup and dispatch live in `lib.rs` so they can be tested.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    stockbook_desktop::run().await
}
