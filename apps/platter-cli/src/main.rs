//! # Platter CLI Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          platter (binary)                               │
//! │                                                                         │
//! │  main.rs ────► tokio runtime, exit code                                 │
//! │                                                                         │
//! │  lib.rs ─────► argument parsing, logging, AppContext                    │
//! │                                                                         │
//! │  commands/ ──► signup, login, cart add, orders, checkout, ...           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    platter_cli::run().await
}
