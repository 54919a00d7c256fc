//! # KawUZ Storefront Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KawUZ Storefront                                 │
//! │                                                                         │
//! │  main.rs ────► parses Args, starts the tokio runtime                    │
//! │  lib.rs ─────► logging, config, Storefront::connect, shell loop         │
//! │                                │                                        │
//! │                                ▼                                        │
//! │              REST backend (http://localhost:8080/api)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The actual setup is in lib.rs for better testability
    kawuz_storefront::run(kawuz_storefront::Args::parse()).await
}
