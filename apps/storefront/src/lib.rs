//! # KawUZ Storefront Library
//!
//! Terminal front end for the KawUZ storefront: argument parsing, logging
//! setup, and the interactive shell.
//!
//! ## Module Organization
//! ```text
//! kawuz_storefront/
//! ├── lib.rs          ◄─── You are here (startup & shell loop)
//! ├── commands.rs     ◄─── Shell line → ShellCommand → Storefront operation
//! └── render.rs       ◄─── AppState snapshot → text view, terminal ThemeSink
//! ```
//!
//! Logs go to stderr so they never interleave with the rendered view on
//! stdout.

pub mod commands;
pub mod render;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kawuz_client::{ClientConfig, Storefront};

use crate::commands::{execute, parse_line, Outcome};
use crate::render::{Renderer, TerminalThemeSink};

/// Process arguments.
#[derive(Debug, Parser)]
#[command(name = "kawuz-storefront", version, about = "KawUZ coffee storefront")]
pub struct Args {
    /// Config file (default: platform config dir / storefront.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides config and KAWUZ_BASE_URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log filter, overrides RUST_LOG
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Plain output without ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

/// Runs the storefront shell until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, stderr                        │
/// │     • Default: info,kawuz=debug; RUST_LOG or --log-filter override      │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults < storefront.toml < KAWUZ_* env < --base-url             │
/// │                                                                         │
/// │  3. Connect Storefront ───────────────────────────────────────────────► │
/// │     • reqwest client with cookie jar, theme file                        │
/// │                                                                         │
/// │  4. start() ──────────────────────────────────────────────────────────► │
/// │     • restore theme, identity check, load products and best sellers     │
/// │                                                                         │
/// │  5. Shell Loop ───────────────────────────────────────────────────────► │
/// │     • read line, parse, execute, render                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(args.log_filter.as_deref());

    info!("Starting KawUZ storefront");

    let mut config = ClientConfig::load(args.config.clone())?;
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }
    info!(base_url = %config.api.base_url, "Configuration loaded");

    let colors = !args.no_color;
    let renderer = Renderer::new(config.ui.currency_suffix.clone()).with_colors(colors);
    let store = Storefront::connect(config, Arc::new(TerminalThemeSink::new(colors)))?;

    store.start().await;
    shell(&store, &renderer).await?;

    info!("Storefront closed");
    Ok(())
}

async fn shell(store: &Storefront, renderer: &Renderer) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_view(&mut stdout, store, renderer).await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            print_view(&mut stdout, store, renderer).await?;
            continue;
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            // clap's own rendering covers help and usage errors
            Err(e) => {
                stdout.write_all(e.render().to_string().as_bytes()).await?;
                prompt(&mut stdout).await?;
                continue;
            }
        };

        match execute(store, command).await {
            Outcome::Quit => break,
            Outcome::Print(text) => {
                stdout.write_all(format!("{}\n", text).as_bytes()).await?;
                print_view(&mut stdout, store, renderer).await?;
            }
            Outcome::Render => print_view(&mut stdout, store, renderer).await?,
        }
    }
    Ok(())
}

async fn print_view(
    stdout: &mut tokio::io::Stdout,
    store: &Storefront,
    renderer: &Renderer,
) -> std::io::Result<()> {
    let state = store.snapshot().await;
    let captcha = store.captcha_question().await;
    stdout
        .write_all(renderer.render(&state, &captcha).as_bytes())
        .await?;
    prompt(stdout).await
}

async fn prompt(stdout: &mut tokio::io::Stdout) -> std::io::Result<()> {
    stdout.write_all(b"> ").await?;
    stdout.flush().await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kawuz_client=trace` - Trace for the client crate only
/// - Default: `info,kawuz=debug`
fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|e| {
            eprintln!("Invalid --log-filter ({}), using defaults", e);
            default_filter()
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()),
    };

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        warn!("Tracing subscriber already installed");
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::new("info,kawuz=debug")
}
