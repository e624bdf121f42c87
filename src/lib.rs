//! gymdesk library root.
//! Exposes the CLI parser, the high-level run() function, and the screen,
//! backend and export modules it is built from.

pub mod backend;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;

use clap::Parser;
use crate::cli::commands::Invocation;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::scope::ScreenScope;
use crate::errors::AppResult;
use tracing_subscriber::{EnvFilter, fmt};

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config, inv: &Invocation) -> AppResult<()> {
    match &cli.command {
        Commands::Init { .. } => cli::commands::init::handle(&cli.command, &inv.config_path),
        Commands::Config { .. } => {
            cli::commands::config::handle(&cli.command, cfg, &inv.config_path)
        }
        Commands::Login { .. } | Commands::Logout | Commands::Whoami => {
            cli::commands::auth::handle(&cli.command, cfg, inv).await
        }
        Commands::Attendance(cmd) => cli::commands::attendance::handle(cmd, cfg, inv).await,
        Commands::Members(cmd) => cli::commands::members::handle(cmd, cfg, inv).await,
        Commands::Templates(cmd) => cli::commands::templates::handle(cmd, cfg, inv).await,
        Commands::Inventory(cmd) => cli::commands::inventory::handle(cmd, cfg, inv).await,
        Commands::Notices(cmd) => cli::commands::notices::handle(cmd, cfg, inv).await,
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "gymdesk=debug,warn" } else { "warn" })
    });

    // a second init (tests driving run() twice) is harmless
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = Config::resolve_path(cli.config.as_deref());
    let cfg = Config::load(&config_path)?;
    tracing::debug!(config = %config_path.display(), "configuration loaded");

    // Ctrl-C ends the command: pending requests are dropped, nothing is applied.
    let scope = ScreenScope::new();
    let on_interrupt = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.close();
        }
    });

    let inv = Invocation { config_path, scope };
    dispatch(&cli, &cfg, &inv).await
}
