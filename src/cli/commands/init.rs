use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::path::Path;

/// Handle the `init` command
///
/// Writes the configuration file with defaults. An existing file is kept
/// unless `--force` is given; the backend coordinates still have to be
/// filled in afterwards (`config --edit` or the environment).
pub fn handle(cmd: &Commands, path: &Path) -> AppResult<()> {
    let Commands::Init { force } = cmd else {
        return Ok(());
    };

    info("Initializing gymdesk…");
    println!("📄 Config file : {}", path.display());

    if Config::init_all(path, *force)? {
        success(format!("Configuration written to {}", path.display()));
    } else {
        warning("Configuration file already exists (use --force to overwrite)");
    }

    let cfg = Config::load(path)?;
    if cfg.backend().is_err() {
        info("Set backend_url and anon_key with `gymdesk config --edit` before signing in.");
    }

    println!("📁 Export dir  : {}", cfg.export_path().display());
    success("gymdesk initialization completed!");
    Ok(())
}
