//! One handler per command group. Every handler that talks to the backend
//! goes through [`connect`], which restores (and if needed refreshes) the
//! stored session first.

pub mod attendance;
pub mod auth;
pub mod config;
pub mod init;
pub mod inventory;
pub mod members;
pub mod notices;
pub mod templates;

use crate::backend::auth::AuthClient;
use crate::backend::rest::RestBackend;
use crate::config::Config;
use crate::core::scope::ScreenScope;
use crate::errors::AppResult;
use crate::export::{ShareOutcome, Sharer};
use crate::session::{AuthContext, SessionGate, SessionStore};
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;
use std::path::PathBuf;

/// What every handler receives besides its own arguments.
pub struct Invocation {
    pub config_path: PathBuf,
    pub scope: ScreenScope,
}

pub(crate) struct Connection {
    pub backend: RestBackend,
    pub ctx: AuthContext,
}

pub(crate) fn session_gate(cfg: &Config, inv: &Invocation) -> AppResult<SessionGate<AuthClient>> {
    let store = SessionStore::new(Config::session_file(&inv.config_path));
    Ok(SessionGate::new(store, AuthClient::new(cfg)?))
}

pub(crate) async fn connect(cfg: &Config, inv: &Invocation) -> AppResult<Connection> {
    let gate = session_gate(cfg, inv)?;
    let session = inv.scope.run(gate.require()).await?;
    let backend = RestBackend::new(cfg, &session.access_token)?;
    Ok(Connection {
        backend,
        ctx: session.context(),
    })
}

pub(crate) fn sharer(cfg: &Config) -> Sharer {
    Sharer::new(cfg.share_command.clone())
}

/// `--dir` when given, the configured export directory otherwise.
pub(crate) fn output_dir(dir: &Option<String>, cfg: &Config) -> PathBuf {
    match dir {
        Some(d) => expand_tilde(d),
        None => cfg.export_path(),
    }
}

/// The writers already announced the file; only the hand-off is reported.
pub(crate) fn report_artifact(label: &str, outcome: &ShareOutcome) {
    match outcome {
        ShareOutcome::Shared(path) => success(format!("{label} shared: {}", path.display())),
        ShareOutcome::Saved(path) => info(format!("{label} kept at {}", path.display())),
    }
}

/// `-` for absent optional columns.
pub(crate) fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
