//! Session gate.
//!
//! On launch the gate restores the persisted session, refreshing it when the
//! access token has expired, and hands screens an explicit [`AuthContext`].
//! Every change (sign-in, refresh, sign-out) is published on a watch channel
//! so interested components can react to it.

use crate::backend::auth::AuthApi;
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{info, warn};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds
    pub expires_at: i64,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired(&self, now: i64) -> bool {
        now + EXPIRY_MARGIN_SECS >= self.expires_at
    }

    pub fn context(&self) -> AuthContext {
        AuthContext {
            user_id: self.user.id.clone(),
            email: self.user.email.clone(),
        }
    }
}

/// Who is acting. Passed explicitly to every screen that records an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub email: Option<String>,
}

impl AuthContext {
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.user_id)
    }
}

/// JSON file holding the current session.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AppResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&content)
            .map_err(|e| AppError::Session(format!("corrupt session file: {e}")))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    pub fn clear(&self) -> AppResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

pub struct SessionGate<A: AuthApi> {
    store: SessionStore,
    auth: A,
    tx: watch::Sender<Option<AuthContext>>,
}

impl<A: AuthApi> SessionGate<A> {
    pub fn new(store: SessionStore, auth: A) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { store, auth, tx }
    }

    /// Session-change notifications: the latest context, `None` when signed out.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthContext>> {
        self.tx.subscribe()
    }

    fn publish(&self, session: Option<&Session>) {
        self.tx.send_replace(session.map(Session::context));
    }

    /// Existing session, refreshed if needed. `None` means "show the login".
    pub async fn restore(&self) -> AppResult<Option<Session>> {
        let Some(session) = self.store.load()? else {
            self.publish(None);
            return Ok(None);
        };

        if !session.is_expired(Utc::now().timestamp()) {
            self.publish(Some(&session));
            return Ok(Some(session));
        }

        match self.auth.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                self.store.save(&fresh)?;
                info!(user = %fresh.user.id, "session refreshed");
                self.publish(Some(&fresh));
                Ok(Some(fresh))
            }
            Err(e) => {
                warn!(error = %e, "session refresh failed, signing out locally");
                self.store.clear()?;
                self.publish(None);
                Ok(None)
            }
        }
    }

    /// Like [`restore`](Self::restore), but a missing session is an error.
    pub async fn require(&self) -> AppResult<Session> {
        self.restore().await?.ok_or(AppError::NotSignedIn)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let session = self.auth.sign_in_with_password(email, password).await?;
        self.store.save(&session)?;
        info!(user = %session.user.id, "signed in");
        self.publish(Some(&session));
        Ok(session)
    }

    /// Revokes the token server-side when possible; the local session is
    /// dropped either way.
    pub async fn sign_out(&self) -> AppResult<bool> {
        let Some(session) = self.store.load()? else {
            self.publish(None);
            return Ok(false);
        };

        if let Err(e) = self.auth.sign_out(&session.access_token).await {
            warn!(error = %e, "server-side sign-out failed");
        }
        self.store.clear()?;
        info!(user = %session.user.id, "signed out");
        self.publish(None);
        Ok(true)
    }
}
