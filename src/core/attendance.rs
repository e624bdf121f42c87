//! Front-desk attendance panel: recent sessions, the rotating check-in token
//! of one location, and the two artifacts derived from them (CSV export and
//! the QR poster).

use crate::backend::{Backend, Direction, Query, decode_rows, maybe_single};
use crate::config::Config;
use crate::core::scope::ScreenScope;
use crate::errors::{AppError, AppResult};
use crate::export::poster::{self, Poster};
use crate::export::qr::QrImage;
use crate::export::{PosterFormat, ShareOutcome, Sharer, csv, ensure_export_dir, timestamped_name};
use crate::models::attendance::{AttendanceSession, LocationToken};
use chrono::{DateTime, Local, Utc};
use serde_json::{Value, json};
use std::path::Path;
use tracing::{info, warn};

pub const SESSIONS_VIEW: &str = "v_attendance_sessions";
pub const LOCATIONS_TABLE: &str = "attendance_locations";
pub const ROTATE_FN: &str = "rotate_location_token";
pub const DEFAULT_SESSION_LIMIT: usize = 30;

/// What the panel shows for the location's token. Only a confirmed server
/// value ever moves it to `Loaded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    Unloaded,
    Loaded(String),
}

impl TokenState {
    pub fn current(&self) -> Option<&str> {
        match self {
            TokenState::Loaded(t) => Some(t),
            TokenState::Unloaded => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotateOutcome {
    /// Token displayed after the rotation, if the location has one.
    pub token: Option<String>,
    /// The procedure did not return the new value and the row was re-read.
    pub refetched: bool,
    /// Why that re-read failed. The rotation itself still went through.
    pub refetch_error: Option<String>,
}

/// `new_token` from whatever shape the rotate procedure answered with:
/// a set of rows, a single row, or the bare value.
pub fn extract_new_token(resp: &Value) -> Option<String> {
    let token = match resp {
        Value::Array(rows) => rows.first().and_then(|r| r.get("new_token")),
        Value::Object(_) => resp.get("new_token"),
        Value::String(_) => Some(resp),
        _ => None,
    };
    token
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn token_state(row: Option<LocationToken>) -> TokenState {
    match row.and_then(|r| r.current_token).filter(|t| !t.is_empty()) {
        Some(t) => TokenState::Loaded(t),
        None => TokenState::Unloaded,
    }
}

pub struct AttendancePanel<'a, B: Backend> {
    backend: &'a B,
    scope: ScreenScope,
    location_name: String,
    gym_name: String,
    limit: usize,
    sessions: Vec<AttendanceSession>,
    token: TokenState,
}

impl<'a, B: Backend> AttendancePanel<'a, B> {
    pub fn new(backend: &'a B, scope: ScreenScope, location_name: &str, gym_name: &str) -> Self {
        Self {
            backend,
            scope,
            location_name: location_name.to_string(),
            gym_name: gym_name.to_string(),
            limit: DEFAULT_SESSION_LIMIT,
            sessions: Vec::new(),
            token: TokenState::Unloaded,
        }
    }

    pub fn from_config(backend: &'a B, scope: ScreenScope, cfg: &Config) -> Self {
        Self::new(backend, scope, &cfg.location_name, &cfg.gym_name).with_limit(cfg.sessions_limit)
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn sessions(&self) -> &[AttendanceSession] {
        &self.sessions
    }

    pub fn token(&self) -> &TokenState {
        &self.token
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    /// Most recent sessions, newest check-in first. Replaces the list
    /// wholesale; on failure the previous list stays.
    pub async fn fetch_sessions(&mut self) -> AppResult<&[AttendanceSession]> {
        let query = self.sessions_query();
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.sessions = decode_rows(rows)?;
        Ok(&self.sessions)
    }

    /// Current token of the location. No row, or a row without a token,
    /// means "no token" rather than an error.
    pub async fn fetch_token(&mut self) -> AppResult<Option<&str>> {
        let query = self.token_query();
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.token = token_state(maybe_single(rows)?);
        Ok(self.token.current())
    }

    /// Both loads of an opened panel, issued together. Each half is applied
    /// on its own success; the first error is returned.
    pub async fn mount(&mut self) -> AppResult<()> {
        let sessions_query = self.sessions_query();
        let token_query = self.token_query();
        let (sessions, token) = tokio::join!(
            self.scope.run(self.backend.select(&sessions_query)),
            self.scope.run(self.backend.select(&token_query)),
        );

        let sessions = sessions
            .and_then(decode_rows::<AttendanceSession>)
            .map(|list| self.sessions = list);
        let token = token
            .and_then(maybe_single::<LocationToken>)
            .map(|row| self.token = token_state(row));
        sessions.and(token)
    }

    fn sessions_query(&self) -> Query {
        Query::from(SESSIONS_VIEW)
            .order("check_in_at", Direction::Desc)
            .limit(self.limit)
    }

    fn token_query(&self) -> Query {
        Query::from(LOCATIONS_TABLE)
            .select("id,name,current_token")
            .eq("name", self.location_name.as_str())
    }

    async fn location_id(&self) -> AppResult<String> {
        let query = Query::from(LOCATIONS_TABLE)
            .select("id")
            .eq("name", self.location_name.as_str());
        let rows = self.scope.run(self.backend.select(&query)).await?;
        let row: Option<LocationToken> = maybe_single(rows)?;
        row.map(|r| r.id)
            .ok_or_else(|| AppError::LocationNotFound(self.location_name.clone()))
    }

    /// Replace the location's token server-side. The displayed token only
    /// changes once the server has confirmed; any failure leaves it as is.
    /// Once the procedure has succeeded the rotation is reported even if the
    /// token cannot be re-read.
    pub async fn rotate_token(&mut self) -> AppResult<RotateOutcome> {
        let id = self.location_id().await?;
        let resp = self
            .scope
            .run(self.backend.rpc(ROTATE_FN, json!({ "p_location_id": id })))
            .await?;

        let outcome = match extract_new_token(&resp) {
            Some(token) => {
                self.token = TokenState::Loaded(token.clone());
                RotateOutcome {
                    token: Some(token),
                    refetched: false,
                    refetch_error: None,
                }
            }
            None => match self.fetch_token().await.map(|t| t.map(str::to_string)) {
                Ok(token) => RotateOutcome {
                    token,
                    refetched: true,
                    refetch_error: None,
                },
                Err(AppError::Cancelled) => return Err(AppError::Cancelled),
                Err(e) => {
                    warn!(location = %self.location_name, error = %e, "token re-read after rotation failed");
                    RotateOutcome {
                        token: self.token.current().map(str::to_string),
                        refetched: true,
                        refetch_error: Some(e.to_string()),
                    }
                }
            },
        };

        info!(location = %self.location_name, refetched = outcome.refetched, "token rotated");
        Ok(outcome)
    }

    /// Write the displayed sessions (not a fresh fetch) to a timestamped CSV
    /// in `dir` and hand it to `sharer`.
    pub fn export_csv(&self, dir: &Path, sharer: &Sharer, now: DateTime<Utc>) -> AppResult<ShareOutcome> {
        if self.sessions.is_empty() {
            return Err(AppError::NoData);
        }

        ensure_export_dir(dir)?;
        let path = dir.join(timestamped_name("attendance", "csv", now));
        csv::write_sessions_csv(&path, &self.sessions)?;
        info!(file = %path.display(), rows = self.sessions.len(), "attendance CSV written");

        Ok(sharer.share(&path, "text/csv", "Export Attendance CSV"))
    }

    /// Poster content for the current token; `MissingQr` without one.
    pub fn poster(&self, now: DateTime<Utc>) -> AppResult<Poster> {
        let token = self.token.current().ok_or(AppError::MissingQr)?;
        let qr = QrImage::render(token)?;

        Ok(Poster {
            gym_name: self.gym_name.clone(),
            location_name: self.location_name.clone(),
            printed_on: now.with_timezone(&Local).format("%Y-%m-%d").to_string(),
            qr,
        })
    }

    /// Render the check-in poster and hand it to `sharer`. Nothing touches
    /// the file system until the QR code exists.
    pub fn generate_poster(
        &self,
        dir: &Path,
        format: PosterFormat,
        sharer: &Sharer,
        now: DateTime<Utc>,
    ) -> AppResult<ShareOutcome> {
        let content = self.poster(now)?;

        ensure_export_dir(dir)?;
        let path = dir.join(timestamped_name("poster", format.extension(), now));
        match format {
            PosterFormat::Pdf => poster::write_pdf(&path, &content)?,
            PosterFormat::Html => poster::write_html(&path, &content)?,
        }
        info!(file = %path.display(), "poster written");

        Ok(sharer.share(&path, format.mime(), "Share QR Poster"))
    }
}
