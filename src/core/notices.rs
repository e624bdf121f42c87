use crate::backend::{Backend, Direction, Filter, Query, decode_rows};
use crate::core::forms::required;
use crate::core::scope::ScreenScope;
use crate::errors::{AppError, AppResult};
use crate::models::notice::Notice;
use crate::utils::date::iso_millis;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

pub const NOTICES_TABLE: &str = "notices";
pub const ACTIVE_NOTICES_VIEW: &str = "v_active_notices";
pub const CREATE_NOTICE_FN: &str = "create_notice_24h";

pub struct NoticesScreen<'a, B: Backend> {
    backend: &'a B,
    scope: ScreenScope,
    active_only: bool,
    notices: Vec<Notice>,
}

impl<'a, B: Backend> NoticesScreen<'a, B> {
    pub fn new(backend: &'a B, scope: ScreenScope) -> Self {
        Self {
            backend,
            scope,
            active_only: true,
            notices: Vec::new(),
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn active_only(&self) -> bool {
        self.active_only
    }

    /// Switch between the active view and every notice, then reload.
    pub async fn show_active_only(&mut self, active_only: bool) -> AppResult<&[Notice]> {
        self.active_only = active_only;
        self.load().await
    }

    pub async fn load(&mut self) -> AppResult<&[Notice]> {
        let source = if self.active_only {
            ACTIVE_NOTICES_VIEW
        } else {
            NOTICES_TABLE
        };
        let query = Query::from(source).order("created_at", Direction::Desc);
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.notices = decode_rows(rows)?;
        Ok(&self.notices)
    }

    /// Post a notice starting `now`; the procedure fixes the 24 hour window.
    pub async fn create(&mut self, title: &str, message: &str, now: DateTime<Utc>) -> AppResult<()> {
        let (title, message) = match (required(title, ""), required(message, "")) {
            (Ok(t), Ok(m)) => (t, m),
            _ => return Err(AppError::validation("Please enter a title and message")),
        };

        let args = json!({
            "p_title": title,
            "p_message": message,
            "p_image_url": Value::Null,
            "p_starts_at": iso_millis(&now),
        });

        self.scope.run(self.backend.rpc(CREATE_NOTICE_FN, args)).await?;
        self.load().await?;
        Ok(())
    }

    pub async fn delete(&mut self, id: &str) -> AppResult<()> {
        self.scope
            .run(self.backend.delete(NOTICES_TABLE, &Filter::eq("id", id)))
            .await?;
        self.load().await?;
        Ok(())
    }
}
