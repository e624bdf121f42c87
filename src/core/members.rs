use crate::backend::{Backend, Direction, Filter, Query, decode_rows};
use crate::core::forms::{optional_text, required};
use crate::core::scope::ScreenScope;
use crate::errors::{AppError, AppResult};
use crate::models::member::{Member, MemberStatus};
use crate::session::AuthContext;
use serde_json::json;

pub const MEMBERS_TABLE: &str = "members";

#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub struct MembersScreen<'a, B: Backend> {
    backend: &'a B,
    scope: ScreenScope,
    ctx: &'a AuthContext,
    members: Vec<Member>,
}

impl<'a, B: Backend> MembersScreen<'a, B> {
    pub fn new(backend: &'a B, scope: ScreenScope, ctx: &'a AuthContext) -> Self {
        Self {
            backend,
            scope,
            ctx,
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn find(&self, id: &str) -> AppResult<&Member> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound(format!("member {id}")))
    }

    /// Newest members first.
    pub async fn load(&mut self) -> AppResult<&[Member]> {
        let query = Query::from(MEMBERS_TABLE).order("created_at", Direction::Desc);
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.members = decode_rows(rows)?;
        Ok(&self.members)
    }

    pub async fn create(&mut self, form: &NewMember) -> AppResult<()> {
        let full_name = required(&form.full_name, "Full name is required")?;
        let row = json!({
            "full_name": full_name,
            "phone": optional_text(form.phone.as_deref()),
            "email": optional_text(form.email.as_deref()),
            "status": MemberStatus::Active.to_db_str(),
            "created_by": self.ctx.user_id,
        });

        self.scope.run(self.backend.insert(MEMBERS_TABLE, row)).await?;
        self.load().await?;
        Ok(())
    }

    /// Flip active ⇄ inactive. Returns the status that was written.
    pub async fn toggle_status(&mut self, id: &str) -> AppResult<MemberStatus> {
        let next = self.find(id)?.status.toggled();
        self.scope
            .run(self.backend.update(
                MEMBERS_TABLE,
                &Filter::eq("id", id),
                json!({ "status": next.to_db_str() }),
            ))
            .await?;
        self.load().await?;
        Ok(next)
    }

    pub async fn delete(&mut self, id: &str) -> AppResult<()> {
        self.scope
            .run(self.backend.delete(MEMBERS_TABLE, &Filter::eq("id", id)))
            .await?;
        self.load().await?;
        Ok(())
    }
}
