//! Plan assignment for one member: pick a template, a start date and
//! optional notes; list and remove the member's assignments.

use crate::backend::{Backend, Direction, Filter, Query, decode_rows};
use crate::core::forms::{optional_text, required};
use crate::core::scope::ScreenScope;
use crate::core::templates::TEMPLATES_TABLE;
use crate::errors::AppResult;
use crate::models::plan::AssignedPlan;
use crate::models::workout::WorkoutTemplate;
use crate::session::AuthContext;
use crate::utils::date;
use serde_json::json;

pub const ASSIGNMENTS_TABLE: &str = "assigned_plans";

const ASSIGNMENT_COLUMNS: &str =
    "id,member_id,template_id,start_date,end_date,notes,created_at,workout_templates(name)";

#[derive(Debug, Clone, Default)]
pub struct NewAssignment {
    pub template_id: String,
    /// `YYYY-MM-DD`; today when absent.
    pub start_date: Option<String>,
    pub notes: Option<String>,
}

pub struct AssignPlanScreen<'a, B: Backend> {
    backend: &'a B,
    scope: ScreenScope,
    ctx: &'a AuthContext,
    member_id: String,
    templates: Vec<WorkoutTemplate>,
    assignments: Vec<AssignedPlan>,
}

impl<'a, B: Backend> AssignPlanScreen<'a, B> {
    pub fn new(backend: &'a B, scope: ScreenScope, ctx: &'a AuthContext, member_id: &str) -> Self {
        Self {
            backend,
            scope,
            ctx,
            member_id: member_id.to_string(),
            templates: Vec::new(),
            assignments: Vec::new(),
        }
    }

    pub fn templates(&self) -> &[WorkoutTemplate] {
        &self.templates
    }

    pub fn assignments(&self) -> &[AssignedPlan] {
        &self.assignments
    }

    pub async fn load_templates(&mut self) -> AppResult<&[WorkoutTemplate]> {
        let query = Query::from(TEMPLATES_TABLE)
            .select("id,name")
            .order("created_at", Direction::Desc);
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.templates = decode_rows(rows)?;
        Ok(&self.templates)
    }

    /// The member's assignments with the template name embedded.
    pub async fn load_assignments(&mut self) -> AppResult<&[AssignedPlan]> {
        let query = Query::from(ASSIGNMENTS_TABLE)
            .select(ASSIGNMENT_COLUMNS)
            .eq("member_id", self.member_id.as_str())
            .order("created_at", Direction::Desc);
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.assignments = decode_rows(rows)?;
        Ok(&self.assignments)
    }

    pub async fn assign(&mut self, form: &NewAssignment) -> AppResult<()> {
        let template_id = required(&form.template_id, "Please select a template")?;
        let start = match optional_text(form.start_date.as_deref()) {
            Some(s) => date::parse_date(&s)?,
            None => date::today(),
        };

        let row = json!({
            "member_id": self.member_id,
            "template_id": template_id,
            "start_date": start.format("%Y-%m-%d").to_string(),
            "notes": optional_text(form.notes.as_deref()),
            "assigned_by": self.ctx.user_id,
        });

        self.scope.run(self.backend.insert(ASSIGNMENTS_TABLE, row)).await?;
        self.load_assignments().await?;
        Ok(())
    }

    pub async fn unassign(&mut self, assignment_id: &str) -> AppResult<()> {
        self.scope
            .run(
                self.backend
                    .delete(ASSIGNMENTS_TABLE, &Filter::eq("id", assignment_id)),
            )
            .await?;
        self.load_assignments().await?;
        Ok(())
    }
}
