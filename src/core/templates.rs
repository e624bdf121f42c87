//! Workout template authoring: templates contain days, days contain
//! exercises. Ordering indices are whatever the caller supplies.

use crate::backend::{Backend, Direction, Query, decode_rows};
use crate::core::forms::{optional_text, parse_int, parse_optional_int, required};
use crate::core::scope::ScreenScope;
use crate::errors::{AppError, AppResult};
use crate::models::workout::{WorkoutDay, WorkoutExercise, WorkoutTemplate};
use crate::session::AuthContext;
use serde_json::json;

pub const TEMPLATES_TABLE: &str = "workout_templates";
pub const DAYS_TABLE: &str = "workout_days";
pub const EXERCISES_TABLE: &str = "workout_exercises";

#[derive(Debug, Clone, Default)]
pub struct NewTemplate {
    pub name: String,
    pub goal: Option<String>,
    pub level: Option<String>,
}

pub struct TemplateListScreen<'a, B: Backend> {
    backend: &'a B,
    scope: ScreenScope,
    ctx: &'a AuthContext,
    templates: Vec<WorkoutTemplate>,
}

impl<'a, B: Backend> TemplateListScreen<'a, B> {
    pub fn new(backend: &'a B, scope: ScreenScope, ctx: &'a AuthContext) -> Self {
        Self {
            backend,
            scope,
            ctx,
            templates: Vec::new(),
        }
    }

    pub fn templates(&self) -> &[WorkoutTemplate] {
        &self.templates
    }

    pub async fn load(&mut self) -> AppResult<&[WorkoutTemplate]> {
        let query = Query::from(TEMPLATES_TABLE).order("created_at", Direction::Desc);
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.templates = decode_rows(rows)?;
        Ok(&self.templates)
    }

    pub async fn create(&mut self, form: &NewTemplate) -> AppResult<()> {
        let name = required(&form.name, "Name is required")?;
        let row = json!({
            "name": name,
            "goal": optional_text(form.goal.as_deref()),
            "level": optional_text(form.level.as_deref()),
            "created_by": self.ctx.user_id,
        });

        self.scope.run(self.backend.insert(TEMPLATES_TABLE, row)).await?;
        self.load().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewDay {
    pub day_index: String,
    pub name: Option<String>,
}

/// Days of one template.
pub struct TemplateDetailScreen<'a, B: Backend> {
    backend: &'a B,
    scope: ScreenScope,
    template_id: String,
    days: Vec<WorkoutDay>,
}

impl<'a, B: Backend> TemplateDetailScreen<'a, B> {
    pub fn new(backend: &'a B, scope: ScreenScope, template_id: &str) -> Self {
        Self {
            backend,
            scope,
            template_id: template_id.to_string(),
            days: Vec::new(),
        }
    }

    pub fn days(&self) -> &[WorkoutDay] {
        &self.days
    }

    pub async fn load(&mut self) -> AppResult<&[WorkoutDay]> {
        let query = Query::from(DAYS_TABLE)
            .eq("template_id", self.template_id.as_str())
            .order("day_index", Direction::Asc);
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.days = decode_rows(rows)?;
        Ok(&self.days)
    }

    pub async fn add_day(&mut self, form: &NewDay) -> AppResult<()> {
        let idx = parse_int(&form.day_index, "Day index must be a number")?;
        let idx = i32::try_from(idx).map_err(|_| AppError::validation("Day index must be a number"))?;
        let row = json!({
            "template_id": self.template_id,
            "day_index": idx,
            "name": optional_text(form.name.as_deref()),
        });

        self.scope.run(self.backend.insert(DAYS_TABLE, row)).await?;
        self.load().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewExercise {
    pub name: String,
    pub muscle_group: Option<String>,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub rest_seconds: Option<String>,
    pub notes: Option<String>,
    /// Appended after the current exercises when absent.
    pub order_index: Option<String>,
}

/// Exercises of one day.
pub struct DayDetailScreen<'a, B: Backend> {
    backend: &'a B,
    scope: ScreenScope,
    day_id: String,
    exercises: Vec<WorkoutExercise>,
}

impl<'a, B: Backend> DayDetailScreen<'a, B> {
    pub fn new(backend: &'a B, scope: ScreenScope, day_id: &str) -> Self {
        Self {
            backend,
            scope,
            day_id: day_id.to_string(),
            exercises: Vec::new(),
        }
    }

    pub fn exercises(&self) -> &[WorkoutExercise] {
        &self.exercises
    }

    pub async fn load(&mut self) -> AppResult<&[WorkoutExercise]> {
        let query = Query::from(EXERCISES_TABLE)
            .eq("day_id", self.day_id.as_str())
            .order("order_index", Direction::Asc);
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.exercises = decode_rows(rows)?;
        Ok(&self.exercises)
    }

    pub async fn add_exercise(&mut self, form: &NewExercise) -> AppResult<()> {
        let name = required(&form.name, "Exercise name is required")?;
        let sets = parse_optional_int(form.sets.as_deref(), "Sets must be a number")?;
        let rest = parse_optional_int(form.rest_seconds.as_deref(), "Rest must be a number of seconds")?;
        let order = parse_optional_int(form.order_index.as_deref(), "Order index must be a number")?
            .unwrap_or(self.exercises.len() as i32);

        let row = json!({
            "day_id": self.day_id,
            "name": name,
            "muscle_group": optional_text(form.muscle_group.as_deref()),
            "sets": sets,
            "reps": optional_text(form.reps.as_deref()),
            "rest_seconds": rest,
            "notes": optional_text(form.notes.as_deref()),
            "order_index": order,
        });

        self.scope.run(self.backend.insert(EXERCISES_TABLE, row)).await?;
        self.load().await?;
        Ok(())
    }
}
