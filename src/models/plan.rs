use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Embedded `workout_templates(name)` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateName {
    pub name: String,
}

/// A template assigned to a member over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedPlan {
    pub id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    pub template_id: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub workout_templates: Option<TemplateName>,
}

impl AssignedPlan {
    /// Template name when the embed came back, template id otherwise.
    pub fn template_label(&self) -> &str {
        match &self.workout_templates {
            Some(t) if !t.name.is_empty() => &t.name,
            _ => &self.template_id,
        }
    }

    pub fn period_label(&self) -> String {
        match self.end_date {
            Some(end) => format!("{} → {}", self.start_date, end),
            None => self.start_date.to_string(),
        }
    }
}
