use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub id: String,
    #[serde(default)]
    pub template_id: Option<String>,
    pub day_index: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WorkoutDay {
    pub fn label(&self) -> String {
        match &self.name {
            Some(n) if !n.is_empty() => n.clone(),
            _ => format!("Day {}", self.day_index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: String,
    #[serde(default)]
    pub day_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub sets: Option<i32>,
    #[serde(default)]
    pub reps: Option<String>,
    #[serde(default)]
    pub rest_seconds: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub order_index: i32,
}

impl WorkoutExercise {
    /// `3x8-10 • 90s rest`, with `-` for blanks.
    pub fn prescription(&self) -> String {
        let sets = self.sets.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
        let reps = self.reps.clone().unwrap_or_else(|| "-".into());
        let rest = self
            .rest_seconds
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".into());
        format!("{sets}x{reps} • {rest}s rest")
    }
}
