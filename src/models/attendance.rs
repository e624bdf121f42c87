use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One check-in/check-out pair, as projected by `v_attendance_sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSession {
    pub id: String,
    pub member_name: String,
    pub check_in_at: DateTime<Utc>,
    #[serde(default)]
    pub check_out_at: Option<DateTime<Utc>>,
    /// Whatever number the view computes; fractional minutes included.
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl AttendanceSession {
    pub fn is_open(&self) -> bool {
        self.check_out_at.is_none()
    }
}

/// Row of `attendance_locations`: one per physical check-in point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationToken {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_token: Option<String>,
}
