// src/export/csv.rs

use crate::config::default_location_name;
use crate::errors::AppResult;
use crate::export::notify_export_success;
use crate::models::attendance::AttendanceSession;
use crate::ui::messages::info;
use crate::utils::date::iso_millis;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::path::Path;

pub const SESSION_HEADERS: [&str; 5] = [
    "member_name",
    "check_in_at",
    "check_out_at",
    "duration_minutes",
    "location_name",
];

/// Always-quoted field with embedded quotes doubled.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Shortest form of the number: `90`, `12.5`, `0`.
pub fn format_minutes(minutes: f64) -> String {
    // -0.0 would print as "-0"
    (minutes + 0.0).to_string()
}

fn session_to_record(s: &AttendanceSession) -> [String; 5] {
    [
        quote_field(&s.member_name),
        iso_millis(&s.check_in_at),
        s.check_out_at.as_ref().map(iso_millis).unwrap_or_default(),
        s.duration_minutes.map(format_minutes).unwrap_or_default(),
        s.location_name
            .clone()
            .unwrap_or_else(default_location_name),
    ]
}

/// Render the sessions as CSV text: header first, one line per session,
/// separated by `\n` with no terminator after the last one. Only `member_name` is quoted; the other columns are
/// written verbatim.
pub fn render_sessions_csv(sessions: &[AttendanceSession]) -> AppResult<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(SESSION_HEADERS)?;
    for s in sessions {
        wtr.write_record(session_to_record(s))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| std::io::Error::other(format!("CSV flush error: {e}")))?;
    let mut out = String::from_utf8_lossy(&bytes).into_owned();
    // lines are joined, not terminated
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

pub fn write_sessions_csv(path: &Path, sessions: &[AttendanceSession]) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));
    let csv = render_sessions_csv(sessions)?;
    fs::write(path, csv)?;
    notify_export_success("CSV", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(name: &str) -> AttendanceSession {
        AttendanceSession {
            id: "s1".into(),
            member_name: name.into(),
            check_in_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            check_out_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap()),
            duration_minutes: Some(90.0),
            location_name: Some("Side Door".into()),
        }
    }

    #[test]
    fn quote_field_doubles_inner_quotes() {
        assert_eq!(quote_field(r#"A"B"#), r#""A""B""#);
        assert_eq!(quote_field("plain"), r#""plain""#);
    }

    #[test]
    fn closed_session_row_has_every_column() {
        let out = render_sessions_csv(&[session("Ana")]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "member_name,check_in_at,check_out_at,duration_minutes,location_name"
        );
        assert_eq!(
            lines[1],
            r#""Ana",2024-01-01T10:00:00.000Z,2024-01-01T11:30:00.000Z,90,Side Door"#
        );
        assert!(!out.contains('\r'));
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn minutes_keep_their_fraction_and_drop_trailing_zeroes() {
        assert_eq!(format_minutes(90.0), "90");
        assert_eq!(format_minutes(12.5), "12.5");
        assert_eq!(format_minutes(0.0), "0");
        assert_eq!(format_minutes(-0.0), "0");
    }

    #[test]
    fn commas_inside_names_stay_inside_the_quotes() {
        let out = render_sessions_csv(&[session("Doe, Jane")]).unwrap();
        assert!(out.lines().nth(1).unwrap().starts_with(r#""Doe, Jane","#));
    }
}
