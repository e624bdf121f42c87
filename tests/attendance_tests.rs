use chrono::{TimeZone, Utc};
use gymdesk::core::attendance::{
    AttendancePanel, LOCATIONS_TABLE, ROTATE_FN, SESSIONS_VIEW, TokenState,
};
use gymdesk::core::scope::ScreenScope;
use gymdesk::errors::AppError;
use gymdesk::export::csv::render_sessions_csv;
use gymdesk::export::{PosterFormat, ShareOutcome, Sharer};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

mod common;
use common::{Call, MemoryBackend, location_row, session_row};

fn panel(backend: &MemoryBackend) -> AttendancePanel<'_, MemoryBackend> {
    AttendancePanel::new(backend, ScreenScope::new(), "Front Desk", "Iron Temple")
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
}

#[tokio::test]
async fn sessions_are_newest_first_and_limited() {
    let backend = MemoryBackend::new().with_rows(
        SESSIONS_VIEW,
        vec![
            session_row("s1", "Ana", "2025-03-14T07:00:00Z"),
            session_row("s2", "Bruno", "2025-03-14T09:00:00Z"),
            session_row("s3", "Carla", "2025-03-14T08:00:00Z"),
        ],
    );
    let mut panel = panel(&backend).with_limit(2);

    let names: Vec<String> = panel
        .fetch_sessions()
        .await
        .unwrap()
        .iter()
        .map(|s| s.member_name.clone())
        .collect();
    assert_eq!(names, vec!["Bruno", "Carla"]);

    let Call::Select(query) = &backend.calls()[0] else {
        panic!("expected a select");
    };
    assert_eq!(query.table, SESSIONS_VIEW);
    assert_eq!(query.limit, Some(2));
}

#[tokio::test]
async fn failed_session_fetch_keeps_previous_list() {
    let backend = MemoryBackend::new().with_rows(
        SESSIONS_VIEW,
        vec![session_row("s1", "Ana", "2025-03-14T07:00:00Z")],
    );
    let mut panel = panel(&backend);
    panel.fetch_sessions().await.unwrap();

    backend.fail_on(&format!("select:{SESSIONS_VIEW}"));
    let err = panel.fetch_sessions().await.unwrap_err();

    assert!(matches!(err, AppError::Backend { .. }));
    assert_eq!(panel.sessions().len(), 1);
    assert_eq!(panel.sessions()[0].member_name, "Ana");
}

#[tokio::test]
async fn missing_location_row_means_no_token() {
    let backend = MemoryBackend::new();
    let mut panel = panel(&backend);

    assert_eq!(panel.fetch_token().await.unwrap(), None);
    assert_eq!(panel.token(), &TokenState::Unloaded);
}

#[tokio::test]
async fn empty_token_is_treated_as_absent() {
    let backend = MemoryBackend::new()
        .with_rows(LOCATIONS_TABLE, vec![location_row("loc-1", "Front Desk", Some(""))]);
    let mut panel = panel(&backend);

    assert_eq!(panel.fetch_token().await.unwrap(), None);
}

#[tokio::test]
async fn token_is_read_for_the_configured_location_only() {
    let backend = MemoryBackend::new().with_rows(
        LOCATIONS_TABLE,
        vec![
            location_row("loc-1", "Front Desk", Some("tok-front")),
            location_row("loc-2", "Side Door", Some("tok-side")),
        ],
    );
    let mut panel = panel(&backend);

    assert_eq!(panel.fetch_token().await.unwrap(), Some("tok-front"));
}

#[tokio::test]
async fn mount_loads_sessions_and_token() {
    let backend = MemoryBackend::new()
        .with_rows(
            SESSIONS_VIEW,
            vec![session_row("s1", "Ana", "2025-03-14T07:00:00Z")],
        )
        .with_rows(
            LOCATIONS_TABLE,
            vec![location_row("loc-1", "Front Desk", Some("tok-front"))],
        );
    let mut panel = panel(&backend);

    panel.mount().await.unwrap();

    assert_eq!(panel.sessions().len(), 1);
    assert_eq!(panel.token().current(), Some("tok-front"));
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn mount_applies_the_half_that_succeeded() {
    let backend = MemoryBackend::new()
        .with_rows(
            SESSIONS_VIEW,
            vec![session_row("s1", "Ana", "2025-03-14T07:00:00Z")],
        )
        .with_rows(
            LOCATIONS_TABLE,
            vec![location_row("loc-1", "Front Desk", Some("tok-front"))],
        );
    backend.fail_on(&format!("select:{SESSIONS_VIEW}"));
    let mut panel = panel(&backend);

    let err = panel.mount().await.unwrap_err();

    assert!(matches!(err, AppError::Backend { .. }));
    assert!(panel.sessions().is_empty());
    assert_eq!(panel.token().current(), Some("tok-front"));
}

#[tokio::test]
async fn rotate_uses_the_returned_token() {
    let backend = MemoryBackend::new()
        .with_rows(LOCATIONS_TABLE, vec![location_row("loc-1", "Front Desk", Some("old"))]);
    backend.reply(ROTATE_FN, json!([{ "new_token": "fresh" }]));
    let mut panel = panel(&backend);
    panel.fetch_token().await.unwrap();

    let outcome = panel.rotate_token().await.unwrap();

    assert_eq!(outcome.token.as_deref(), Some("fresh"));
    assert!(!outcome.refetched);
    assert_eq!(panel.token().current(), Some("fresh"));
    assert_eq!(
        backend.rpc_calls(ROTATE_FN),
        vec![json!({ "p_location_id": "loc-1" })]
    );
}

#[tokio::test]
async fn rotate_without_new_token_falls_back_to_a_fetch() {
    let backend = MemoryBackend::new()
        .with_rows(LOCATIONS_TABLE, vec![location_row("loc-1", "Front Desk", Some("old"))]);
    backend.reply(ROTATE_FN, json!({ "ok": true }));
    let mut panel = panel(&backend);
    panel.fetch_token().await.unwrap();

    // the procedure rotated the row server-side
    backend.set_rows(LOCATIONS_TABLE, vec![location_row("loc-1", "Front Desk", Some("rotated"))]);
    let outcome = panel.rotate_token().await.unwrap();

    assert!(outcome.refetched);
    assert_eq!(outcome.refetch_error, None);
    assert_eq!(outcome.token.as_deref(), Some("rotated"));
    assert_eq!(panel.token().current(), Some("rotated"));
}

#[tokio::test]
async fn rotation_that_went_through_is_reported_even_if_the_reread_fails() {
    let backend = MemoryBackend::new()
        .with_rows(LOCATIONS_TABLE, vec![location_row("loc-1", "Front Desk", Some("old"))]);
    backend.reply(ROTATE_FN, json!({}));
    let mut panel = panel(&backend);
    panel.fetch_token().await.unwrap();

    // the id lookup succeeds, the re-read after the procedure does not
    backend.fail_after(&format!("select:{LOCATIONS_TABLE}"), 1);
    let outcome = panel.rotate_token().await.unwrap();

    assert!(outcome.refetched);
    assert_eq!(
        outcome.refetch_error.as_deref(),
        Some(format!("permission denied (select:{LOCATIONS_TABLE})").as_str())
    );
    assert_eq!(backend.rpc_calls(ROTATE_FN).len(), 1);
    assert_eq!(panel.token().current(), Some("old"));
}

#[tokio::test]
async fn rotate_for_unknown_location_never_calls_the_procedure() {
    let backend = MemoryBackend::new()
        .with_rows(LOCATIONS_TABLE, vec![location_row("loc-2", "Side Door", Some("x"))]);
    let mut panel = panel(&backend);

    let err = panel.rotate_token().await.unwrap_err();

    assert!(matches!(err, AppError::LocationNotFound(ref name) if name == "Front Desk"));
    assert_eq!(err.to_string(), "Front Desk location not found");
    assert!(backend.rpc_calls(ROTATE_FN).is_empty());
}

#[tokio::test]
async fn failed_rotate_keeps_the_displayed_token() {
    let backend = MemoryBackend::new()
        .with_rows(LOCATIONS_TABLE, vec![location_row("loc-1", "Front Desk", Some("old"))]);
    backend.fail_on(&format!("rpc:{ROTATE_FN}"));
    let mut panel = panel(&backend);
    panel.fetch_token().await.unwrap();

    let err = panel.rotate_token().await.unwrap_err();

    assert_eq!(err.to_string(), format!("permission denied (rpc:{ROTATE_FN})"));
    assert_eq!(panel.token().current(), Some("old"));
}

#[test]
fn csv_quotes_only_the_member_name() {
    let session = serde_json::from_value(json!({
        "id": "s1",
        "member_name": "A\"B",
        "check_in_at": "2024-01-01T10:00:00Z",
        "check_out_at": null,
        "duration_minutes": 0,
    }))
    .unwrap();

    let csv = render_sessions_csv(&[session]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "member_name,check_in_at,check_out_at,duration_minutes,location_name"
    );
    assert_eq!(lines[1], "\"A\"\"B\",2024-01-01T10:00:00.000Z,,0,Front Desk");
    assert!(!csv.contains('\r'));
}

#[tokio::test]
async fn fractional_minutes_are_listed_and_exported_as_is() {
    let mut row = session_row("s1", "Ana", "2025-03-14T07:00:00Z");
    row["check_out_at"] = json!("2025-03-14T07:12:30Z");
    row["duration_minutes"] = json!(12.5);
    let backend = MemoryBackend::new().with_rows(SESSIONS_VIEW, vec![row]);
    let mut panel = panel(&backend);

    let sessions = panel.fetch_sessions().await.unwrap();
    assert_eq!(sessions[0].duration_minutes, Some(12.5));

    let csv = render_sessions_csv(panel.sessions()).unwrap();
    assert_eq!(
        csv.lines().nth(1).unwrap(),
        "\"Ana\",2025-03-14T07:00:00.000Z,2025-03-14T07:12:30.000Z,12.5,Front Desk"
    );
}

#[tokio::test]
async fn export_writes_the_displayed_sessions() {
    let backend = MemoryBackend::new().with_rows(
        SESSIONS_VIEW,
        vec![
            session_row("s1", "Ana", "2025-03-14T07:00:00Z"),
            session_row("s2", "Bruno", "2025-03-14T08:00:00Z"),
        ],
    );
    let mut panel = panel(&backend);
    panel.fetch_sessions().await.unwrap();
    let calls_before = backend.call_count();

    let dir = tempdir().unwrap();
    let outcome = panel.export_csv(dir.path(), &Sharer::default(), now()).unwrap();

    let ShareOutcome::Saved(path) = outcome else {
        panic!("no share command configured, file should only be saved");
    };
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        format!("attendance_{}.csv", now().timestamp_millis())
    );
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert_eq!(content.matches('\n').count(), 2);
    assert!(content.contains("\"Bruno\""));
    // export never goes back to the backend
    assert_eq!(backend.call_count(), calls_before);
}

#[tokio::test]
async fn export_with_no_sessions_writes_nothing() {
    let backend = MemoryBackend::new();
    let mut panel = panel(&backend);
    panel.fetch_sessions().await.unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("exports");
    let err = panel.export_csv(&out, &Sharer::default(), now()).unwrap_err();

    assert!(matches!(err, AppError::NoData));
    assert!(!out.exists());
}

#[tokio::test]
async fn poster_without_token_writes_nothing() {
    let backend = MemoryBackend::new();
    let mut panel = panel(&backend);
    panel.fetch_token().await.unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("posters");
    let err = panel
        .generate_poster(&out, PosterFormat::Pdf, &Sharer::default(), now())
        .unwrap_err();

    assert!(matches!(err, AppError::MissingQr));
    assert!(!out.exists());
}

#[tokio::test]
async fn poster_pdf_and_html_are_written() {
    let backend = MemoryBackend::new().with_rows(
        LOCATIONS_TABLE,
        vec![location_row("loc-1", "Front Desk", Some("tok-123"))],
    );
    let mut panel = panel(&backend);
    panel.fetch_token().await.unwrap();
    let dir = tempdir().unwrap();

    let pdf = panel
        .generate_poster(dir.path(), PosterFormat::Pdf, &Sharer::default(), now())
        .unwrap();
    let bytes = fs::read(pdf.path()).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(pdf.path().extension().is_some_and(|e| e == "pdf"));

    let html = panel
        .generate_poster(dir.path(), PosterFormat::Html, &Sharer::default(), now())
        .unwrap();
    let page = fs::read_to_string(html.path()).unwrap();
    assert!(page.contains("Iron Temple"));
    assert!(page.contains("Front Desk Check-In / Check-Out"));
    assert!(page.contains("data:image/svg+xml;base64,"));
}

#[tokio::test]
async fn closed_scope_leaves_state_untouched() {
    let backend = MemoryBackend::new().with_rows(
        SESSIONS_VIEW,
        vec![session_row("s1", "Ana", "2025-03-14T07:00:00Z")],
    );
    let scope = ScreenScope::new();
    let mut panel = AttendancePanel::new(&backend, scope.clone(), "Front Desk", "Iron Temple");

    scope.close();
    let err = panel.fetch_sessions().await.unwrap_err();

    assert!(matches!(err, AppError::Cancelled));
    assert!(panel.sessions().is_empty());
}
