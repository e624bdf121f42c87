use super::{Invocation, connect, output_dir, report_artifact, sharer};
use crate::cli::parser::AttendanceCmd;
use crate::config::Config;
use crate::core::attendance::AttendancePanel;
use crate::errors::AppResult;
use crate::export::csv::format_minutes;
use crate::models::attendance::AttendanceSession;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::{local_datetime, local_time};
use crate::utils::table::Table;
use chrono::Utc;

pub async fn handle(cmd: &AttendanceCmd, cfg: &Config, inv: &Invocation) -> AppResult<()> {
    let conn = connect(cfg, inv).await?;
    let mut panel = AttendancePanel::from_config(&conn.backend, inv.scope.clone(), cfg);

    match cmd {
        AttendanceCmd::Panel => {
            panel.mount().await?;
            header(format!("Attendance ({})", cfg.location_name));
            match panel.token().current() {
                Some(token) => println!("🔑 {token}\n"),
                None => warning("No token yet. Try rotating once."),
            }
            print_sessions(panel.sessions());
        }

        AttendanceCmd::Sessions { limit } => {
            if let Some(n) = limit {
                panel = panel.with_limit(*n);
            }
            let sessions = panel.fetch_sessions().await?;
            header(format!("Recent sessions ({})", cfg.location_name));
            print_sessions(sessions);
        }

        AttendanceCmd::Token => {
            header(format!("Check-in token ({})", cfg.location_name));
            match panel.fetch_token().await? {
                Some(token) => println!("🔑 {token}"),
                None => warning("No token yet. Try rotating once."),
            }
        }

        AttendanceCmd::Rotate => {
            let outcome = panel.rotate_token().await?;
            match (outcome.refetch_error, outcome.token) {
                (Some(e), _) => {
                    success("Token rotated");
                    warning(format!("Could not read the new token: {e}"));
                }
                (None, Some(token)) => success(format!("Token rotated: {token}")),
                (None, None) => warning("Rotation finished but the location still has no token"),
            }
        }

        AttendanceCmd::ExportCsv { dir, limit } => {
            if let Some(n) = limit {
                panel = panel.with_limit(*n);
            }
            panel.fetch_sessions().await?;
            let outcome = panel.export_csv(&output_dir(dir, cfg), &sharer(cfg), Utc::now())?;
            report_artifact("CSV", &outcome);
        }

        AttendanceCmd::Poster { format, dir } => {
            panel.fetch_token().await?;
            let outcome =
                panel.generate_poster(&output_dir(dir, cfg), *format, &sharer(cfg), Utc::now())?;
            report_artifact("Poster", &outcome);
        }
    }

    Ok(())
}

fn print_sessions(sessions: &[AttendanceSession]) {
    if sessions.is_empty() {
        info("No sessions yet");
        return;
    }

    let mut table = Table::new(&["Member", "Check-in", "Check-out", "Minutes", "Location"]);
    for s in sessions {
        table.add_row(vec![
            s.member_name.clone(),
            local_datetime(&s.check_in_at),
            s.check_out_at
                .as_ref()
                .map(local_time)
                .unwrap_or_else(|| "open".to_string()),
            s.duration_minutes
                .map(format_minutes)
                .unwrap_or_else(|| "-".to_string()),
            s.location_name.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    print!("{}", table.render());

    let open = sessions.iter().filter(|s| s.is_open()).count();
    if open > 0 {
        info(format!("{open} member(s) still checked in"));
    }
}
