use super::{Invocation, connect};
use crate::cli::parser::NoticesCmd;
use crate::config::Config;
use crate::core::notices::NoticesScreen;
use crate::errors::AppResult;
use crate::models::notice::Notice;
use crate::ui::messages::{header, info, success};
use crate::utils::date::local_datetime;
use crate::utils::table::Table;
use chrono::Utc;

pub async fn handle(cmd: &NoticesCmd, cfg: &Config, inv: &Invocation) -> AppResult<()> {
    let conn = connect(cfg, inv).await?;
    let mut screen = NoticesScreen::new(&conn.backend, inv.scope.clone());

    match cmd {
        NoticesCmd::List { all } => {
            header(if *all { "All notices" } else { "Active notices" });
            print_notices(screen.show_active_only(!*all).await?);
        }

        NoticesCmd::Post { title, message } => {
            screen.create(title, message, Utc::now()).await?;
            success("Notice posted for the next 24 hours");
            print_notices(screen.notices());
        }

        NoticesCmd::Delete { id } => {
            screen.delete(id).await?;
            success(format!("Notice {id} deleted"));
        }
    }

    Ok(())
}

fn print_notices(notices: &[Notice]) {
    if notices.is_empty() {
        info("No notices");
        return;
    }

    let now = Utc::now();
    let mut table = Table::new(&["ID", "Title", "Message", "From", "Until", ""]);
    for n in notices {
        table.add_row(vec![
            n.id.clone(),
            n.title.clone(),
            preview(&n.message),
            local_datetime(&n.starts_at),
            local_datetime(&n.expires_at),
            if n.is_active(now) { "●" } else { "" }.to_string(),
        ]);
    }
    print!("{}", table.render());
}

/// First wrapped line of the message.
fn preview(message: &str) -> String {
    let lines = textwrap::wrap(message, 40);
    match lines.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, ..] => format!("{first}…"),
    }
}
