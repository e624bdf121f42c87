use super::{Invocation, session_gate};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

/// Handle `login`, `logout` and `whoami`.
pub async fn handle(cmd: &Commands, cfg: &Config, inv: &Invocation) -> AppResult<()> {
    let gate = session_gate(cfg, inv)?;

    match cmd {
        Commands::Login { email, password } => {
            let email = email.trim();
            if email.is_empty() {
                return Err(AppError::validation("Email is required"));
            }
            let password = match password {
                Some(p) => p.clone(),
                None => rpassword::prompt_password("Password: ")?,
            };
            if password.is_empty() {
                return Err(AppError::validation("Password is required"));
            }

            let session = inv.scope.run(gate.sign_in(email, &password)).await?;
            success(format!("Signed in as {}", session.context().display_name()));
        }

        Commands::Logout => {
            if inv.scope.run(gate.sign_out()).await? {
                success("Signed out");
            } else {
                info("No stored session");
            }
        }

        Commands::Whoami => match inv.scope.run(gate.restore()).await? {
            Some(session) => {
                let ctx = session.context();
                println!("👤 {} ({})", ctx.display_name(), ctx.user_id);
            }
            None => warning("Not signed in"),
        },

        _ => {}
    }

    Ok(())
}
