use super::{Invocation, connect, or_dash};
use crate::cli::parser::MembersCmd;
use crate::config::Config;
use crate::core::members::{MembersScreen, NewMember};
use crate::core::plans::{AssignPlanScreen, NewAssignment};
use crate::errors::AppResult;
use crate::models::member::Member;
use crate::models::plan::AssignedPlan;
use crate::models::workout::WorkoutTemplate;
use crate::ui::messages::{header, info, success};
use crate::utils::date::local_datetime;
use crate::utils::table::Table;

pub async fn handle(cmd: &MembersCmd, cfg: &Config, inv: &Invocation) -> AppResult<()> {
    let conn = connect(cfg, inv).await?;
    let mut members = MembersScreen::new(&conn.backend, inv.scope.clone(), &conn.ctx);

    match cmd {
        MembersCmd::List => {
            header("Members");
            print_members(members.load().await?);
        }

        MembersCmd::Add {
            full_name,
            phone,
            email,
        } => {
            let form = NewMember {
                full_name: full_name.clone(),
                phone: phone.clone(),
                email: email.clone(),
            };
            members.create(&form).await?;
            success(format!("Member '{}' added", full_name.trim()));
            print_members(members.members());
        }

        MembersCmd::Toggle { id } => {
            members.load().await?;
            let status = members.toggle_status(id).await?;
            success(format!("Member {id} is now {}", status.to_db_str()));
            info(format!("Run again to {}", status.action_label().to_lowercase()));
        }

        MembersCmd::Delete { id } => {
            members.delete(id).await?;
            success(format!("Member {id} deleted"));
        }

        MembersCmd::Plans { member_id } => {
            let mut plans = AssignPlanScreen::new(&conn.backend, inv.scope.clone(), &conn.ctx, member_id);
            header(format!("Plans of member {member_id}"));
            print_assignments(plans.load_assignments().await?);
            println!();
            header("Templates available");
            print_template_choices(plans.load_templates().await?);
        }

        MembersCmd::Assign {
            member_id,
            template_id,
            start_date,
            notes,
        } => {
            let mut plans = AssignPlanScreen::new(&conn.backend, inv.scope.clone(), &conn.ctx, member_id);
            let form = NewAssignment {
                template_id: template_id.clone(),
                start_date: start_date.clone(),
                notes: notes.clone(),
            };
            plans.assign(&form).await?;
            success("Plan assigned");
            print_assignments(plans.assignments());
        }

        MembersCmd::Unassign {
            member_id,
            assignment_id,
        } => {
            let mut plans = AssignPlanScreen::new(&conn.backend, inv.scope.clone(), &conn.ctx, member_id);
            plans.unassign(assignment_id).await?;
            success("Plan removed");
            print_assignments(plans.assignments());
        }
    }

    Ok(())
}

fn print_members(members: &[Member]) {
    if members.is_empty() {
        info("No members yet");
        return;
    }

    let mut table = Table::new(&["ID", "Name", "Phone", "Email", "Status", "Since"]);
    for m in members {
        table.add_row(vec![
            m.id.clone(),
            m.full_name.clone(),
            or_dash(m.phone.as_deref()),
            or_dash(m.email.as_deref()),
            m.status.to_db_str().to_string(),
            local_datetime(&m.created_at),
        ]);
    }
    print!("{}", table.render());
}

fn print_assignments(plans: &[AssignedPlan]) {
    if plans.is_empty() {
        info("No plans assigned");
        return;
    }

    let mut table = Table::new(&["ID", "Template", "Period", "Notes"]);
    for p in plans {
        table.add_row(vec![
            p.id.clone(),
            p.template_label().to_string(),
            p.period_label(),
            or_dash(p.notes.as_deref()),
        ]);
    }
    print!("{}", table.render());
}

fn print_template_choices(templates: &[WorkoutTemplate]) {
    if templates.is_empty() {
        info("No templates yet");
        return;
    }
    for t in templates {
        println!("  {}  {}", t.id, t.name);
    }
}
