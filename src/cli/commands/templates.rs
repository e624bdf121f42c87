use super::{Invocation, connect, or_dash};
use crate::cli::parser::TemplatesCmd;
use crate::config::Config;
use crate::core::templates::{
    DayDetailScreen, NewDay, NewExercise, NewTemplate, TemplateDetailScreen, TemplateListScreen,
};
use crate::errors::AppResult;
use crate::models::workout::{WorkoutDay, WorkoutExercise, WorkoutTemplate};
use crate::ui::messages::{header, info, success};
use crate::utils::table::Table;

pub async fn handle(cmd: &TemplatesCmd, cfg: &Config, inv: &Invocation) -> AppResult<()> {
    let conn = connect(cfg, inv).await?;
    let scope = inv.scope.clone();

    match cmd {
        TemplatesCmd::List => {
            let mut screen = TemplateListScreen::new(&conn.backend, scope, &conn.ctx);
            header("Workout templates");
            print_templates(screen.load().await?);
        }

        TemplatesCmd::Add { name, goal, level } => {
            let mut screen = TemplateListScreen::new(&conn.backend, scope, &conn.ctx);
            let form = NewTemplate {
                name: name.clone(),
                goal: goal.clone(),
                level: level.clone(),
            };
            screen.create(&form).await?;
            success(format!("Template '{}' created", name.trim()));
            print_templates(screen.templates());
        }

        TemplatesCmd::Days { template_id } => {
            let mut screen = TemplateDetailScreen::new(&conn.backend, scope, template_id);
            header(format!("Days of template {template_id}"));
            print_days(screen.load().await?);
        }

        TemplatesCmd::AddDay {
            template_id,
            day_index,
            name,
        } => {
            let mut screen = TemplateDetailScreen::new(&conn.backend, scope, template_id);
            let form = NewDay {
                day_index: day_index.clone(),
                name: name.clone(),
            };
            screen.add_day(&form).await?;
            success("Day added");
            print_days(screen.days());
        }

        TemplatesCmd::Exercises { day_id } => {
            let mut screen = DayDetailScreen::new(&conn.backend, scope, day_id);
            header(format!("Exercises of day {day_id}"));
            print_exercises(screen.load().await?);
        }

        TemplatesCmd::AddExercise {
            day_id,
            name,
            muscle_group,
            sets,
            reps,
            rest_seconds,
            notes,
            order_index,
        } => {
            let mut screen = DayDetailScreen::new(&conn.backend, scope, day_id);
            // the default position is the current exercise count
            if order_index.is_none() {
                screen.load().await?;
            }
            let form = NewExercise {
                name: name.clone(),
                muscle_group: muscle_group.clone(),
                sets: sets.clone(),
                reps: reps.clone(),
                rest_seconds: rest_seconds.clone(),
                notes: notes.clone(),
                order_index: order_index.clone(),
            };
            screen.add_exercise(&form).await?;
            success(format!("Exercise '{}' added", name.trim()));
            print_exercises(screen.exercises());
        }
    }

    Ok(())
}

fn print_templates(templates: &[WorkoutTemplate]) {
    if templates.is_empty() {
        info("No templates yet");
        return;
    }

    let mut table = Table::new(&["ID", "Name", "Goal", "Level"]);
    for t in templates {
        table.add_row(vec![
            t.id.clone(),
            t.name.clone(),
            or_dash(t.goal.as_deref()),
            or_dash(t.level.as_deref()),
        ]);
    }
    print!("{}", table.render());
}

fn print_days(days: &[WorkoutDay]) {
    if days.is_empty() {
        info("No days yet");
        return;
    }

    let mut table = Table::new(&["ID", "#", "Day"]);
    for d in days {
        table.add_row(vec![d.id.clone(), d.day_index.to_string(), d.label()]);
    }
    print!("{}", table.render());
}

fn print_exercises(exercises: &[WorkoutExercise]) {
    if exercises.is_empty() {
        info("No exercises yet");
        return;
    }

    let mut table = Table::new(&["#", "Exercise", "Muscle", "Prescription", "Notes"]);
    for e in exercises {
        table.add_row(vec![
            e.order_index.to_string(),
            e.name.clone(),
            or_dash(e.muscle_group.as_deref()),
            e.prescription(),
            or_dash(e.notes.as_deref()),
        ]);
    }
    print!("{}", table.render());
}
