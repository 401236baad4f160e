use crate::edit::CommitOutcome;
use crate::model::{Day, EditState, Plan, SessionState};
use crate::render::DayPhase;

fn day_heading(day: Day) -> &'static str {
    match day {
        Day::Today => "Today",
        Day::Tomorrow => "Tomorrow",
    }
}

fn format_plan_section(output: &mut String, day: Day, plan: &Plan) {
    if plan.is_empty() {
        output.push_str(&format!("{}: (none)\n", day_heading(day)));
        return;
    }
    output.push_str(&format!("{}:\n", day_heading(day)));
    for project in &plan.projects {
        output.push_str(&format!("- {} (project id {})\n", project.name, project.id));
        for task in &project.tasks {
            output.push_str(&format!("  - {} (task id {})\n", task.text, task.id));
        }
    }
}

/// The editable view of a session: every project and task with its id.
pub fn format_plan_listing(state: &SessionState, phase: DayPhase) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} - {}\n\n", phase.greeting, phase.title));
    format_plan_section(&mut output, Day::Today, state.plan(Day::Today));

    let tomorrow = state.plan(Day::Tomorrow);
    output.push('\n');
    if state.include_tomorrow {
        format_plan_section(&mut output, Day::Tomorrow, tomorrow);
    } else if !tomorrow.is_empty() {
        output.push_str(&format!(
            "Tomorrow: hidden ({} project(s) kept)\n",
            tomorrow.projects.len()
        ));
    }

    let option = match (phase.evening, state.include_tomorrow) {
        (true, true) => "on",
        (true, false) => "off",
        (false, true) => "on (changeable from 17:00)",
        (false, false) => "off (changeable from 17:00)",
    };
    output.push_str(&format!("Include tomorrow: {option}\n"));
    output.trim_end().to_string()
}

pub fn format_edit_state(state: &EditState) -> String {
    match state {
        EditState::Idle => "No edit in progress.".to_string(),
        EditState::Editing { target, buffer } => {
            format!("Editing {}: {buffer}", target.describe())
        }
    }
}

pub fn format_commit_outcome(outcome: &CommitOutcome) -> String {
    match outcome {
        CommitOutcome::NothingToCommit => "No edit in progress.".to_string(),
        CommitOutcome::Applied { target } => format!("Saved {}", target.describe()),
        CommitOutcome::TaskDeleted { target } => format!("Removed {}", target.describe()),
        CommitOutcome::Unchanged { target } => {
            format!("No changes to {}", target.describe())
        }
    }
}
