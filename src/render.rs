use chrono::{NaiveDateTime, Timelike};

use crate::model::{Day, Plan, SessionState};

pub const PLACEHOLDERS: [&str; 4] = [
    "{{greeting}}",
    "{{planTitle}}",
    "{{projects}}",
    "{{nextDayPlan}}",
];

const SEPARATOR: &str = "----------------------------";
const EVENING_HOUR: u32 = 17;
const NO_TASKS: &str = "    - No tasks for this project yet.";

/// Greeting and title derived from the local hour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DayPhase {
    pub greeting: &'static str,
    pub title: &'static str,
    pub evening: bool,
}

impl DayPhase {
    pub fn at(now: NaiveDateTime) -> Self {
        if now.hour() >= EVENING_HOUR {
            Self {
                greeting: "Good Evening",
                title: "Today's Work Done:",
                evening: true,
            }
        } else {
            Self {
                greeting: "Good Morning",
                title: "Today's Work Plan:",
                evening: false,
            }
        }
    }
}

pub fn render(state: &SessionState, now: NaiveDateTime) -> String {
    let phase = DayPhase::at(now);
    let projects = format_projects(state.plan(Day::Today), "No projects for today.");
    let next_day = if state.include_tomorrow {
        format_next_day(state.plan(Day::Tomorrow), now)
    } else {
        String::new()
    };

    state
        .template
        .replace("{{greeting}}", phase.greeting)
        .replace("{{planTitle}}", phase.title)
        .replace("{{projects}}", &projects)
        .replace("{{nextDayPlan}}", &next_day)
}

fn format_projects(plan: &Plan, empty: &str) -> String {
    if plan.is_empty() {
        return empty.to_string();
    }
    plan.projects
        .iter()
        .enumerate()
        .map(|(idx, project)| {
            let mut block = format!("{}) {}\n", idx + 1, project.name);
            if project.tasks.is_empty() {
                block.push_str(NO_TASKS);
            } else {
                let lines: Vec<String> = project
                    .tasks
                    .iter()
                    .map(|task| format!("    - {}", task.text))
                    .collect();
                block.push_str(&lines.join("\n"));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_next_day(plan: &Plan, now: NaiveDateTime) -> String {
    let today = now.date();
    let tomorrow = today.succ_opt().unwrap_or(today);
    let body = format_projects(plan, "No projects for the next day.");
    format!(
        "\n{SEPARATOR}\n{} Work Plan ({})\n{SEPARATOR}\n\n{body}",
        tomorrow.format("%A"),
        tomorrow.format("%d-%m-%Y"),
    )
}
