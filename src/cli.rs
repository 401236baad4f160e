use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::Day;

#[derive(Parser, Debug)]
#[command(
    name = "dayplan",
    version,
    about = "Build today's project and task list and render it as a daily plan"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "ID",
        help = "Session identifier (or DAYPLAN_SESSION_ID)"
    )]
    pub session_id: Option<String>,
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Directory holding session storage and logs (or DAYPLAN_HOME)"
    )]
    pub data_dir: Option<PathBuf>,
    #[arg(long, global = true, value_name = "DATETIME", hide = true)]
    pub now: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Project(ProjectCommand),
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Edit(EditCommand),
    List(ListArgs),
    Render(RenderArgs),
    Copy(CopyArgs),
    #[command(subcommand)]
    Template(TemplateCommand),
    #[command(subcommand)]
    Option(OptionCommand),
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    Add(ProjectAdd),
    Remove(ProjectRemove),
    Rename(ProjectRename),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    Add(TaskAdd),
    Remove(TaskRemove),
    Edit(TaskEdit),
}

#[derive(Subcommand, Debug)]
pub enum EditCommand {
    Project(EditProject),
    Task(EditTask),
    Input(EditInput),
    Commit,
    Cancel,
    Show,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    Show,
    Set(TemplateSet),
    Reset,
    Placeholders,
}

#[derive(Subcommand, Debug)]
pub enum OptionCommand {
    #[command(name = "include-tomorrow")]
    IncludeTomorrow(IncludeTomorrow),
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    Show,
    End,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DayArg {
    #[arg(long, value_enum, default_value = "today")]
    pub day: DayChoice,
}

#[derive(Args, Debug)]
pub struct ProjectAdd {
    pub name: String,
    #[command(flatten)]
    pub day: DayArg,
}

#[derive(Args, Debug)]
pub struct ProjectRemove {
    pub id: i64,
    #[command(flatten)]
    pub day: DayArg,
}

#[derive(Args, Debug)]
pub struct ProjectRename {
    pub id: i64,
    pub name: String,
    #[command(flatten)]
    pub day: DayArg,
}

#[derive(Args, Debug)]
pub struct TaskAdd {
    pub project_id: i64,
    pub text: String,
    #[command(flatten)]
    pub day: DayArg,
}

#[derive(Args, Debug)]
pub struct TaskRemove {
    pub project_id: i64,
    pub task_id: i64,
    #[command(flatten)]
    pub day: DayArg,
}

#[derive(Args, Debug)]
pub struct TaskEdit {
    pub project_id: i64,
    pub task_id: i64,
    #[arg(allow_hyphen_values = true)]
    pub text: String,
    #[command(flatten)]
    pub day: DayArg,
}

#[derive(Args, Debug)]
pub struct EditProject {
    pub id: i64,
    #[command(flatten)]
    pub day: DayArg,
}

#[derive(Args, Debug)]
pub struct EditTask {
    pub project_id: i64,
    pub task_id: i64,
    #[command(flatten)]
    pub day: DayArg,
}

#[derive(Args, Debug)]
pub struct EditInput {
    #[arg(allow_hyphen_values = true)]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[arg(long, value_name = "PATH", help = "Also write the plan to this file")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CopyArgs {}

#[derive(Args, Debug)]
pub struct TemplateSet {
    #[arg(help = "Template text; read from stdin when omitted")]
    pub text: Option<String>,
}

#[derive(Args, Debug)]
pub struct IncludeTomorrow {
    #[arg(value_enum)]
    pub value: Toggle,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DayChoice {
    Today,
    Tomorrow,
}

impl From<DayChoice> for Day {
    fn from(value: DayChoice) -> Self {
        match value {
            DayChoice::Today => Day::Today,
            DayChoice::Tomorrow => Day::Tomorrow,
        }
    }
}

impl From<DayArg> for Day {
    fn from(value: DayArg) -> Self {
        value.day.into()
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}
