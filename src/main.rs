mod app;
mod cli;
mod clipboard;
mod config;
mod db;
mod edit;
mod entities;
mod error;
mod logging;
mod model;
mod render;
mod snapshot;
mod storage;
mod store;
mod util;

use std::fs;
use std::io::Read;

use clap::Parser;
use log::{info, warn};

use crate::app::{App, TaskEditOutcome};
use crate::cli::{
    Cli, Command, EditCommand, OptionCommand, ProjectCommand, RenderArgs, SessionCommand,
    TaskCommand, TemplateCommand, TemplateSet,
};
use crate::config::{Config, ConfigFlags};
use crate::error::AppError;
use crate::model::{Day, EditTarget};
use crate::render::PLACEHOLDERS;
use crate::storage::SessionStorage;
use crate::util::{format_commit_outcome, format_edit_state, format_plan_listing};

const COPIED_MESSAGE: &str = "Copied! The generated plan has been copied to your clipboard.";

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let Cli {
        session_id,
        data_dir,
        now,
        command,
    } = Cli::parse();
    let config = Config::resolve(ConfigFlags {
        data_dir,
        session_id,
        now,
    })?;

    let _logger = match logging::init_logging(&db::resolve_log_dir(&config.data_dir)) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err}");
            None
        }
    };

    let db_path = db::resolve_db_path(&config.data_dir);
    db::ensure_parent_dir(&db_path)?;
    let mut lock = db::open_lock(&db_path)?;
    let _guard = lock.write()?;

    let db = db::connect(&db_path).await?;
    db::ensure_schema(&db).await?;
    let storage = SessionStorage::new(db, config.session_id.clone());
    let app = App::new(storage, config.clock);

    match command {
        Command::Project(command) => handle_project(&app, command).await,
        Command::Task(command) => handle_task(&app, command).await,
        Command::Edit(command) => handle_edit(&app, command).await,
        Command::List(_) => handle_list(&app).await,
        Command::Render(args) => handle_render(&app, args).await,
        Command::Copy(_) => handle_copy(&app, &config).await,
        Command::Template(command) => handle_template(&app, command).await,
        Command::Option(command) => handle_option(&app, command).await,
        Command::Session(command) => handle_session(&app, command).await,
    }
}

async fn handle_project(app: &App, command: ProjectCommand) -> Result<(), AppError> {
    match command {
        ProjectCommand::Add(args) => {
            let day = Day::from(args.day);
            if let Some(id) = app.add_project(day, &args.name).await? {
                println!("Created project ID: {id}: {}", args.name.trim());
            }
        }
        ProjectCommand::Remove(args) => {
            if app.delete_project(args.day.into(), args.id).await? {
                println!("Removed project ID: {}", args.id);
            }
        }
        ProjectCommand::Rename(args) => {
            if app.rename_project(args.day.into(), args.id, &args.name).await? {
                println!("Updated project ID: {}", args.id);
            }
        }
    }
    Ok(())
}

async fn handle_task(app: &App, command: TaskCommand) -> Result<(), AppError> {
    match command {
        TaskCommand::Add(args) => {
            let day = Day::from(args.day);
            if let Some(id) = app.add_task(day, args.project_id, &args.text).await? {
                println!("Created task ID: {id}: {}", args.text.trim());
            }
        }
        TaskCommand::Remove(args) => {
            if app
                .delete_task(args.day.into(), args.project_id, args.task_id)
                .await?
            {
                println!("Removed task ID: {}", args.task_id);
            }
        }
        TaskCommand::Edit(args) => {
            let outcome = app
                .edit_task(args.day.into(), args.project_id, args.task_id, &args.text)
                .await?;
            match outcome {
                TaskEditOutcome::Updated => println!("Updated task ID: {}", args.task_id),
                TaskEditOutcome::Deleted => println!("Removed task ID: {}", args.task_id),
                TaskEditOutcome::Unchanged => {}
            }
        }
    }
    Ok(())
}

async fn handle_edit(app: &App, command: EditCommand) -> Result<(), AppError> {
    match command {
        EditCommand::Project(args) => {
            let target = EditTarget::Project {
                day: args.day.into(),
                project_id: args.id,
            };
            begin_edit(app, target).await
        }
        EditCommand::Task(args) => {
            let target = EditTarget::Task {
                day: args.day.into(),
                project_id: args.project_id,
                task_id: args.task_id,
            };
            begin_edit(app, target).await
        }
        EditCommand::Input(args) => {
            let target = app.edit_input(&args.text).await?;
            println!("Editing {}: {}", target.describe(), args.text);
            Ok(())
        }
        EditCommand::Commit => {
            let outcome = app.commit_edit().await?;
            println!("{}", format_commit_outcome(&outcome));
            Ok(())
        }
        EditCommand::Cancel => {
            match app.cancel_edit().await? {
                Some(target) => println!("Cancelled edit of {}", target.describe()),
                None => println!("No edit in progress."),
            }
            Ok(())
        }
        EditCommand::Show => {
            let state = app.edit_state().await?;
            println!("{}", format_edit_state(&state));
            Ok(())
        }
    }
}

async fn begin_edit(app: &App, target: EditTarget) -> Result<(), AppError> {
    let (previous, initial) = app.begin_edit(target).await?;
    if previous.changed() {
        println!("{}", format_commit_outcome(&previous));
    }
    println!("Editing {}: {initial}", target.describe());
    Ok(())
}

async fn handle_list(app: &App) -> Result<(), AppError> {
    let state = app.load_state().await?;
    println!("{}", format_plan_listing(&state, app.phase()));
    Ok(())
}

async fn handle_render(app: &App, args: RenderArgs) -> Result<(), AppError> {
    let plan = app.render().await?;
    if let Some(path) = args.output {
        db::ensure_parent_dir(&path)?;
        fs::write(&path, &plan)?;
        info!("wrote plan to {}", path.display());
    }
    println!("{plan}");
    Ok(())
}

async fn handle_copy(app: &App, config: &Config) -> Result<(), AppError> {
    let plan = app.render().await?;
    match clipboard::copy_text(config.clipboard.as_deref(), &plan) {
        Ok(()) => println!("{COPIED_MESSAGE}"),
        Err(err) => warn!("copy to clipboard failed: {err}"),
    }
    Ok(())
}

async fn handle_template(app: &App, command: TemplateCommand) -> Result<(), AppError> {
    match command {
        TemplateCommand::Show => {
            let state = app.load_state().await?;
            println!("{}", state.template);
        }
        TemplateCommand::Set(args) => {
            let template = read_template(args)?;
            if app.set_template(&template).await? {
                println!("Template updated.");
            }
        }
        TemplateCommand::Reset => {
            if app.reset_template().await? {
                println!("Template reset to default.");
            }
        }
        TemplateCommand::Placeholders => {
            for placeholder in PLACEHOLDERS {
                println!("{placeholder}");
            }
        }
    }
    Ok(())
}

fn read_template(args: TemplateSet) -> Result<String, AppError> {
    match args.text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

async fn handle_option(app: &App, command: OptionCommand) -> Result<(), AppError> {
    match command {
        OptionCommand::IncludeTomorrow(args) => {
            let include = args.value.enabled();
            app.set_include_tomorrow(include).await?;
            let label = if include { "on" } else { "off" };
            println!("Include tomorrow: {label}");
        }
    }
    Ok(())
}

async fn handle_session(app: &App, command: SessionCommand) -> Result<(), AppError> {
    match command {
        SessionCommand::Show => match app.raw_state().await? {
            Some(raw) => println!("{raw}"),
            None => println!("(empty session)"),
        },
        SessionCommand::End => {
            let removed = app.end_session().await?;
            println!("Session ended ({removed} item(s) cleared).");
        }
    }
    Ok(())
}
