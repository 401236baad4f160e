use std::path::PathBuf;

use chrono::{Local, NaiveDateTime, Utc};

use crate::error::AppError;

pub const SESSION_ID_ENV: &str = "DAYPLAN_SESSION_ID";
pub const DATA_DIR_ENV: &str = "DAYPLAN_HOME";
pub const NOW_ENV: &str = "DAYPLAN_NOW";
pub const CLIPBOARD_ENV: &str = "DAYPLAN_CLIPBOARD";

const SESSION_ID_FLAG: &str = "--session-id";
const DATA_DIR_NAME: &str = ".dayplan";
const NOW_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Wall-clock reading taken once per invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Clock {
    pub local: NaiveDateTime,
    pub millis: i64,
}

impl Clock {
    pub fn system() -> Self {
        Self {
            local: Local::now().naive_local(),
            millis: Utc::now().timestamp_millis(),
        }
    }

    pub fn fixed(local: NaiveDateTime) -> Self {
        Self {
            local,
            millis: local.and_utc().timestamp_millis(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub session_id: String,
    pub clock: Clock,
    pub clipboard: Option<Vec<String>>,
}

/// Values given on the command line; they win over the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigFlags {
    pub data_dir: Option<PathBuf>,
    pub session_id: Option<String>,
    pub now: Option<String>,
}

impl Config {
    pub fn resolve(flags: ConfigFlags) -> Result<Self, AppError> {
        Self::resolve_with(flags, |name| std::env::var(name).ok())
    }

    pub fn resolve_with(
        flags: ConfigFlags,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let session_id = resolve_session_id(flags.session_id.or_else(|| env(SESSION_ID_ENV)))?;
        let data_dir = match flags
            .data_dir
            .or_else(|| non_blank(env(DATA_DIR_ENV)).map(PathBuf::from))
        {
            Some(dir) => dir,
            None => default_data_dir(env("HOME"))?,
        };
        let clock = match flags.now.or_else(|| non_blank(env(NOW_ENV))) {
            Some(raw) => Clock::fixed(parse_now(&raw)?),
            None => Clock::system(),
        };
        let clipboard = match non_blank(env(CLIPBOARD_ENV)) {
            Some(raw) => Some(parse_clipboard(&raw)?),
            None => None,
        };

        Ok(Self {
            data_dir,
            session_id,
            clock,
            clipboard,
        })
    }
}

fn resolve_session_id(session_id: Option<String>) -> Result<String, AppError> {
    let value = session_id.ok_or_else(|| {
        AppError::InvalidInput(format!(
            "{SESSION_ID_FLAG} is required (or set {SESSION_ID_ENV})"
        ))
    })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{SESSION_ID_FLAG} is empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn default_data_dir(home: Option<String>) -> Result<PathBuf, AppError> {
    non_blank(home)
        .map(|home| PathBuf::from(home).join(DATA_DIR_NAME))
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "unable to resolve data directory; set {DATA_DIR_ENV} or pass --data-dir"
            ))
        })
}

pub fn parse_now(raw: &str) -> Result<NaiveDateTime, AppError> {
    let raw = raw.trim();
    NOW_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "invalid time `{raw}`; expected YYYY-MM-DDTHH:MM[:SS]"
            ))
        })
}

fn parse_clipboard(raw: &str) -> Result<Vec<String>, AppError> {
    match shlex::split(raw) {
        Some(parts) if !parts.is_empty() => Ok(parts),
        _ => Err(AppError::InvalidInput(format!(
            "invalid {CLIPBOARD_ENV} command: {raw}"
        ))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
