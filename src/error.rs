use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{}", Labeled("Not found", .0))]
    NotFound(String),
    #[error("{}", Labeled("Invalid input", .0))]
    InvalidInput(String),
    #[error("{}", Labeled("Clipboard", .0))]
    Clipboard(String),
}

struct Labeled<'a>(&'a str, &'a str);

impl fmt::Display for Labeled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Labeled(label, message) = self;
        if message.contains('\n') {
            write!(f, "{label}:\n{message}")
        } else {
            write!(f, "{label}: {message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_messages_stay_inline() {
        let err = AppError::NotFound("project id 7".to_string());
        assert_eq!(err.to_string(), "Not found: project id 7");
    }

    #[test]
    fn multiline_messages_start_on_next_line() {
        let err = AppError::InvalidInput("first\nsecond".to_string());
        assert_eq!(err.to_string(), "Invalid input:\nfirst\nsecond");
    }
}
