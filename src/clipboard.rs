use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::AppError;

/// Commands tried in order when no clipboard command is configured.
const FALLBACKS: [&[&str]; 3] = [
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["pbcopy"],
];

pub fn copy_text(configured: Option<&[String]>, text: &str) -> Result<(), AppError> {
    let command = match configured {
        Some(parts) => parts.to_vec(),
        None => detect().ok_or_else(|| {
            AppError::Clipboard("no clipboard command found; set DAYPLAN_CLIPBOARD".to_string())
        })?,
    };
    let (program, args) = command
        .split_first()
        .ok_or_else(|| AppError::Clipboard("clipboard command is empty".to_string()))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if !status.success() {
        return Err(AppError::Clipboard(format!("{program} exited with {status}")));
    }
    Ok(())
}

fn detect() -> Option<Vec<String>> {
    let path = std::env::var_os("PATH")?;
    FALLBACKS
        .iter()
        .find(|parts| {
            std::env::split_paths(&path).any(|dir| dir.join(parts[0]).is_file())
        })
        .map(|parts| parts.iter().map(|part| part.to_string()).collect())
}
