use std::path::Path;

use flexi_logger::{
    detailed_format, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};

pub const LOG_FILE_BASENAME: &str = "dayplan";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 5;

const DEFAULT_SPEC: &str = "warn,dayplan=info";

/// Picks the log spec: `DAYPLAN_LOG`, then `RUST_LOG`, then the default.
pub fn log_spec(env: impl Fn(&str) -> Option<String>) -> String {
    ["DAYPLAN_LOG", "RUST_LOG"]
        .iter()
        .find_map(|name| env(*name).filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_SPEC.to_string())
}

/// Starts file logging under `log_dir`. The returned handle flushes on drop,
/// so keep it alive for the whole command.
pub fn init_logging(log_dir: &Path) -> Result<LoggerHandle, FlexiLoggerError> {
    std::fs::create_dir_all(log_dir)?;

    let spec = log_spec(|name| std::env::var(name).ok());
    let handle = Logger::try_with_str(&spec)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .append()
        .start()?;

    log::debug!("logger initialized dir={} spec={spec}", log_dir.display());
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_prefers_dedicated_variable() {
        let spec = log_spec(|name| match name {
            "DAYPLAN_LOG" => Some("debug".to_string()),
            "RUST_LOG" => Some("trace".to_string()),
            _ => None,
        });
        assert_eq!(spec, "debug");
    }

    #[test]
    fn spec_skips_blank_values() {
        let spec = log_spec(|name| match name {
            "DAYPLAN_LOG" => Some("  ".to_string()),
            "RUST_LOG" => Some("warn".to_string()),
            _ => None,
        });
        assert_eq!(spec, "warn");
        assert_eq!(log_spec(|_| None), DEFAULT_SPEC);
    }
}
