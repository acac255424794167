pub mod catalog;
pub mod chat;
pub mod config;

use clichat_core::config::ConfigError;
use serde::Serialize;

/// Exit code for configuration that fails to load or validate.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for failures after configuration loaded.
pub const EXIT_RUNTIME: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

/// JSON status line printed by commands that have no report of their own.
#[derive(Debug, Serialize)]
struct StatusLine<'a> {
    command: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<&'a str>,
    message: &'a str,
}

impl CommandResult {
    /// Successful command whose output is a human-readable report.
    pub fn report(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn success(command: &str, message: &str) -> Self {
        let line = StatusLine { command, status: "ok", error_class: None, message };
        Self { exit_code: 0, output: render_status(&line) }
    }

    pub fn failure(command: &str, error_class: &str, message: &str, exit_code: u8) -> Self {
        let line = StatusLine { command, status: "error", error_class: Some(error_class), message };
        Self { exit_code, output: render_status(&line) }
    }

    pub fn config_failure(command: &str, error: &ConfigError) -> Self {
        let message = format!("config validation failed: {error}");
        Self::failure(command, "config_validation", &message, EXIT_CONFIG)
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

fn render_status(line: &StatusLine<'_>) -> String {
    match serde_json::to_string(line) {
        Ok(json) => json,
        Err(error) => format!("{}: {} ({error})", line.command, line.status),
    }
}
