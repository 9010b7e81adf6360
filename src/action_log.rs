//! Action logging for td commands.
//!
//! Appends one JSONL record per CLI invocation to `<data-dir>/actions.log`:
//! command name, arguments, success, and duration. This is an audit trail
//! for debugging, not an undo mechanism.
//!
//! Logging is best-effort and never fails the command. Set `TD_ACTION_LOG=0`
//! to disable it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the action log within the data directory.
pub const ACTION_LOG_FILE: &str = "actions.log";

/// A single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// When the action occurred
    pub timestamp: DateTime<Utc>,

    /// Command name (e.g., "list create", "item done")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,
}

/// Log an action to `<data-dir>/actions.log`.
///
/// Silently skips when the data directory does not exist (nothing has been
/// initialized, so there is nowhere to log) and warns on stderr at most for
/// any other failure.
pub fn log_action(
    data_dir: &Path,
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) {
    if std::env::var("TD_ACTION_LOG").is_ok_and(|v| v == "0") {
        return;
    }
    if !data_dir.exists() {
        return;
    }

    let entry = ActionLog {
        timestamp: Utc::now(),
        command: command.to_string(),
        args,
        success,
        error,
        duration_ms,
    };

    if let Err(e) = write_log_entry(&data_dir.join(ACTION_LOG_FILE), &entry) {
        eprintln!("Warning: failed to write action log: {}", e);
    }
}

fn write_log_entry(path: &Path, entry: &ActionLog) -> std::io::Result<()> {
    let line = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}
