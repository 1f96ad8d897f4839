//! Debug trace logging for MCP tool calls.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Writes tool calls, results and errors to stderr and a trace file when enabled.
pub struct DebugLogger {
    enabled: bool,
    trace_file: Option<Mutex<File>>,
    trace_path: Option<PathBuf>,
}

impl DebugLogger {
    /// Create a new debug logger. When enabled, opens a timestamped trace
    /// file under `/tmp`.
    pub fn new(enabled: bool) -> Self {
        let (trace_file, trace_path) = if enabled {
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            let path = PathBuf::from(format!("/tmp/contentstack_mcp_trace_{}.log", timestamp));
            match OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
            {
                Ok(file) => (Some(Mutex::new(file)), Some(path)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to create trace file");
                    (None, None)
                }
            }
        } else {
            (None, None)
        };

        Self {
            enabled,
            trace_file,
            trace_path,
        }
    }

    /// Logger that records nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            trace_file: None,
            trace_path: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn trace_path(&self) -> Option<&PathBuf> {
        self.trace_path.as_ref()
    }

    /// Log a message to stderr and the trace file.
    pub fn log(&self, message: &str) {
        if !self.enabled {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let formatted = format!("[{}] {}", timestamp, message);

        eprintln!("{}", formatted);

        if let Some(ref file) = self.trace_file {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{}", formatted);
                let _ = f.flush();
            }
        }
    }

    pub fn log_tool_call(&self, tool_name: &str, params: &serde_json::Value) {
        if !self.enabled {
            return;
        }

        self.log(&format!(
            "TOOL CALL: {} | params: {}",
            tool_name,
            truncate_json(params, 1000)
        ));
    }

    pub fn log_tool_result(&self, tool_name: &str, result: &serde_json::Value) {
        if !self.enabled {
            return;
        }

        self.log(&format!(
            "TOOL RESULT: {} | result: {}",
            tool_name,
            truncate_json(result, 1000)
        ));
    }

    pub fn log_error(&self, context: &str, error: &str) {
        if !self.enabled {
            return;
        }

        self.log(&format!("ERROR [{}]: {}", context, error));
    }
}

impl std::fmt::Debug for DebugLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugLogger")
            .field("enabled", &self.enabled)
            .field("trace_path", &self.trace_path)
            .finish()
    }
}

/// Truncate a JSON value's text form to at most `max_len` bytes.
fn truncate_json(value: &serde_json::Value, max_len: usize) -> String {
    let s = value.to_string();
    if s.len() <= max_len {
        return s;
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...(truncated)", &s[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_short_value_untouched() {
        assert_eq!(truncate_json(&json!({"a": 1}), 100), r#"{"a":1}"#);
    }

    #[test]
    fn test_truncate_long_value() {
        let value = json!({"title": "x".repeat(50)});
        let out = truncate_json(&value, 10);
        assert!(out.ends_with("...(truncated)"));
        assert_eq!(out.len(), 10 + "...(truncated)".len());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let value = json!("ééééé");
        let out = truncate_json(&value, 4);
        assert!(out.ends_with("...(truncated)"));
    }

    #[test]
    fn test_disabled_logger_has_no_trace_file() {
        let logger = DebugLogger::new(false);
        assert!(!logger.is_enabled());
        assert!(logger.trace_path().is_none());
        logger.log("ignored");
    }
}
