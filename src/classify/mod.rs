//! Normalization of subprocess output into a uniform tool reply.
//!
//! The external executable's JSON contract has drifted across task types:
//! some wrap payloads under `task_output_data`, some under
//! `details.task_output_data`, some emit bare data with no `status` field at
//! all. The classifier tolerates every observed shape through one ordered
//! probe chain instead of per-task branching.
//!
//! Classification is pure and total: every [`ProcessOutcome`] maps to a
//! reply, nothing is thrown past this boundary.

use serde_json::{Map, Value};

use crate::invoke::{Captured, ProcessOutcome};

/// Maximum characters of raw output echoed back when stdout is not valid
/// JSON.
pub const RAW_PREFIX_LIMIT: usize = 500;

/// Maximum characters per stream snippet in process-failure messages.
const SNIPPET_LIMIT: usize = 1000;

const STATUS_FIELD: &str = "status";
const SUCCESS_STATUS: &str = "success";
const MESSAGE_FIELD: &str = "message";
const OUTPUT_DATA_FIELD: &str = "task_output_data";
const DETAILS_FIELD: &str = "details";

/// The externally visible outcome of one invocation: an error flag plus the
/// text block handed back to the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReply {
    pub is_error: bool,
    pub text: String,
}

impl ToolReply {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            text: text.into(),
        }
    }
}

/// Classify a finished subprocess run for `task`.
///
/// Any outcome other than a clean exit short-circuits to an error reply
/// carrying the cause plus bounded stream snippets; only exit code 0
/// proceeds to stdout parsing.
pub fn classify(task: &str, outcome: &ProcessOutcome) -> ToolReply {
    match outcome {
        ProcessOutcome::Exited { code: 0, captured } => classify_stdout(task, captured),
        other => failure_reply(task, other),
    }
}

fn classify_stdout(task: &str, captured: &Captured) -> ToolReply {
    let stdout = String::from_utf8_lossy(&captured.stdout);
    let trimmed = stdout.trim();

    if trimmed.is_empty() {
        let stderr = String::from_utf8_lossy(&captured.stderr);
        let stderr = stderr.trim();
        return ToolReply::error(format!(
            "Task '{task}' produced no output. Stderr (if any): {}",
            if stderr.is_empty() { "(empty)" } else { stderr }
        ));
    }

    let parsed: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(error) => {
            return ToolReply::error(format!(
                "Could not parse task '{task}' output as JSON: {error}. \
                 Raw output (first {RAW_PREFIX_LIMIT} chars):\n{}",
                truncate(trimmed, RAW_PREFIX_LIMIT)
            ));
        }
    };

    match parsed {
        Value::Object(object) => classify_object(task, object),
        other => ToolReply::error(format!(
            "Task '{task}' output parsed to an unexpected non-object JSON value ({}).",
            json_type_name(&other)
        )),
    }
}

fn classify_object(task: &str, object: Map<String, Value>) -> ToolReply {
    let Some(status) = object.get(STATUS_FIELD).cloned() else {
        // Direct-data convention: tasks that don't wrap their output.
        return ToolReply::success(Value::Object(object).to_string());
    };

    if status == SUCCESS_STATUS {
        let payload = success_payload(&object).map(|value| value.to_string());
        let text = payload.unwrap_or_else(|| Value::Object(object).to_string());
        return ToolReply::success(text);
    }

    // Application-level failure reported through the status field: prefer the
    // tool's own message, keep the full object for caller inspection.
    let message = object
        .get(MESSAGE_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "Task '{task}' reported status: {}",
                status_label(&status)
            )
        });
    let full = Value::Object(object).to_string();
    ToolReply::error(format!("{message}\nFull task output: {full}"))
}

/// Ordered probe over the historical payload locations. First hit wins; the
/// caller falls back to the whole object when all probes miss.
fn success_payload(object: &Map<String, Value>) -> Option<&Value> {
    if let Some(data) = object.get(OUTPUT_DATA_FIELD) {
        return Some(data);
    }
    let details = object.get(DETAILS_FIELD)?;
    if let Some(data) = details.get(OUTPUT_DATA_FIELD) {
        return Some(data);
    }
    Some(details)
}

fn failure_reply(task: &str, outcome: &ProcessOutcome) -> ToolReply {
    let mut text = format!("Failed to execute task '{task}'.");
    let captured = match outcome {
        ProcessOutcome::Exited { code, captured } => {
            text.push_str(&format!(" Process exited with code {code}."));
            Some(captured)
        }
        ProcessOutcome::Signaled { signal, captured } => {
            match signal {
                Some(signal) => {
                    text.push_str(&format!(" Process was terminated by signal {signal}."));
                }
                None => text.push_str(" Process was terminated by a signal."),
            }
            Some(captured)
        }
        ProcessOutcome::TimedOut { elapsed, captured } => {
            text.push_str(&format!(
                " Process timed out after {:.1}s and was killed.",
                elapsed.as_secs_f64()
            ));
            Some(captured)
        }
        ProcessOutcome::SpawnFailed { error } => {
            text.push_str(&format!(" Failed to start process: {error}."));
            None
        }
    };

    if let Some(captured) = captured {
        append_stream_snippet(&mut text, "stdout", &captured.stdout);
        append_stream_snippet(&mut text, "stderr", &captured.stderr);
    }

    ToolReply::error(text)
}

fn append_stream_snippet(text: &mut String, label: &str, bytes: &[u8]) {
    let decoded = String::from_utf8_lossy(bytes);
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        return;
    }
    text.push_str(&format!(
        "\n--- {label} (first {SNIPPET_LIMIT} chars) ---\n{}",
        truncate(trimmed, SNIPPET_LIMIT)
    ));
}

fn status_label(status: &Value) -> String {
    match status {
        Value::String(label) => label.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truncate on a character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "日本語のテキスト";
        assert_eq!(truncate(text, 3), "日本語");
        assert_eq!(truncate(text, 100), text);
    }

    #[test]
    fn status_label_unwraps_strings() {
        assert_eq!(status_label(&Value::String("failed".into())), "failed");
        assert_eq!(status_label(&serde_json::json!(3)), "3");
    }
}
