//! Translation of validated tool parameters into the argument vector of the
//! external scraping executable.
//!
//! The mapping is a declarative table consumed by one generic loop. Every
//! entry records the exact external spelling of its flag token, because the
//! executable's CLI grew up with inconsistent conventions (some flags keep
//! underscores, some use hyphens) and the spelling cannot be derived from the
//! parameter name alone.
//!
//! Translation is pure: no I/O, no state, same input always yields the same
//! vector. Values are never shell-quoted here; the invoker passes the vector
//! as discrete tokens.

use serde_json::{Map, Value};

/// Flag requesting machine-readable JSON on stdout, always part of the
/// preamble.
pub const OUTPUT_FORMAT_FLAG: &str = "--output-stdout-json";

/// Task selector flag, always the first token of the vector.
pub const TASK_FLAG: &str = "--task";

/// How a single parameter translates to external tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Presence-only boolean. `true` appends the token; `false` appends the
    /// negated token if one is declared, otherwise nothing.
    Flag {
        token: &'static str,
        negated: Option<&'static str>,
    },
    /// Value parameter whose external flag differs from the parameter name.
    Renamed { token: &'static str },
    /// Value parameter whose external flag is the parameter name, with the
    /// exact spelling (underscores vs. hyphens) recorded per entry.
    Identity { token: &'static str },
}

/// One row of the translation table.
#[derive(Debug, Clone, Copy)]
pub struct ArgEntry {
    pub name: &'static str,
    pub kind: ArgKind,
}

/// Static translation table for every parameter the registered tools declare.
///
/// The current executable declares no negated flag spellings; the `negated`
/// slot exists so a future `--no-*` counterpart is a table edit, not a code
/// change.
pub const ARG_TABLE: &[ArgEntry] = &[
    // Presence-only flags.
    ArgEntry {
        name: "headless_mode",
        kind: ArgKind::Flag {
            token: "--headless",
            negated: None,
        },
    },
    ArgEntry {
        name: "apply_stealth",
        kind: ArgKind::Flag {
            token: "--stealth",
            negated: None,
        },
    },
    ArgEntry {
        name: "no_samedomain",
        kind: ArgKind::Flag {
            token: "--no-samedomain",
            negated: None,
        },
    },
    ArgEntry {
        name: "ignore_robots_txt",
        kind: ArgKind::Flag {
            token: "--ignore_robots_txt",
            negated: None,
        },
    },
    ArgEntry {
        name: "main_content_only",
        kind: ArgKind::Flag {
            token: "--main-content-only",
            negated: None,
        },
    },
    // Value parameters with a renamed external flag.
    ArgEntry {
        name: "wait_seconds",
        kind: ArgKind::Renamed { token: "--wait" },
    },
    ArgEntry {
        name: "search_pages",
        kind: ArgKind::Renamed {
            token: "--search-pages",
        },
    },
    // Value parameters keeping their own name; spelling per the executable's
    // help text.
    ArgEntry {
        name: "max_depth",
        kind: ArgKind::Identity {
            token: "--max_depth",
        },
    },
    ArgEntry {
        name: "request_delay",
        kind: ArgKind::Identity {
            token: "--request_delay",
        },
    },
    ArgEntry {
        name: "user_agent",
        kind: ArgKind::Identity {
            token: "--user_agent",
        },
    },
    ArgEntry {
        name: "wait_selector",
        kind: ArgKind::Identity {
            token: "--wait_selector",
        },
    },
    ArgEntry {
        name: "browser_type",
        kind: ArgKind::Identity {
            token: "--browser_type",
        },
    },
    ArgEntry {
        name: "context_window",
        kind: ArgKind::Identity {
            token: "--context_window",
        },
    },
    ArgEntry {
        name: "merge_threshold",
        kind: ArgKind::Identity {
            token: "--merge_threshold",
        },
    },
    ArgEntry {
        name: "url",
        kind: ArgKind::Identity { token: "--url" },
    },
    ArgEntry {
        name: "selector",
        kind: ArgKind::Identity {
            token: "--selector",
        },
    },
    ArgEntry {
        name: "parallel",
        kind: ArgKind::Identity {
            token: "--parallel",
        },
    },
    ArgEntry {
        name: "timeout",
        kind: ArgKind::Identity { token: "--timeout" },
    },
    ArgEntry {
        name: "query",
        kind: ArgKind::Identity { token: "--query" },
    },
    ArgEntry {
        name: "keyword",
        kind: ArgKind::Identity { token: "--keyword" },
    },
];

/// Build the argument vector for `task` from validated parameters, using the
/// static [`ARG_TABLE`].
pub fn build_args(task: &str, params: &Map<String, Value>) -> Vec<String> {
    build_args_with(ARG_TABLE, task, params)
}

/// Table-parameterized translation loop. Exposed so tests can exercise table
/// variants (e.g. negated flag spellings) without touching the static table.
pub fn build_args_with(
    table: &[ArgEntry],
    task: &str,
    params: &Map<String, Value>,
) -> Vec<String> {
    let mut args = vec![
        TASK_FLAG.to_string(),
        task.to_string(),
        OUTPUT_FORMAT_FLAG.to_string(),
    ];

    for (name, value) in params {
        if value.is_null() {
            continue;
        }
        // The output format is fixed by the preamble; never forward a caller
        // attempt to control it.
        if name == "output_stdout_json" {
            continue;
        }

        match table.iter().find(|entry| entry.name == name) {
            Some(ArgEntry {
                kind: ArgKind::Flag { token, negated },
                ..
            }) => match value.as_bool() {
                Some(true) => args.push((*token).to_string()),
                Some(false) => {
                    if let Some(negated) = negated {
                        args.push((*negated).to_string());
                    }
                }
                // Schema validation guarantees a boolean; anything else is
                // treated as absent.
                None => {
                    tracing::warn!(task, parameter = %name, "non-boolean value for flag parameter, skipping");
                }
            },
            Some(ArgEntry {
                kind: ArgKind::Renamed { token } | ArgKind::Identity { token },
                ..
            }) => {
                args.push((*token).to_string());
                args.push(stringify(value));
            }
            None => {
                // Unknown parameters are forwarded with generic spelling so
                // forward-compatible schema additions are not silently lost.
                tracing::warn!(
                    task,
                    parameter = %name,
                    "no declared mapping for parameter, forwarding as --{}",
                    name.replace('_', "-")
                );
                args.push(format!("--{}", name.replace('_', "-")));
                args.push(stringify(value));
            }
        }
    }

    args
}

/// Canonical textual form of a parameter value: bare string content, decimal
/// numbers, `true`/`false` booleans.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
