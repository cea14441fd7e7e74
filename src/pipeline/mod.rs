//! The translate → invoke → classify pipeline.
//!
//! Stateless per call: each invocation builds one argument vector, spawns one
//! subprocess and classifies its output. The only shared resource is the
//! admission gate bounding how many subprocesses run at once, which protects
//! the host from a high-rate caller without changing the per-call contract.

use serde_json::{Map, Value};
use tokio::sync::Semaphore;

use crate::args::build_args;
use crate::classify::{ToolReply, classify};
use crate::config::ServerConfig;
use crate::invoke::Invoker;
use crate::registry::Task;

pub struct ScraperPipeline {
    invoker: Invoker,
    gate: Semaphore,
}

impl ScraperPipeline {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            invoker: Invoker::new(config),
            gate: Semaphore::new(config.max_concurrent_tasks()),
        }
    }

    /// Replace the invoker; used by tests to shorten the timeout.
    #[must_use]
    pub fn with_invoker(mut self, invoker: Invoker) -> Self {
        self.invoker = invoker;
        self
    }

    /// Run one task invocation to completion.
    ///
    /// Always yields a [`ToolReply`]; every internal failure mode is folded
    /// into an error-flagged reply rather than propagated.
    pub async fn run(&self, task: Task, params: &Map<String, Value>) -> ToolReply {
        let task_name = task.cli_name();
        let args = build_args(task_name, params);
        tracing::debug!(task = task_name, argv = ?args, "invoking scraping executable");

        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return ToolReply::error(format!(
                    "Task '{task_name}' rejected: worker gate closed during shutdown"
                ));
            }
        };

        let outcome = self.invoker.run(&args).await;
        let reply = classify(task_name, &outcome);
        if reply.is_error {
            tracing::warn!(task = task_name, "task invocation returned an error reply");
        } else {
            tracing::debug!(task = task_name, "task invocation succeeded");
        }
        reply
    }
}
