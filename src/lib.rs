//! MCP tools bridging LLM tool calls to an external scraping executable.
//!
//! The server exposes four tools (`crawl_website`, `get_google_ai_summary`,
//! `scrape_law_page`, `google_search`). Each invocation flows through one
//! pipeline:
//!
//! 1. **Translate** — the validated parameter map becomes the executable's
//!    argument vector via a declarative mapping table ([`args`]).
//! 2. **Invoke** — the executable runs as a subprocess with a hard timeout
//!    and pinned working directory ([`invoke`]).
//! 3. **Classify** — the subprocess's JSON output (in any of its historical
//!    shapes) becomes a uniform success/error reply ([`classify`]).
//!
//! The pipeline is stateless per call and never lets a failure escape as
//! anything other than an error-flagged reply. The executable itself is
//! treated as an opaque, untrusted black box; no fetching, HTML parsing or
//! crawl logic lives in this crate.

pub mod args;
pub mod classify;
pub mod config;
pub mod invoke;
pub mod pipeline;
pub mod registry;
pub mod server;

pub use args::{ARG_TABLE, ArgEntry, ArgKind, build_args, build_args_with};
pub use classify::{ToolReply, classify};
pub use config::{ConfigError, ServerConfig};
pub use invoke::{Captured, EXECUTION_TIMEOUT, Invoker, ProcessOutcome};
pub use pipeline::ScraperPipeline;
pub use registry::{TOOLS, Task, ToolSpec, params_from};
pub use server::ScraperServer;
