//! Static registry mapping protocol-visible tool names to the task
//! identifiers of the external scraping executable.

pub mod schema;

pub use schema::{
    BrowserType, CrawlWebsiteArgs, GoogleAiSummaryArgs, GoogleSearchArgs, ScrapeLawPageArgs,
};

use serde::Serialize;
use serde_json::{Map, Value};

/// Task identifiers understood by the executable's `--task` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Crawl,
    GoogleAi,
    LawScraper,
    GoogleSearch,
}

impl Task {
    /// Value passed after `--task` on the command line.
    pub fn cli_name(self) -> &'static str {
        match self {
            Task::Crawl => "crawl",
            Task::GoogleAi => "google_ai",
            Task::LawScraper => "law_scraper",
            Task::GoogleSearch => "google_search",
        }
    }
}

/// One registry row: protocol tool name and its backing task.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub tool_name: &'static str,
    pub task: Task,
}

/// Every tool this server exposes, 1:1 with a task.
pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        tool_name: "crawl_website",
        task: Task::Crawl,
    },
    ToolSpec {
        tool_name: "get_google_ai_summary",
        task: Task::GoogleAi,
    },
    ToolSpec {
        tool_name: "scrape_law_page",
        task: Task::LawScraper,
    },
    ToolSpec {
        tool_name: "google_search",
        task: Task::GoogleSearch,
    },
];

/// Serialize validated tool arguments into the parameter map the translator
/// consumes. Absent optionals are skipped during serialization, so they never
/// reach the argument vector.
pub fn params_from<T: Serialize>(args: &T) -> Map<String, Value> {
    match serde_json::to_value(args) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => Map::new(),
    }
}
