//! Input schemas for the registered tools.
//!
//! These structs are the declared MCP input schemas (via `schemars`) and the
//! source of the parameter map handed to the translator. Optional fields
//! skip serialization when absent so task defaults inside the executable
//! apply.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Browser engine selector for tasks that support more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    Chromium,
    Firefox,
    Webkit,
}

/// Arguments for the `crawl_website` tool (task `crawl`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CrawlWebsiteArgs {
    /// The starting URL for crawling (must be a valid URL).
    pub url: String,
    /// CSS selector for links to follow (e.g. 'a', '.content a').
    pub selector: String,
    /// Maximum crawl depth from the start URL. Task default when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Maximum number of parallel browser tasks. Task default when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<u32>,
    /// Operation timeout in milliseconds for page loads/actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Whether to apply stealth measures for bot-detection evasion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_stealth: Option<bool>,
    /// Whether to run the browser in headless mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless_mode: Option<bool>,
    /// Whether to ignore the website's robots.txt file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_robots_txt: Option<bool>,
    /// Custom user agent string to use for crawling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Delay in seconds between requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_delay: Option<f64>,
    /// If true, allows crawling to external domains; otherwise the crawl is
    /// restricted to the start URL's domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_samedomain: Option<bool>,
    /// If true, only follow links inside the page's main content area,
    /// ignoring headers, footers and sidebars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_content_only: Option<bool>,
}

/// Arguments for the `get_google_ai_summary` tool (task `google_ai`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GoogleAiSummaryArgs {
    /// The search query string for Google.
    pub query: String,
    /// Whether to run the browser in headless mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless_mode: Option<bool>,
    /// Seconds to wait and display results in headed mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_seconds: Option<u32>,
}

/// Arguments for the `scrape_law_page` tool (task `law_scraper`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeLawPageArgs {
    /// The URL of the law page to scrape.
    pub url: String,
    /// The keyword to search for within the law text.
    pub keyword: String,
    /// CSS selector to wait for before parsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_selector: Option<String>,
    /// Whether to run the browser in headless mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless_mode: Option<bool>,
    /// Operation timeout in milliseconds for page loads/actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Browser engine to use (default chromium).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_type: Option<BrowserType>,
    /// Characters of context before and after the keyword in each snippet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    /// Distance between keyword occurrences below which snippets merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_threshold: Option<u32>,
}

/// Arguments for the `google_search` tool (task `google_search`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GoogleSearchArgs {
    /// The search query string for Google.
    pub query: String,
    /// Number of search result pages to process (default 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_pages: Option<u32>,
    /// Maximum number of parallel browser tasks for result pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<u32>,
    /// Operation timeout in milliseconds for page loads/actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Whether to run the browser in headless mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless_mode: Option<bool>,
}
