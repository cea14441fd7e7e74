//! MCP server surface: four tools routed through the shared pipeline and
//! served over stateless streamable HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use crate::classify::ToolReply;
use crate::config::ServerConfig;
use crate::pipeline::ScraperPipeline;
use crate::registry::{
    CrawlWebsiteArgs, GoogleAiSummaryArgs, GoogleSearchArgs, ScrapeLawPageArgs, Task, params_from,
};

#[derive(Clone)]
pub struct ScraperServer {
    pipeline: Arc<ScraperPipeline>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ScraperServer {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_pipeline(Arc::new(ScraperPipeline::new(config)))
    }

    pub fn with_pipeline(pipeline: Arc<ScraperPipeline>) -> Self {
        Self {
            pipeline,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "crawl_website",
        description = "Crawl a website starting from the given URL and collect links, e-mail addresses and phone numbers. Depth, parallelism and same-domain restriction are configurable."
    )]
    async fn crawl_website(
        &self,
        params: Parameters<CrawlWebsiteArgs>,
    ) -> Result<CallToolResult, McpError> {
        let reply = self.pipeline.run(Task::Crawl, &params_from(&params.0)).await;
        Ok(call_result(reply))
    }

    #[tool(
        name = "get_google_ai_summary",
        description = "Run a Google search for the given query and collect every source URL referenced by the AI-generated overview. Suited to SEO analysis."
    )]
    async fn get_google_ai_summary(
        &self,
        params: Parameters<GoogleAiSummaryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let reply = self
            .pipeline
            .run(Task::GoogleAi, &params_from(&params.0))
            .await;
        Ok(call_result(reply))
    }

    #[tool(
        name = "scrape_law_page",
        description = "Search a statute page for a keyword and extract the matching provisions together with their surrounding context and section hierarchy."
    )]
    async fn scrape_law_page(
        &self,
        params: Parameters<ScrapeLawPageArgs>,
    ) -> Result<CallToolResult, McpError> {
        let reply = self
            .pipeline
            .run(Task::LawScraper, &params_from(&params.0))
            .await;
        Ok(call_result(reply))
    }

    #[tool(
        name = "google_search",
        description = "Run a Google search for the given query, collect both the AI overview and the organic results, then visit the result pages and extract body content, e-mail addresses and phone numbers."
    )]
    async fn google_search(
        &self,
        params: Parameters<GoogleSearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let reply = self
            .pipeline
            .run(Task::GoogleSearch, &params_from(&params.0))
            .await;
        Ok(call_result(reply))
    }
}

#[tool_handler]
impl ServerHandler for ScraperServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tools that drive an external scraping executable: website crawling, \
                 Google search harvesting and statute-page keyword extraction. Results \
                 are JSON in a single text block; inspect the error flag of each call."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Convert a pipeline reply into the protocol result envelope. Failures stay
/// inside the envelope (error flag set); they never become transport errors.
fn call_result(reply: ToolReply) -> CallToolResult {
    let content = vec![Content::text(reply.text)];
    if reply.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// Serve the MCP tools over streamable HTTP at `/mcp` until ctrl-c.
pub async fn serve_http(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    let pipeline = Arc::new(ScraperPipeline::new(&config));

    let service = StreamableHttpService::new(
        move || Ok(ScraperServer::with_pipeline(pipeline.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "scraper-bridge listening (streamable HTTP at /mcp)");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
