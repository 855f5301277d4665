//! MCP server implementation with the tool handlers.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use sonarcloud_api::auth::MissingToken;
use sonarcloud_api::{IssueSummarizer, SonarCloudClient};

use crate::tools::issues::{FetchIssuesParams, SummarizeIssuesParams};
use crate::types::{FetchIssuesResponse, to_json_result};

#[derive(Clone)]
pub struct SonarCloudMcpServer {
  client: Arc<SonarCloudClient>,
  tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SonarCloudMcpServer {
  pub fn new() -> Self {
    Self::with_client(SonarCloudClient::new())
  }

  /// Build against an explicit client. Tests use this to target a mock
  /// server.
  pub fn with_client(client: SonarCloudClient) -> Self {
    Self {
      client: Arc::new(client),
      tool_router: Self::tool_router(),
    }
  }

  #[tool(
    description = "Fetch SonarCloud issues for a specific pull request",
    annotations(read_only_hint = true)
  )]
  async fn fetch_sonarcloud_issues(&self, params: Parameters<FetchIssuesParams>) -> Result<CallToolResult, McpError> {
    let FetchIssuesParams { query, token } = params.0;

    let outcome = self
      .client
      .search_issues(&query, token.as_deref())
      .await
      .map_err(map_search_error)?;

    to_json_result(&FetchIssuesResponse::new(outcome, query.pull_request))
  }

  #[tool(
    description = "Get a high-level summary of SonarCloud issues for a PR",
    annotations(read_only_hint = true)
  )]
  async fn summarize_sonarcloud_issues(
    &self,
    params: Parameters<SummarizeIssuesParams>,
  ) -> Result<CallToolResult, McpError> {
    let (query, token) = params.0.into_query();

    let summary = IssueSummarizer::new(&self.client)
      .summarize(&query, token.as_deref())
      .await
      .map_err(map_search_error)?;

    to_json_result(&summary)
  }
}

impl Default for SonarCloudMcpServer {
  fn default() -> Self {
    Self::new()
  }
}

#[tool_handler]
impl ServerHandler for SonarCloudMcpServer {
  fn get_info(&self) -> ServerInfo {
    ServerInfo {
      instructions: Some(
        "SonarCloud MCP server. Fetches and summarizes SonarCloud issues \
         for a project or pull request."
          .into(),
      ),
      capabilities: ServerCapabilities::builder().enable_tools().build(),
      ..Default::default()
    }
  }
}

/// Map a client error to the protocol error taxonomy: a missing token is a
/// configuration problem on the caller's side, everything else is upstream.
fn map_search_error(err: anyhow::Error) -> McpError {
  if err.is::<MissingToken>() {
    McpError::invalid_params(err.to_string(), None)
  } else {
    McpError::internal_error(format!("{err:#}"), None)
  }
}
