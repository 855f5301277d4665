//! Serialized response shapes for the MCP tools.
//!
//! Every tool returns a single text payload containing pretty-printed JSON.
//! Optional fields that resolved to nothing are dropped from the output
//! rather than serialized as null.

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use sonarcloud_api::{IssueSearchOutcome, ProjectedIssue};

/// Payload of `fetch_sonarcloud_issues`.
#[derive(Debug, Serialize)]
pub struct FetchIssuesResponse {
  pub summary: FetchSummary,
  pub pagination: PaginationInfo,
  pub facets: Vec<serde_json::Value>,
  pub issues: Vec<ProjectedIssue>,
}

/// Request-level echo block: the server total plus the resolved credentials
/// context the query ran under.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSummary {
  pub total: u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub organization: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project_key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pull_request: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
  pub page: u32,
  pub page_size: u32,
  pub total: u64,
}

impl FetchIssuesResponse {
  pub fn new(outcome: IssueSearchOutcome, pull_request: Option<String>) -> Self {
    Self {
      summary: FetchSummary {
        total: outcome.total,
        organization: outcome.organization,
        project_key: outcome.project_key,
        pull_request,
      },
      pagination: PaginationInfo {
        page: outcome.paging.page_index,
        page_size: outcome.paging.page_size,
        total: outcome.paging.total,
      },
      facets: outcome.facets,
      issues: outcome.issues,
    }
  }
}

/// Serialize a payload into the single-text-content tool result.
pub fn to_json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
  let json = serde_json::to_string_pretty(value)
    .map_err(|e| McpError::internal_error(format!("Serialization failed: {e}"), None))?;
  Ok(CallToolResult::success(vec![Content::text(json)]))
}
