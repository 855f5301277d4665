//! Parameter structs for the issue tools.
//!
//! The derived JSON schemas are what MCP clients see in the tool listing;
//! the doc comments below double as the advertised field descriptions.

use schemars::JsonSchema;
use serde::Deserialize;
use sonarcloud_api::{ImpactSeverity, IssueQuery, IssueStatus};

/// Parameters of `fetch_sonarcloud_issues`: the full search query plus the
/// per-call token.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FetchIssuesParams {
  #[serde(flatten)]
  pub query: IssueQuery,
  /// SonarCloud API token (optional if set in environment).
  pub token: Option<String>,
}

/// Parameters of `summarize_sonarcloud_issues`: the restricted filter set
/// the summary tool accepts. Everything else is forced or defaulted.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeIssuesParams {
  /// Pull request id.
  pub pull_request: Option<String>,
  /// SonarCloud API token (optional if set in environment).
  pub token: Option<String>,
  /// Impact severities.
  pub impact_severities: Option<Vec<ImpactSeverity>>,
  /// Retrieve issues created since the leak period (default: false).
  pub since_leak_period: Option<bool>,
  /// Issue statuses.
  pub issue_statuses: Option<Vec<IssueStatus>>,
}

impl SummarizeIssuesParams {
  /// Split into the query the summarizer inherits and the per-call token.
  pub fn into_query(self) -> (IssueQuery, Option<String>) {
    let query = IssueQuery {
      pull_request: self.pull_request,
      impact_severities: self.impact_severities,
      since_leak_period: self.since_leak_period,
      issue_statuses: self.issue_statuses,
      ..Default::default()
    };
    (query, self.token)
  }
}
