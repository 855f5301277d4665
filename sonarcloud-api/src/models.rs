//! # SonarCloud API Models
//!
//! Serde models for the issue-search endpoint: the raw response shapes,
//! the reduced projection included in tool output, and the aggregate
//! summary derived from one page of issues.

use serde::{Deserialize, Serialize};

/// An issue as returned by the search endpoint. Sourced entirely from the
/// remote response and never constructed locally.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
  pub key: String,
  pub rule: String,
  pub severity: String,
  pub component: String,
  pub project: Option<String>,
  pub line: Option<u32>,
  pub status: String,
  pub message: String,
  pub effort: Option<String>,
  pub debt: Option<String>,
  pub tags: Option<Vec<String>>,
  pub creation_date: String,
  pub update_date: String,
  #[serde(rename = "type")]
  pub issue_type: String,
}

impl RawIssue {
  /// Narrow to the subset of fields the fetch tool returns. Fields absent on
  /// the raw record stay absent on the projection.
  pub fn project_fields(&self) -> ProjectedIssue {
    ProjectedIssue {
      key: self.key.clone(),
      rule: self.rule.clone(),
      severity: self.severity.clone(),
      issue_type: self.issue_type.clone(),
      status: self.status.clone(),
      message: self.message.clone(),
      component: self.component.clone(),
      line: self.line,
      effort: self.effort.clone(),
      tags: self.tags.clone(),
      creation_date: self.creation_date.clone(),
      update_date: self.update_date.clone(),
    }
  }
}

/// The reduced issue shape included in tool output. A pure narrowing
/// projection of [`RawIssue`] with no derived fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedIssue {
  pub key: String,
  pub rule: String,
  pub severity: String,
  #[serde(rename = "type")]
  pub issue_type: String,
  pub status: String,
  pub message: String,
  pub component: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub line: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub effort: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tags: Option<Vec<String>>,
  pub creation_date: String,
  pub update_date: String,
}

/// Pagination block of the search response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
  pub page_index: u32,
  pub page_size: u32,
  pub total: u64,
}

/// Body of a successful issue-search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
  pub total: u64,
  pub paging: Paging,
  pub effort_total: Option<u64>,
  pub debt_total: Option<u64>,
  pub issues: Vec<RawIssue>,
  /// Server-computed aggregate breakdowns, passed through verbatim.
  #[serde(default)]
  pub facets: Vec<serde_json::Value>,
}

/// Aggregate statistics over one page of issues.
///
/// `low_impact_issues` and `info_issues` both count INFO-severity issues;
/// the same INFO issue increments both buckets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
  pub total_issues: u64,
  pub critical_issues: u64,
  pub high_impact_issues: u64,
  pub medium_impact_issues: u64,
  pub low_impact_issues: u64,
  pub info_issues: u64,
  pub bug_count: u64,
  pub vulnerability_count: u64,
  pub code_smell_count: u64,
  pub security_hotspot_count: u64,
  pub open_issues: u64,
  pub confirmed_issues: u64,
  pub total_debt: String,
  pub total_effort: String,
  pub top_rules: Vec<RuleCount>,
  pub files_affected: u64,
}

/// One entry of the top-rules histogram.
#[derive(Debug, Serialize)]
pub struct RuleCount {
  pub rule: String,
  pub count: u64,
}
