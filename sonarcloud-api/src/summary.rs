//! # Issue Summarization
//!
//! Reduces one page of search results into aggregate statistics: severity
//! buckets, type and status counts, a top-10 rule histogram, and the number
//! of distinct components affected.
//!
//! Known limitation, preserved deliberately: the summarizer fetches a single
//! page of at most [`MAX_PAGE_SIZE`] issues. When the true total exceeds
//! that, aggregates cover only the first page and the truncation is not
//! signalled to the caller.

use anyhow::Result;

use crate::client::SonarCloudClient;
use crate::consts::MAX_PAGE_SIZE;
use crate::endpoints::issues::IssueSearchOutcome;
use crate::models::{IssueSummary, ProjectedIssue, RuleCount};
use crate::query::{AdditionalField, Facet, IssueQuery};

/// Facets the summarizer always requests, regardless of caller input.
const SUMMARY_FACETS: [Facet; 4] = [Facet::IssueStatuses, Facet::ImpactSeverities, Facet::Types, Facet::Rules];

/// Computes issue summaries by fetching through a [`SonarCloudClient`].
///
/// Holds the fetch component explicitly so the override semantics — which
/// query fields are forced and which are inherited from the caller — stay
/// visible and testable.
pub struct IssueSummarizer<'a> {
  client: &'a SonarCloudClient,
}

impl<'a> IssueSummarizer<'a> {
  pub fn new(client: &'a SonarCloudClient) -> Self {
    Self { client }
  }

  /// Fetch one wide page with forced parameters and aggregate it.
  ///
  /// The caller's filters are inherited; `additionalFields`, `facets`, and
  /// the page size are overridden unconditionally.
  pub async fn summarize(&self, query: &IssueQuery, token: Option<&str>) -> Result<IssueSummary> {
    let outcome = self.client.search_issues(&self.forced_query(query), token).await?;
    Ok(aggregate(&outcome))
  }

  fn forced_query(&self, query: &IssueQuery) -> IssueQuery {
    let mut forced = query.clone();
    forced.additional_fields = Some(vec![AdditionalField::All]);
    forced.facets = Some(SUMMARY_FACETS.to_vec());
    forced.ps = Some(MAX_PAGE_SIZE);
    forced
  }
}

/// Compute every summary field from a search outcome.
///
/// Severity buckets partition the legacy severity scale four ways, except
/// that an INFO issue increments both the low-impact and info buckets.
pub fn aggregate(outcome: &IssueSearchOutcome) -> IssueSummary {
  let issues = &outcome.issues;
  let count_severity = |severities: &[&str]| {
    issues.iter().filter(|i| severities.contains(&i.severity.as_str())).count() as u64
  };
  let count_type = |t: &str| issues.iter().filter(|i| i.issue_type == t).count() as u64;
  let count_status = |s: &str| issues.iter().filter(|i| i.status == s).count() as u64;

  let files_affected = {
    let components: std::collections::HashSet<&str> = issues.iter().map(|i| i.component.as_str()).collect();
    components.len() as u64
  };

  IssueSummary {
    total_issues: outcome.total,
    critical_issues: count_severity(&["BLOCKER"]),
    high_impact_issues: count_severity(&["CRITICAL", "MAJOR"]),
    medium_impact_issues: count_severity(&["MINOR"]),
    low_impact_issues: count_severity(&["INFO"]),
    info_issues: count_severity(&["INFO"]),
    bug_count: count_type("BUG"),
    vulnerability_count: count_type("VULNERABILITY"),
    code_smell_count: count_type("CODE_SMELL"),
    security_hotspot_count: count_type("SECURITY_HOTSPOT"),
    open_issues: count_status("OPEN"),
    confirmed_issues: count_status("CONFIRMED"),
    total_debt: outcome.debt_total.map_or_else(|| "0".to_string(), |v| v.to_string()),
    total_effort: outcome.effort_total.map_or_else(|| "0".to_string(), |v| v.to_string()),
    top_rules: top_rules(issues),
    files_affected,
  }
}

/// Tally rule occurrences and keep the ten most frequent.
///
/// The tally preserves first-seen order and the sort is stable, so rules
/// with equal counts stay in the order they were first encountered.
fn top_rules(issues: &[ProjectedIssue]) -> Vec<RuleCount> {
  let mut tally: Vec<(String, u64)> = Vec::new();
  for issue in issues {
    match tally.iter_mut().find(|(rule, _)| *rule == issue.rule) {
      Some((_, count)) => *count += 1,
      None => tally.push((issue.rule.clone(), 1)),
    }
  }

  tally.sort_by(|a, b| b.1.cmp(&a.1));
  tally
    .into_iter()
    .take(10)
    .map(|(rule, count)| RuleCount { rule, count })
    .collect()
}

#[cfg(test)]
mod tests {
  use sonarcloud_test_utils::EnvSandbox;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::auth::{ENV_ORGANISATION, ENV_ORGANIZATION, ENV_PROJECT_KEY, ENV_TOKEN};
  use crate::models::Paging;

  const ALL_VARS: &[&str] = &[ENV_TOKEN, ENV_ORGANIZATION, ENV_ORGANISATION, ENV_PROJECT_KEY];

  fn issue(key: &str, rule: &str, severity: &str, issue_type: &str, status: &str, component: &str) -> ProjectedIssue {
    ProjectedIssue {
      key: key.to_string(),
      rule: rule.to_string(),
      severity: severity.to_string(),
      issue_type: issue_type.to_string(),
      status: status.to_string(),
      message: "m".to_string(),
      component: component.to_string(),
      line: None,
      effort: None,
      tags: None,
      creation_date: "2024-01-15T10:00:00+0000".to_string(),
      update_date: "2024-01-15T10:00:00+0000".to_string(),
    }
  }

  fn outcome_with(issues: Vec<ProjectedIssue>) -> IssueSearchOutcome {
    let total = issues.len() as u64;
    IssueSearchOutcome {
      total,
      organization: None,
      project_key: None,
      paging: Paging {
        page_index: 1,
        page_size: 500,
        total,
      },
      effort_total: None,
      debt_total: None,
      facets: Vec::new(),
      issues,
    }
  }

  #[test]
  fn severity_buckets_partition_with_info_counted_twice() {
    let outcome = outcome_with(vec![
      issue("1", "r", "BLOCKER", "BUG", "OPEN", "a"),
      issue("2", "r", "CRITICAL", "BUG", "OPEN", "a"),
      issue("3", "r", "MAJOR", "BUG", "OPEN", "a"),
      issue("4", "r", "MINOR", "BUG", "OPEN", "a"),
      issue("5", "r", "INFO", "BUG", "OPEN", "a"),
    ]);

    let summary = aggregate(&outcome);
    assert_eq!(summary.critical_issues, 1);
    assert_eq!(summary.high_impact_issues, 2);
    assert_eq!(summary.medium_impact_issues, 1);
    assert_eq!(summary.low_impact_issues, 1);
    assert_eq!(summary.info_issues, 1);
  }

  #[test]
  fn type_and_status_counts() {
    let outcome = outcome_with(vec![
      issue("1", "r", "MAJOR", "BUG", "OPEN", "a"),
      issue("2", "r", "MAJOR", "VULNERABILITY", "CONFIRMED", "a"),
      issue("3", "r", "MAJOR", "CODE_SMELL", "OPEN", "a"),
      issue("4", "r", "MAJOR", "CODE_SMELL", "RESOLVED", "a"),
      issue("5", "r", "MAJOR", "SECURITY_HOTSPOT", "OPEN", "a"),
    ]);

    let summary = aggregate(&outcome);
    assert_eq!(summary.bug_count, 1);
    assert_eq!(summary.vulnerability_count, 1);
    assert_eq!(summary.code_smell_count, 2);
    assert_eq!(summary.security_hotspot_count, 1);
    assert_eq!(summary.open_issues, 3);
    assert_eq!(summary.confirmed_issues, 1);
  }

  #[test]
  fn top_rules_sort_by_count_with_first_seen_tie_order() {
    let outcome = outcome_with(vec![
      issue("1", "R1", "MAJOR", "BUG", "OPEN", "a"),
      issue("2", "R1", "MAJOR", "BUG", "OPEN", "a"),
      issue("3", "R2", "MAJOR", "BUG", "OPEN", "a"),
      issue("4", "R3", "MAJOR", "BUG", "OPEN", "a"),
      issue("5", "R1", "MAJOR", "BUG", "OPEN", "a"),
      issue("6", "R2", "MAJOR", "BUG", "OPEN", "a"),
    ]);

    let summary = aggregate(&outcome);
    let rules: Vec<(&str, u64)> = summary.top_rules.iter().map(|r| (r.rule.as_str(), r.count)).collect();
    assert_eq!(rules, vec![("R1", 3), ("R2", 2), ("R3", 1)]);
  }

  #[test]
  fn top_rules_keeps_at_most_ten() {
    let issues: Vec<ProjectedIssue> = (0..12)
      .map(|i| issue(&i.to_string(), &format!("R{i}"), "MAJOR", "BUG", "OPEN", "a"))
      .collect();

    let summary = aggregate(&outcome_with(issues));
    assert_eq!(summary.top_rules.len(), 10);
  }

  #[test]
  fn files_affected_counts_distinct_components() {
    let outcome = outcome_with(vec![
      issue("1", "r", "MAJOR", "BUG", "OPEN", "A"),
      issue("2", "r", "MAJOR", "BUG", "OPEN", "A"),
      issue("3", "r", "MAJOR", "BUG", "OPEN", "B"),
      issue("4", "r", "MAJOR", "BUG", "OPEN", "C"),
    ]);

    assert_eq!(aggregate(&outcome).files_affected, 3);
  }

  #[test]
  fn debt_and_effort_pass_through_as_strings() {
    let mut outcome = outcome_with(vec![]);
    assert_eq!(aggregate(&outcome).total_debt, "0");
    assert_eq!(aggregate(&outcome).total_effort, "0");

    outcome.debt_total = Some(125);
    outcome.effort_total = Some(90);
    let summary = aggregate(&outcome);
    assert_eq!(summary.total_debt, "125");
    assert_eq!(summary.total_effort, "90");
  }

  #[test]
  fn total_issues_reports_the_server_total_not_the_page_length() {
    let mut outcome = outcome_with(vec![issue("1", "r", "MAJOR", "BUG", "OPEN", "a")]);
    // Single-page approximation: a larger server total is reported as-is
    // even though only one page was aggregated.
    outcome.total = 1234;

    assert_eq!(aggregate(&outcome).total_issues, 1234);
  }

  #[tokio::test]
  async fn summarize_forces_page_size_fields_and_facets() -> anyhow::Result<()> {
    let _env = EnvSandbox::new(ALL_VARS);
    let mock_server = MockServer::start().await;
    let client = SonarCloudClient::with_base_url(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/api/issues/search"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "total": 0,
          "paging": { "pageIndex": 1, "pageSize": 500, "total": 0 },
          "issues": [],
          "facets": []
      })))
      .mount(&mock_server)
      .await;

    let caller_query = IssueQuery {
      pull_request: Some("42".to_string()),
      ps: Some(10),
      facets: Some(vec![Facet::Severities]),
      ..Default::default()
    };
    IssueSummarizer::new(&client)
      .summarize(&caller_query, Some("test-token"))
      .await?;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let find = |key: &str| {
      requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
    };
    assert_eq!(find("ps").as_deref(), Some("500"));
    assert_eq!(find("additionalFields").as_deref(), Some("_all"));
    assert_eq!(find("facets").as_deref(), Some("issueStatuses,impactSeverities,types,rules"));
    // Caller filters are inherited, not dropped.
    assert_eq!(find("pullRequest").as_deref(), Some("42"));
    Ok(())
  }
}
