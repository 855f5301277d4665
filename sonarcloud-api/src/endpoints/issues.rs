//! # Issue Search Endpoint
//!
//! Implementation of the issue-search call: credential resolution, query
//! encoding, the HTTP GET itself, response validation, and projection of the
//! returned issues to the reduced field set.

use anyhow::{Context, Result};
use reqwest::header;
use tracing::debug;

use crate::auth::resolve_credentials;
use crate::client::SonarCloudClient;
use crate::consts::ISSUES_SEARCH_PATH;
use crate::models::{Paging, ProjectedIssue, RawIssue, SearchResponse};
use crate::query::IssueQuery;

/// Everything a single search call produced.
///
/// Carries the effort/debt totals alongside the serialized fetch payload so
/// the summarizer can pass them through without a second request.
#[derive(Debug)]
pub struct IssueSearchOutcome {
  pub total: u64,
  pub organization: Option<String>,
  pub project_key: Option<String>,
  pub paging: Paging,
  pub effort_total: Option<u64>,
  pub debt_total: Option<u64>,
  pub facets: Vec<serde_json::Value>,
  pub issues: Vec<ProjectedIssue>,
}

impl SonarCloudClient {
  /// Search issues with the given filters.
  ///
  /// Resolves credentials first — a missing token fails here, before any
  /// network activity. One outbound GET per call; non-2xx responses become
  /// errors carrying the status code and reason without parsing the body.
  pub async fn search_issues(&self, query: &IssueQuery, token: Option<&str>) -> Result<IssueSearchOutcome> {
    let creds = resolve_credentials(token, query.organization.as_deref())?;
    let entries = query.to_query_entries(&creds);
    let url = format!("{}{}", self.base_url, ISSUES_SEARCH_PATH);

    debug!(url = %url, params = entries.len(), "searching SonarCloud issues");

    let response = self
      .client
      .get(&url)
      .query(&entries)
      .bearer_auth(&creds.token)
      .header(header::ACCEPT, "application/json")
      .send()
      .await
      .context("Failed to fetch SonarCloud issues")?;

    let status = response.status();
    if !status.is_success() {
      return Err(anyhow::anyhow!(
        "SonarCloud API error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
      ));
    }

    let body = response
      .json::<SearchResponse>()
      .await
      .context("Failed to parse SonarCloud issue search response")?;

    let issues = body.issues.iter().map(RawIssue::project_fields).collect();

    Ok(IssueSearchOutcome {
      total: body.total,
      organization: creds.organization,
      project_key: creds.project_key,
      paging: body.paging,
      effort_total: body.effort_total,
      debt_total: body.debt_total,
      facets: body.facets,
      issues,
    })
  }
}

#[cfg(test)]
mod tests {
  use sonarcloud_test_utils::EnvSandbox;
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::auth::{ENV_ORGANISATION, ENV_ORGANIZATION, ENV_PROJECT_KEY, ENV_TOKEN};
  use crate::client::SonarCloudClient;
  use crate::query::IssueQuery;

  const ALL_VARS: &[&str] = &[ENV_TOKEN, ENV_ORGANIZATION, ENV_ORGANISATION, ENV_PROJECT_KEY];

  fn search_body() -> serde_json::Value {
    serde_json::json!({
        "total": 2,
        "paging": { "pageIndex": 1, "pageSize": 100, "total": 2 },
        "effortTotal": 25,
        "debtTotal": 25,
        "issues": [
            {
                "key": "AY1",
                "rule": "rust:S100",
                "severity": "MAJOR",
                "component": "org_proj:src/lib.rs",
                "project": "org_proj",
                "line": 42,
                "status": "OPEN",
                "message": "Rename this function.",
                "effort": "5min",
                "debt": "5min",
                "tags": ["convention"],
                "creationDate": "2024-01-15T10:00:00+0000",
                "updateDate": "2024-01-16T10:00:00+0000",
                "type": "CODE_SMELL"
            },
            {
                "key": "AY2",
                "rule": "rust:S2589",
                "severity": "BLOCKER",
                "component": "org_proj:src/main.rs",
                "status": "CONFIRMED",
                "message": "This condition is always true.",
                "creationDate": "2024-01-15T11:00:00+0000",
                "updateDate": "2024-01-15T11:00:00+0000",
                "type": "BUG"
            }
        ],
        "facets": [
            { "property": "types", "values": [{ "val": "BUG", "count": 1 }] }
        ]
    })
  }

  #[tokio::test]
  async fn search_sends_bearer_token_and_accept_header() -> anyhow::Result<()> {
    let _env = EnvSandbox::new(ALL_VARS);
    let mock_server = MockServer::start().await;
    let client = SonarCloudClient::with_base_url(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/api/issues/search"))
      .and(header("Authorization", "Bearer test-token"))
      .and(header("Accept", "application/json"))
      .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
      .expect(1)
      .mount(&mock_server)
      .await;

    let outcome = client.search_issues(&IssueQuery::default(), Some("test-token")).await?;

    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.paging.page_index, 1);
    assert_eq!(outcome.facets.len(), 1);
    Ok(())
  }

  #[tokio::test]
  async fn search_projects_issues_to_the_reduced_field_set() -> anyhow::Result<()> {
    let _env = EnvSandbox::new(ALL_VARS);
    let mock_server = MockServer::start().await;
    let client = SonarCloudClient::with_base_url(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/api/issues/search"))
      .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
      .mount(&mock_server)
      .await;

    let outcome = client.search_issues(&IssueQuery::default(), Some("test-token")).await?;

    assert_eq!(outcome.issues.len(), 2);
    assert_eq!(outcome.issues[0].key, "AY1");
    assert_eq!(outcome.issues[0].line, Some(42));
    assert_eq!(outcome.issues[1].issue_type, "BUG");
    assert_eq!(outcome.issues[1].line, None);
    assert_eq!(outcome.issues[1].effort, None);
    assert_eq!(outcome.effort_total, Some(25));
    Ok(())
  }

  #[tokio::test]
  async fn search_encodes_filters_defaults_and_repeated_authors() -> anyhow::Result<()> {
    let _env = EnvSandbox::new(ALL_VARS);
    let mock_server = MockServer::start().await;
    let client = SonarCloudClient::with_base_url(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/api/issues/search"))
      .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
      .mount(&mock_server)
      .await;

    let query = IssueQuery {
      author: Some(vec!["alice".to_string(), "bob".to_string()]),
      pull_request: Some("42".to_string()),
      tags: Some(vec!["security".to_string(), "cwe".to_string()]),
      ..Default::default()
    };
    client.search_issues(&query, Some("test-token")).await?;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let pairs: Vec<(String, String)> = requests[0]
      .url
      .query_pairs()
      .map(|(k, v)| (k.into_owned(), v.into_owned()))
      .collect();

    let authors: Vec<&str> = pairs.iter().filter(|(k, _)| k == "author").map(|(_, v)| v.as_str()).collect();
    assert_eq!(authors, vec!["alice", "bob"]);

    let find = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
    assert_eq!(find("pullRequest"), Some("42"));
    assert_eq!(find("tags"), Some("security,cwe"));
    assert_eq!(find("asc"), Some("true"));
    assert_eq!(find("onComponentOnly"), Some("false"));
    assert_eq!(find("sinceLeakPeriod"), Some("false"));
    assert_eq!(find("p"), Some("1"));
    assert_eq!(find("ps"), Some("100"));
    // Nothing resolved, so these never appear.
    assert_eq!(find("organization"), None);
    assert_eq!(find("componentKeys"), None);
    Ok(())
  }

  #[tokio::test]
  async fn search_uses_environment_organization_and_project_key() -> anyhow::Result<()> {
    let mut env = EnvSandbox::new(ALL_VARS);
    env.set(ENV_ORGANISATION, "env-org");
    env.set(ENV_PROJECT_KEY, "env-project");

    let mock_server = MockServer::start().await;
    let client = SonarCloudClient::with_base_url(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/api/issues/search"))
      .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
      .mount(&mock_server)
      .await;

    let outcome = client.search_issues(&IssueQuery::default(), Some("test-token")).await?;

    assert_eq!(outcome.organization.as_deref(), Some("env-org"));
    assert_eq!(outcome.project_key.as_deref(), Some("env-project"));

    let requests = mock_server.received_requests().await.unwrap();
    let find = |key: &str| {
      requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
    };
    assert_eq!(find("organization").as_deref(), Some("env-org"));
    assert_eq!(find("componentKeys").as_deref(), Some("env-project"));
    Ok(())
  }

  #[tokio::test]
  async fn search_fails_with_status_code_and_reason_on_http_error() -> anyhow::Result<()> {
    let _env = EnvSandbox::new(ALL_VARS);
    let mock_server = MockServer::start().await;
    let client = SonarCloudClient::with_base_url(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/api/issues/search"))
      .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
          "errors": [{ "msg": "Insufficient privileges" }]
      })))
      .mount(&mock_server)
      .await;

    let err = client
      .search_issues(&IssueQuery::default(), Some("test-token"))
      .await
      .unwrap_err();

    assert_eq!(err.to_string(), "SonarCloud API error: 403 Forbidden");
    Ok(())
  }

  #[tokio::test]
  async fn missing_token_fails_before_any_network_call() -> anyhow::Result<()> {
    let _env = EnvSandbox::new(ALL_VARS);
    let mock_server = MockServer::start().await;
    let client = SonarCloudClient::with_base_url(&mock_server.uri());

    let err = client.search_issues(&IssueQuery::default(), None).await.unwrap_err();

    assert!(err.to_string().contains("SONARCLOUD_TOKEN"));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn invalid_json_body_is_a_parse_error() -> anyhow::Result<()> {
    let _env = EnvSandbox::new(ALL_VARS);
    let mock_server = MockServer::start().await;
    let client = SonarCloudClient::with_base_url(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/api/issues/search"))
      .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
      .mount(&mock_server)
      .await;

    let err = client
      .search_issues(&IssueQuery::default(), Some("test-token"))
      .await
      .unwrap_err();

    assert!(err.to_string().contains("Failed to parse SonarCloud issue search response"));
    Ok(())
  }
}
