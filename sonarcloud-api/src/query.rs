//! # Issue Search Query
//!
//! The typed request model for the issue-search endpoint and its encoding
//! into URL query parameters.
//!
//! Every field is optional. Absent fields are omitted from the outgoing
//! request entirely; they are never sent as empty or null values. Encoding
//! follows per-kind rules:
//!
//! - arrays are comma-joined when non-empty, omitted otherwise;
//! - strings are set only when non-empty;
//! - booleans are set whenever present, including explicit `false`;
//! - numbers are set via decimal conversion;
//! - `author` is the one exception to the array rule: each element becomes a
//!   separate repeated `author` entry, preserving input order;
//! - `owaspTop10-2021` is encoded under its literal hyphenated key.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::auth::ResolvedCredentials;

/// Optional response sections the search endpoint can include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AdditionalField {
  #[serde(rename = "_all")]
  All,
  Comments,
  Languages,
  ActionPlans,
  Rules,
  RuleDescriptionContextKey,
  Transitions,
  Actions,
  Users,
}

impl AdditionalField {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::All => "_all",
      Self::Comments => "comments",
      Self::Languages => "languages",
      Self::ActionPlans => "actionPlans",
      Self::Rules => "rules",
      Self::RuleDescriptionContextKey => "ruleDescriptionContextKey",
      Self::Transitions => "transitions",
      Self::Actions => "actions",
      Self::Users => "users",
    }
  }
}

/// Clean code attribute categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CleanCodeAttributeCategory {
  Adaptable,
  Consistent,
  Intentional,
  Responsible,
}

impl CleanCodeAttributeCategory {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Adaptable => "ADAPTABLE",
      Self::Consistent => "CONSISTENT",
      Self::Intentional => "INTENTIONAL",
      Self::Responsible => "RESPONSIBLE",
    }
  }
}

/// Server-computed aggregate breakdowns that can be requested alongside the
/// issue list. No facet is computed by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
  Projects,
  ModuleUuids,
  FileUuids,
  #[serde(rename = "assigned_to_me")]
  AssignedToMe,
  Severities,
  Statuses,
  IssueStatuses,
  Resolutions,
  Rules,
  Assignees,
  Author,
  Directories,
  Languages,
  Tags,
  Types,
  OwaspTop10,
  #[serde(rename = "owaspTop10-2021")]
  OwaspTop102021,
  Cwe,
  CreatedAt,
  SonarsourceSecurity,
  ImpactSoftwareQualities,
  ImpactSeverities,
  CleanCodeAttributeCategories,
}

impl Facet {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Projects => "projects",
      Self::ModuleUuids => "moduleUuids",
      Self::FileUuids => "fileUuids",
      Self::AssignedToMe => "assigned_to_me",
      Self::Severities => "severities",
      Self::Statuses => "statuses",
      Self::IssueStatuses => "issueStatuses",
      Self::Resolutions => "resolutions",
      Self::Rules => "rules",
      Self::Assignees => "assignees",
      Self::Author => "author",
      Self::Directories => "directories",
      Self::Languages => "languages",
      Self::Tags => "tags",
      Self::Types => "types",
      Self::OwaspTop10 => "owaspTop10",
      Self::OwaspTop102021 => "owaspTop10-2021",
      Self::Cwe => "cwe",
      Self::CreatedAt => "createdAt",
      Self::SonarsourceSecurity => "sonarsourceSecurity",
      Self::ImpactSoftwareQualities => "impactSoftwareQualities",
      Self::ImpactSeverities => "impactSeverities",
      Self::CleanCodeAttributeCategories => "cleanCodeAttributeCategories",
    }
  }
}

/// Impact severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactSeverity {
  Info,
  Low,
  Medium,
  High,
  Blocker,
}

impl ImpactSeverity {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Info => "INFO",
      Self::Low => "LOW",
      Self::Medium => "MEDIUM",
      Self::High => "HIGH",
      Self::Blocker => "BLOCKER",
    }
  }
}

/// Software qualities an issue can impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoftwareQuality {
  Maintainability,
  Reliability,
  Security,
}

impl SoftwareQuality {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Maintainability => "MAINTAINABILITY",
      Self::Reliability => "RELIABILITY",
      Self::Security => "SECURITY",
    }
  }
}

/// Issue statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
  Open,
  Confirmed,
  FalsePositive,
  Accepted,
  Fixed,
}

impl IssueStatus {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Open => "OPEN",
      Self::Confirmed => "CONFIRMED",
      Self::FalsePositive => "FALSE_POSITIVE",
      Self::Accepted => "ACCEPTED",
      Self::Fixed => "FIXED",
    }
  }
}

/// OWASP Top 10 categories, shared by the 2017 and 2021 editions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OwaspCategory {
  A1,
  A2,
  A3,
  A4,
  A5,
  A6,
  A7,
  A8,
  A9,
  A10,
}

impl OwaspCategory {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::A1 => "a1",
      Self::A2 => "a2",
      Self::A3 => "a3",
      Self::A4 => "a4",
      Self::A5 => "a5",
      Self::A6 => "a6",
      Self::A7 => "a7",
      Self::A8 => "a8",
      Self::A9 => "a9",
      Self::A10 => "a10",
    }
  }
}

/// SonarSource security categories. `Others` selects issues not associated
/// with any category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityCategory {
  BufferOverflow,
  Permission,
  SqlInjection,
  CommandInjection,
  PathTraversalInjection,
  LdapInjection,
  XpathInjection,
  Rce,
  Dos,
  Ssrf,
  Csrf,
  Xss,
  LogInjection,
  HttpResponseSplitting,
  OpenRedirect,
  Xxe,
  ObjectInjection,
  WeakCryptography,
  Auth,
  InsecureConf,
  EncryptData,
  Traceability,
  FileManipulation,
  Others,
}

impl SecurityCategory {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::BufferOverflow => "buffer-overflow",
      Self::Permission => "permission",
      Self::SqlInjection => "sql-injection",
      Self::CommandInjection => "command-injection",
      Self::PathTraversalInjection => "path-traversal-injection",
      Self::LdapInjection => "ldap-injection",
      Self::XpathInjection => "xpath-injection",
      Self::Rce => "rce",
      Self::Dos => "dos",
      Self::Ssrf => "ssrf",
      Self::Csrf => "csrf",
      Self::Xss => "xss",
      Self::LogInjection => "log-injection",
      Self::HttpResponseSplitting => "http-response-splitting",
      Self::OpenRedirect => "open-redirect",
      Self::Xxe => "xxe",
      Self::ObjectInjection => "object-injection",
      Self::WeakCryptography => "weak-cryptography",
      Self::Auth => "auth",
      Self::InsecureConf => "insecure-conf",
      Self::EncryptData => "encrypt-data",
      Self::Traceability => "traceability",
      Self::FileManipulation => "file-manipulation",
      Self::Others => "others",
    }
  }
}

/// Sort fields accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortField {
  CreationDate,
  Assignee,
  Status,
  UpdateDate,
  CloseDate,
  Hotspots,
  FileLine,
  Severity,
}

impl SortField {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::CreationDate => "CREATION_DATE",
      Self::Assignee => "ASSIGNEE",
      Self::Status => "STATUS",
      Self::UpdateDate => "UPDATE_DATE",
      Self::CloseDate => "CLOSE_DATE",
      Self::Hotspots => "HOTSPOTS",
      Self::FileLine => "FILE_LINE",
      Self::Severity => "SEVERITY",
    }
  }
}

/// A value that can appear inside a comma-joined array parameter.
pub trait QueryValue {
  fn as_query_value(&self) -> &str;
}

impl QueryValue for String {
  fn as_query_value(&self) -> &str {
    self
  }
}

macro_rules! impl_query_value {
  ($($ty:ty),+ $(,)?) => {
    $(impl QueryValue for $ty {
      fn as_query_value(&self) -> &str {
        self.as_str()
      }
    })+
  };
}

impl_query_value!(
  AdditionalField,
  CleanCodeAttributeCategory,
  Facet,
  ImpactSeverity,
  SoftwareQuality,
  IssueStatus,
  OwaspCategory,
  SecurityCategory,
  SortField,
);

/// Accumulates `(key, value)` query entries under the per-kind encoding
/// rules. Entry order is preserved, which only matters for repeated keys.
#[derive(Debug, Default)]
struct QueryPairs {
  entries: Vec<(String, String)>,
}

impl QueryPairs {
  fn push(&mut self, key: &str, value: impl Into<String>) {
    self.entries.push((key.to_string(), value.into()));
  }

  /// Non-empty arrays are comma-joined under a single key.
  fn array<T: QueryValue>(&mut self, key: &str, value: Option<&Vec<T>>) {
    if let Some(values) = value
      && !values.is_empty()
    {
      let joined = values.iter().map(QueryValue::as_query_value).collect::<Vec<_>>().join(",");
      self.push(key, joined);
    }
  }

  /// Strings are set only when non-empty.
  fn string(&mut self, key: &str, value: Option<&String>) {
    if let Some(v) = value
      && !v.is_empty()
    {
      self.push(key, v.clone());
    }
  }

  /// Booleans are set whenever present, including explicit `false`.
  fn boolean(&mut self, key: &str, value: Option<bool>) {
    if let Some(v) = value {
      self.push(key, v.to_string());
    }
  }

  fn number(&mut self, key: &str, value: Option<u32>) {
    if let Some(v) = value {
      self.push(key, v.to_string());
    }
  }

  /// Each element becomes a separate entry under the same key, in input
  /// order. Never comma-joined.
  fn repeated(&mut self, key: &str, value: Option<&Vec<String>>) {
    if let Some(values) = value {
      for v in values {
        self.push(key, v.clone());
      }
    }
  }

  fn into_entries(self) -> Vec<(String, String)> {
    self.entries
  }
}

/// Filter, sort, and pagination fields accepted by the issue-search
/// endpoint. Every field is optional; absent fields are omitted from the
/// outgoing request, which is built by [`IssueQuery::to_query_entries`]
/// rather than serde.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueQuery {
  /// Optional fields to be returned in the response.
  pub additional_fields: Option<Vec<AdditionalField>>,
  /// Ascending sort (default: true).
  pub asc: Option<bool>,
  /// To retrieve assigned or unassigned issues.
  pub assigned: Option<bool>,
  /// Assignee logins. The value `__me__` stands for the requesting user.
  pub assignees: Option<Vec<String>>,
  /// SCM accounts. Sent as one repeated `author` entry per value.
  pub author: Option<Vec<String>>,
  /// Branch key.
  pub branch: Option<String>,
  /// Clean code attribute categories.
  pub clean_code_attribute_categories: Option<Vec<CleanCodeAttributeCategory>>,
  /// Component keys (project, directory, or file). Defaults to the
  /// `SONARCLOUD_PROJECT_KEY` environment variable when omitted.
  pub component_keys: Option<Vec<String>>,
  /// Retrieve issues created after the given date (inclusive).
  pub created_after: Option<String>,
  /// Datetime of a specific analysis to retrieve issues from.
  pub created_at: Option<String>,
  /// Retrieve issues created before the given date (inclusive).
  pub created_before: Option<String>,
  /// Time span before now, e.g. `1m` for one month.
  pub created_in_last: Option<String>,
  /// CWE identifiers. Use `unknown` for issues without a CWE.
  pub cwe: Option<Vec<String>>,
  /// Facets to be computed. No facet is computed by default.
  pub facets: Option<Vec<Facet>>,
  /// Impact severities.
  pub impact_severities: Option<Vec<ImpactSeverity>>,
  /// Software qualities.
  pub impact_software_qualities: Option<Vec<SoftwareQuality>>,
  /// Issue statuses.
  pub issue_statuses: Option<Vec<IssueStatus>>,
  /// Issue keys.
  pub issues: Option<Vec<String>>,
  /// Languages.
  pub languages: Option<Vec<String>>,
  /// Return only issues at the component's own level, not its descendants
  /// (default: false).
  pub on_component_only: Option<bool>,
  /// Organization key. Defaults to the organization environment variables
  /// when omitted.
  pub organization: Option<String>,
  /// OWASP Top 10 (2017) lowercase categories.
  pub owasp_top10: Option<Vec<OwaspCategory>>,
  /// OWASP Top 10 (2021) lowercase categories.
  #[serde(rename = "owaspTop10-2021")]
  pub owasp_top10_2021: Option<Vec<OwaspCategory>>,
  /// 1-based page number (default: 1).
  pub p: Option<u32>,
  /// Page size, at most 500 (default: 100).
  pub ps: Option<u32>,
  /// Pull request id.
  pub pull_request: Option<String>,
  /// Match resolved or unresolved issues.
  pub resolved: Option<bool>,
  /// Coding rule keys in `<repository>:<rule>` format.
  pub rules: Option<Vec<String>>,
  /// Sort field.
  pub s: Option<SortField>,
  /// Retrieve issues created since the leak period (default: false).
  pub since_leak_period: Option<bool>,
  /// SonarSource security categories.
  pub sonarsource_security: Option<Vec<SecurityCategory>>,
  /// Tags.
  pub tags: Option<Vec<String>>,
}

impl IssueQuery {
  /// Encode into ordered `(key, value)` query entries.
  ///
  /// Caller-visible defaults (`asc`, `onComponentOnly`, `sinceLeakPeriod`,
  /// `p`, `ps`) are applied here, so those parameters always appear in the
  /// outgoing request. `componentKeys` falls back to the resolved project
  /// key only when the caller supplied nothing non-empty; caller-supplied
  /// values win outright. `organization` is set only when resolved.
  pub fn to_query_entries(&self, creds: &ResolvedCredentials) -> Vec<(String, String)> {
    let mut q = QueryPairs::default();

    q.array("additionalFields", self.additional_fields.as_ref());
    q.boolean("asc", Some(self.asc.unwrap_or(true)));
    q.boolean("assigned", self.assigned);
    q.array("assignees", self.assignees.as_ref());
    q.repeated("author", self.author.as_ref());
    q.string("branch", self.branch.as_ref());
    q.array("cleanCodeAttributeCategories", self.clean_code_attribute_categories.as_ref());

    match self.component_keys.as_ref().filter(|keys| !keys.is_empty()) {
      Some(keys) => q.array("componentKeys", Some(keys)),
      None => {
        if let Some(project_key) = &creds.project_key {
          q.push("componentKeys", project_key.clone());
        }
      }
    }

    q.string("createdAfter", self.created_after.as_ref());
    q.string("createdAt", self.created_at.as_ref());
    q.string("createdBefore", self.created_before.as_ref());
    q.string("createdInLast", self.created_in_last.as_ref());
    q.array("cwe", self.cwe.as_ref());
    q.array("facets", self.facets.as_ref());
    q.array("impactSeverities", self.impact_severities.as_ref());
    q.array("impactSoftwareQualities", self.impact_software_qualities.as_ref());
    q.array("issueStatuses", self.issue_statuses.as_ref());
    q.array("issues", self.issues.as_ref());
    q.array("languages", self.languages.as_ref());
    q.boolean("onComponentOnly", Some(self.on_component_only.unwrap_or(false)));

    if let Some(organization) = &creds.organization {
      q.push("organization", organization.clone());
    }

    q.array("owaspTop10", self.owasp_top10.as_ref());
    q.array("owaspTop10-2021", self.owasp_top10_2021.as_ref());
    q.number("p", Some(self.p.unwrap_or(1)));
    q.number("ps", Some(self.ps.unwrap_or(100)));
    q.string("pullRequest", self.pull_request.as_ref());
    q.boolean("resolved", self.resolved);
    q.array("rules", self.rules.as_ref());
    if let Some(sort) = self.s {
      q.push("s", sort.as_str());
    }
    q.boolean("sinceLeakPeriod", Some(self.since_leak_period.unwrap_or(false)));
    q.array("sonarsourceSecurity", self.sonarsource_security.as_ref());
    q.array("tags", self.tags.as_ref());

    q.into_entries()
  }
}
