//! # SonarCloud API Client
//!
//! Provides SonarCloud REST API integration for issue search and
//! summarization: a typed query model with per-kind parameter encoding,
//! argument/environment credential resolution, and single-page aggregate
//! statistics.

pub mod auth;
mod client;
pub mod consts;
mod endpoints;
pub mod models;
pub mod query;
pub mod summary;

// Re-export the client
pub use client::SonarCloudClient;
// Re-export the search outcome
pub use endpoints::issues::IssueSearchOutcome;
// Re-export models
pub use models::{IssueSummary, Paging, ProjectedIssue, RawIssue, RuleCount, SearchResponse};
// Re-export the query model
pub use query::{
  AdditionalField, CleanCodeAttributeCategory, Facet, ImpactSeverity, IssueQuery, IssueStatus, OwaspCategory,
  SecurityCategory, SoftwareQuality, SortField,
};
// Re-export the summarizer
pub use summary::IssueSummarizer;
