//! Constants for the SonarCloud API client.

/// Production SonarCloud endpoint. Tests point the client at a mock server
/// instead.
pub const DEFAULT_BASE_URL: &str = "https://sonarcloud.io";

/// Path of the issue-search endpoint, relative to the base URL.
pub const ISSUES_SEARCH_PATH: &str = "/api/issues/search";

/// Largest page size the issue-search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 500;
