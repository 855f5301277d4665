use reqwest::Client;

use crate::consts::DEFAULT_BASE_URL;

/// Represents a SonarCloud API client.
///
/// Credentials are resolved per call rather than at construction so a
/// long-running server sees environment changes between invocations.
pub struct SonarCloudClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
}

impl SonarCloudClient {
  /// Create a client against the production SonarCloud endpoint.
  pub fn new() -> Self {
    Self::with_base_url(DEFAULT_BASE_URL)
  }

  /// Create a client against an explicit base URL. Used by tests to target
  /// a mock server.
  pub fn with_base_url(base_url: &str) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    }
  }
}

impl Default for SonarCloudClient {
  fn default() -> Self {
    Self::new()
  }
}
