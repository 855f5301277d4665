//! Credential resolution for the SonarCloud client.
//!
//! Each credential is resolved from an ordered list of sources — an explicit
//! argument first, then one or more environment variables. Environment
//! variables are read at call time, not at startup, so a long-running server
//! picks up changes between invocations.

use anyhow::Result;

/// Environment variable holding the API token.
pub const ENV_TOKEN: &str = "SONARCLOUD_TOKEN";

/// Environment variable holding the organization key (US spelling).
pub const ENV_ORGANIZATION: &str = "SONARCLOUD_ORGANIZATION";

/// Environment variable holding the organization key (UK spelling).
pub const ENV_ORGANISATION: &str = "SONARCLOUD_ORGANISATION";

/// Environment variable holding the default project key. There is no
/// argument-level equivalent; the query `componentKeys` field covers that.
pub const ENV_PROJECT_KEY: &str = "SONARCLOUD_PROJECT_KEY";

/// Raised when no API token can be resolved. Detected by the MCP layer to
/// report a configuration error rather than an upstream one.
#[derive(Debug, thiserror::Error)]
#[error(
  "SonarCloud API token is required. Provide it as a parameter or set the SONARCLOUD_TOKEN environment variable."
)]
pub struct MissingToken;

/// Credentials after argument/environment resolution.
///
/// `organization` and `project_key` are optional: when absent the
/// corresponding query parameters are simply omitted.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
  pub token: String,
  pub organization: Option<String>,
  pub project_key: Option<String>,
}

/// A single place a credential value can come from.
enum Source<'a> {
  Argument(Option<&'a str>),
  EnvVar(&'a str),
}

impl Source<'_> {
  fn value(&self) -> Option<String> {
    match self {
      Source::Argument(v) => v.map(str::to_owned),
      Source::EnvVar(name) => std::env::var(name).ok(),
    }
  }
}

/// Return the first non-empty value among the given sources, in order.
fn resolve_first(sources: &[Source<'_>]) -> Option<String> {
  sources.iter().filter_map(Source::value).find(|v| !v.is_empty())
}

/// Resolve all credentials for a single API call.
///
/// The token is required and fails before any network activity. The
/// organization falls back from the explicit argument to either spelling of
/// the organization variable; the project key comes from the environment
/// only.
pub fn resolve_credentials(token: Option<&str>, organization: Option<&str>) -> Result<ResolvedCredentials> {
  let token = resolve_first(&[Source::Argument(token), Source::EnvVar(ENV_TOKEN)]).ok_or(MissingToken)?;

  let organization = resolve_first(&[
    Source::Argument(organization),
    Source::EnvVar(ENV_ORGANIZATION),
    Source::EnvVar(ENV_ORGANISATION),
  ]);

  let project_key = resolve_first(&[Source::EnvVar(ENV_PROJECT_KEY)]);

  Ok(ResolvedCredentials {
    token,
    organization,
    project_key,
  })
}
