//! # SonarCloud API Endpoints
//!
//! Endpoint implementations for the SonarCloud REST API. Only the
//! issue-search endpoint is covered; the client performs exactly one
//! outbound call per invocation with no retries and no caching.

pub mod issues;
