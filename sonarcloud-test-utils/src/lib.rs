//! Test utilities shared across the workspace
//!
//! Currently this is environment-variable isolation ([`EnvSandbox`]) for
//! tests that exercise call-time credential resolution.
//!
//! The dead_code lint is disabled because test utilities may not be used by
//! all tests, and the compiler cannot detect usage across crate boundaries
//! in development dependencies.

#![allow(dead_code)]

pub mod env;

// Re-export commonly used items
pub use env::EnvSandbox;
