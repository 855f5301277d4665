//! Parameter structs for the MCP tools.

pub mod issues;
