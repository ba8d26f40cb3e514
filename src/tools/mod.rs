//! LMM Tools module
//!
//! MCP tool implementations for the Lab Media Manager.

pub mod calculators;
pub mod recipes;
pub mod status;
