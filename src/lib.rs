//! Lab Media Manager (LMM) Library
//!
//! Core functionality for lab media recipe scaling and solution calculations.

pub mod build_info;
pub mod calc;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
