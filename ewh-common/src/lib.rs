//! # EWH Common Library
//!
//! Shared code for the enterprise warehouse tools including:
//! - Common error types
//! - TOML configuration loading and path resolution
//! - SQLite warehouse initialization and star schema DDL

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
