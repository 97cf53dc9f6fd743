//! # RankLab Common Library
//!
//! Shared code for the RankLab evaluation service:
//! - Database initialization, schema, and models
//! - Settings-table accessors
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
