//! Configuration module for search and fetch operations
//!
//! This module provides the `FetchConfig` struct and its builder with
//! validation and the pipeline's default budgets.

pub mod builder;
pub mod getters;
pub mod types;

pub use builder::FetchConfigBuilder;
pub use types::{FailurePolicy, FetchConfig};
