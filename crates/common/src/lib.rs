//! Shared runtime helpers: tracing setup and data-directory checks.

pub mod env;
pub mod utils;
