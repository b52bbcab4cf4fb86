//! # dq-core
//!
//! Core types shared by the declarative query engine.
//!
//! This crate provides the building blocks the query compiler is wired with:
//! - Error kinds raised while compiling a query
//! - Result type alias
//! - Sort directives shared by configuration and query models
//! - Pagination request, metadata and response types
//! - Read-only engine configuration

pub mod error;
pub mod result;
pub mod types;
pub mod pagination;
pub mod config;

pub use error::*;
pub use result::*;
pub use types::*;
pub use pagination::*;
pub use config::{QueryConfig, SortComposition};
