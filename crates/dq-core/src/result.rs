//! Result type alias for query compilation and execution.

use crate::error::QueryError;

/// Standard Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
