//! Common types shared by configuration and query models

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::result::QueryResult;

/// One ordering key of a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySort {
    /// Dot-separated property path (e.g. "Company.Name")
    pub property: String,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

impl QuerySort {
    /// Create a sort directive, rejecting an empty property path
    pub fn new(property: impl Into<String>, ascending: bool) -> QueryResult<Self> {
        let property = property.into();
        if property.trim().is_empty() {
            return Err(QueryError::argument("sort.property", "must not be empty"));
        }
        Ok(Self {
            property,
            ascending,
        })
    }

    pub fn asc(property: impl Into<String>) -> QueryResult<Self> {
        Self::new(property, true)
    }

    pub fn desc(property: impl Into<String>) -> QueryResult<Self> {
        Self::new(property, false)
    }

    /// Parse a comma separated sort list such as `"LastName:asc,Salary:desc"`.
    ///
    /// A directive without a suffix sorts ascending.
    pub fn parse_list(sort_string: &str) -> QueryResult<Vec<Self>> {
        sort_string
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.rsplit_once(':') {
                Some((property, direction)) => match direction.to_lowercase().as_str() {
                    "asc" | "ascending" => Self::asc(property),
                    "desc" | "descending" => Self::desc(property),
                    other => Err(QueryError::argument(
                        "sort.direction",
                        format!("unknown direction '{}'", other),
                    )),
                },
                None => Self::asc(part),
            })
            .collect()
    }
}
