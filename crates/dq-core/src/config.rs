//! Configuration types and loading
//!
//! The engine never reads a global; a `QueryConfig` value is handed to model
//! construction and to the engine explicitly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::result::QueryResult;
use crate::types::QuerySort;

/// How several sort directives are combined
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortComposition {
    /// First directive is the primary key, later directives break ties
    #[default]
    MultiKey,
    /// Each directive re-sorts the previous result with a stable sort,
    /// so the last directive wins and earlier ones only break its ties
    Sequential,
}

impl SortComposition {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "multi_key" | "multikey" => Some(Self::MultiKey),
            "sequential" => Some(Self::Sequential),
            _ => None,
        }
    }
}

/// Read-only engine configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    /// Page used when the request asks for a page below 1
    pub default_page: i64,
    /// Page size used when the request asks for zero or fewer rows
    pub default_rows: i64,
    /// Upper bound on the page size
    pub max_rows: i64,
    /// Sort applied when a request carries no sort directives
    pub default_sort: Vec<QuerySort>,
    pub sort_composition: SortComposition,
    /// Slice returned data to the requested page (false only reports metadata)
    pub paginate_data: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_rows: 10,
            max_rows: 100,
            default_sort: vec![],
            sort_composition: SortComposition::MultiKey,
            paginate_data: true,
        }
    }
}

impl QueryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> QueryResult<Self> {
        let mut config = Self::default();

        if let Ok(page) = std::env::var("DQ_DEFAULT_PAGE") {
            config.default_page = parse_env("DQ_DEFAULT_PAGE", &page)?;
        }
        if let Ok(rows) = std::env::var("DQ_DEFAULT_ROWS") {
            config.default_rows = parse_env("DQ_DEFAULT_ROWS", &rows)?;
        }
        if let Ok(max) = std::env::var("DQ_MAX_ROWS") {
            config.max_rows = parse_env("DQ_MAX_ROWS", &max)?;
        }
        if let Ok(sort) = std::env::var("DQ_DEFAULT_SORT") {
            config.default_sort = QuerySort::parse_list(&sort)
                .map_err(|e| QueryError::Config(format!("DQ_DEFAULT_SORT: {}", e)))?;
        }
        if let Ok(mode) = std::env::var("DQ_SORT_COMPOSITION") {
            config.sort_composition = SortComposition::from_str(&mode).ok_or_else(|| {
                QueryError::Config(format!("DQ_SORT_COMPOSITION: unknown mode '{}'", mode))
            })?;
        }
        if let Ok(v) = std::env::var("DQ_PAGINATE_DATA") {
            config.paginate_data = parse_env_bool("DQ_PAGINATE_DATA", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional file layered under `DQ__*` environment variables
    pub fn load(path: Option<&Path>) -> QueryResult<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        let config: Self = builder
            .add_source(::config::Environment::with_prefix("DQ").separator("__"))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| QueryError::Config(e.to_string()))?;

        config.validate()?;
        tracing::debug!(
            default_rows = config.default_rows,
            max_rows = config.max_rows,
            default_sort = config.default_sort.len(),
            "Query configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.default_page < 1 {
            return Err(QueryError::Config("default_page must be at least 1".into()));
        }
        if self.default_rows <= 0 {
            return Err(QueryError::Config("default_rows must be positive".into()));
        }
        if self.max_rows < self.default_rows {
            return Err(QueryError::Config(format!(
                "max_rows ({}) must not be below default_rows ({})",
                self.max_rows, self.default_rows
            )));
        }
        Ok(())
    }

    pub fn with_default_sort(mut self, sorts: Vec<QuerySort>) -> Self {
        self.default_sort = sorts;
        self
    }

    pub fn with_sort_composition(mut self, composition: SortComposition) -> Self {
        self.sort_composition = composition;
        self
    }

    pub fn with_paginate_data(mut self, paginate: bool) -> Self {
        self.paginate_data = paginate;
        self
    }
}

fn parse_env(key: &str, value: &str) -> QueryResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| QueryError::Config(format!("{}: '{}' is not an integer", key, value)))
}

fn parse_env_bool(key: &str, value: &str) -> QueryResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(QueryError::Config(format!("{}: '{}' is not a boolean", key, value))),
    }
}
