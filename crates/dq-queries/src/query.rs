//! Query Model
//!
//! The aggregate describing one request: ordered filters, an optional search
//! clause, ordered sort directives and pagination. A model is built per
//! request, either programmatically or from the JSON wire format, and is
//! compiled against a record schema by the engine.

use dq_core::{QueryConfig, QueryPagination, QueryResult, QuerySort};

use crate::filters::{QueryFilter, QuerySearch};
use crate::wire::QueryRequest;

/// A declarative query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryModel {
    filters: Vec<QueryFilter>,
    search: Option<QuerySearch>,
    sorts: Vec<QuerySort>,
    pagination: QueryPagination,
}

impl QueryModel {
    /// Empty query using the configured default sort and pagination
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            filters: vec![],
            search: None,
            sorts: config.default_sort.clone(),
            pagination: QueryPagination::defaults(config),
        }
    }

    /// Parse a JSON wire payload
    pub fn from_json(json: &str, config: &QueryConfig) -> QueryResult<Self> {
        QueryRequest::from_json(json)?.into_model(config)
    }

    /// Append a filter
    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replace all filters
    pub fn with_filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_search(mut self, search: QuerySearch) -> Self {
        self.search = Some(search);
        self
    }

    pub fn without_search(mut self) -> Self {
        self.search = None;
        self
    }

    /// Append a sort directive after the current ones
    pub fn with_sort(mut self, sort: QuerySort) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Replace all sort directives, including configured defaults
    pub fn with_sorts(mut self, sorts: Vec<QuerySort>) -> Self {
        self.sorts = sorts;
        self
    }

    pub fn with_pagination(mut self, pagination: QueryPagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn filters(&self) -> &[QueryFilter] {
        &self.filters
    }

    pub fn search(&self) -> Option<&QuerySearch> {
        self.search.as_ref()
    }

    pub fn sorts(&self) -> &[QuerySort] {
        &self.sorts
    }

    pub fn pagination(&self) -> QueryPagination {
        self.pagination
    }

    /// Whether compiling this model yields a constant-true predicate
    pub fn is_unfiltered(&self) -> bool {
        self.filters.is_empty() && self.search.as_ref().map_or(true, |s| s.properties().is_empty())
    }
}
