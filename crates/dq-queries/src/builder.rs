//! Query Builder
//!
//! Fluent construction of a [`QueryModel`]. Validation errors from individual
//! steps are held back and the first one is returned by [`QueryModelBuilder::build`].

use dq_core::{QueryConfig, QueryError, QueryPagination, QueryResult, QuerySort};

use crate::filters::{LogicalOperator, QueryFilter, QuerySearch};
use crate::operands::Operand;
use crate::query::QueryModel;

/// Builder for constructing query models fluently
#[derive(Debug)]
pub struct QueryModelBuilder<'c> {
    config: &'c QueryConfig,
    filters: Vec<QueryFilter>,
    search: Option<QuerySearch>,
    sorts: Vec<QuerySort>,
    rows: i64,
    page: i64,
    error: Option<QueryError>,
}

impl<'c> QueryModelBuilder<'c> {
    pub fn new(config: &'c QueryConfig) -> Self {
        Self {
            config,
            filters: vec![],
            search: None,
            sorts: vec![],
            rows: 0,
            page: 0,
            error: None,
        }
    }

    fn record<T>(&mut self, result: QueryResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.error.get_or_insert(e);
                None
            }
        }
    }

    // Filter methods

    /// Add a prepared filter
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter joined with AND
    pub fn and(mut self, property: &str, operand: Operand, value: impl Into<String>) -> Self {
        if let Some(filter) = self.record(QueryFilter::and(property, operand, value)) {
            self.filters.push(filter);
        }
        self
    }

    /// Add a filter joined with OR
    pub fn or(mut self, property: &str, operand: Operand, value: impl Into<String>) -> Self {
        if let Some(filter) = self.record(QueryFilter::or(property, operand, value)) {
            self.filters.push(filter);
        }
        self
    }

    /// Equality filter joined with AND
    pub fn equals(self, property: &str, value: impl Into<String>) -> Self {
        self.and(property, Operand::Equals, value)
    }

    /// Substring filter joined with AND
    pub fn contains(self, property: &str, value: impl Into<String>) -> Self {
        self.and(property, Operand::Contains, value)
    }

    // Search methods

    /// Match `term` against any of `properties` with `Contains`
    pub fn search<I, S>(mut self, term: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = self.record(QuerySearch::new(term, properties));
        self
    }

    /// Search with an explicit operand and logical operator
    pub fn search_with<I, S>(
        mut self,
        term: &str,
        properties: I,
        operand: Operand,
        logical_operator: LogicalOperator,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = self.record(QuerySearch::new(term, properties)).map(|search| {
            search
                .with_operand(operand)
                .with_logical_operator(logical_operator)
        });
        self
    }

    // Sort methods

    /// Sort ascending; explicit sorts replace the configured default sort
    pub fn sort_asc(mut self, property: &str) -> Self {
        if let Some(sort) = self.record(QuerySort::asc(property)) {
            self.sorts.push(sort);
        }
        self
    }

    pub fn sort_desc(mut self, property: &str) -> Self {
        if let Some(sort) = self.record(QuerySort::desc(property)) {
            self.sorts.push(sort);
        }
        self
    }

    // Pagination methods

    /// Requested 1-based page
    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Requested page size
    pub fn rows(mut self, rows: i64) -> Self {
        self.rows = rows;
        self
    }

    /// Build the model, or return the first error raised along the way
    pub fn build(self) -> QueryResult<QueryModel> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut model = QueryModel::new(self.config)
            .with_filters(self.filters)
            .with_pagination(QueryPagination::new(self.rows, self.page, self.config));
        if let Some(search) = self.search {
            model = model.with_search(search);
        }
        if !self.sorts.is_empty() {
            model = model.with_sorts(self.sorts);
        }
        Ok(model)
    }
}
