//! Query Sources
//!
//! A [`QuerySource`] is whatever holds the records: it counts and fetches the
//! rows a [`CompiledQuery`] selects. Slices and vectors of records are
//! sources out of the box; a database-backed provider would translate the
//! compiled predicate and sort plan into its own query language instead.

use dq_core::{PageWindow, QueryResult};

use crate::engine::CompiledQuery;
use crate::schema::Record;

/// Provider of records for compiled queries
pub trait QuerySource {
    type Record: Record;

    /// Number of records matching the query's predicate, ignoring pagination
    fn count(&self, query: &CompiledQuery) -> QueryResult<usize>;

    /// Matching records in the query's order, limited to `window` if given,
    /// each passed through `shape`
    fn fetch<T, F>(&self, query: &CompiledQuery, window: Option<PageWindow>, shape: F) -> QueryResult<Vec<T>>
    where
        F: FnMut(&Self::Record) -> T;
}

impl<R: Record> QuerySource for [R] {
    type Record = R;

    fn count(&self, query: &CompiledQuery) -> QueryResult<usize> {
        Ok(self.iter().filter(|r| query.matches(*r)).count())
    }

    fn fetch<T, F>(&self, query: &CompiledQuery, window: Option<PageWindow>, mut shape: F) -> QueryResult<Vec<T>>
    where
        F: FnMut(&R) -> T,
    {
        let rows = query.apply(self);
        let range = match window {
            Some(window) => window.range(rows.len()),
            None => 0..rows.len(),
        };
        Ok(rows[range].iter().map(|r| shape(*r)).collect())
    }
}

impl<R: Record> QuerySource for Vec<R> {
    type Record = R;

    fn count(&self, query: &CompiledQuery) -> QueryResult<usize> {
        self.as_slice().count(query)
    }

    fn fetch<T, F>(&self, query: &CompiledQuery, window: Option<PageWindow>, shape: F) -> QueryResult<Vec<T>>
    where
        F: FnMut(&R) -> T,
    {
        self.as_slice().fetch(query, window, shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::QueryEngine;
    use crate::fixtures::{employees, Employee};
    use crate::operands::Operand;
    use crate::query::QueryModel;
    use crate::filters::QueryFilter;
    use dq_core::{QueryConfig, QuerySort};

    fn compiled(model: &QueryModel) -> CompiledQuery {
        QueryEngine::new(QueryConfig::default())
            .unwrap()
            .build_query::<Employee>(model)
            .unwrap()
    }

    #[test]
    fn test_slice_source_counts_and_fetches() {
        let data = employees();
        let model = QueryModel::new(&QueryConfig::default())
            .with_filter(QueryFilter::and("Company.Name", Operand::Equals, "Local Company").unwrap())
            .with_sort(QuerySort::desc("Salary").unwrap());
        let query = compiled(&model);

        assert_eq!(data.count(&query).unwrap(), 2);
        let names = data.fetch(&query, None, |e: &Employee| e.first_name.clone()).unwrap();
        assert_eq!(names, vec!["Josephine", "Mary"]);
    }

    #[test]
    fn test_window_limits_fetch() {
        let data = employees();
        let model = QueryModel::new(&QueryConfig::default()).with_sort(QuerySort::asc("Id").unwrap());
        let query = compiled(&model);

        let ids = data
            .as_slice()
            .fetch(&query, Some(PageWindow { offset: 5, limit: 3 }), |e: &Employee| e.id)
            .unwrap();
        assert_eq!(ids, vec![6, 7, 8]);

        let past_end = data
            .fetch(&query, Some(PageWindow { offset: 100, limit: 3 }), |e: &Employee| e.id)
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_fetch_does_not_modify_source() {
        let data = employees();
        let before: Vec<i32> = data.iter().map(|e: &Employee| e.id).collect();
        let model = QueryModel::new(&QueryConfig::default()).with_sort(QuerySort::desc("FirstName").unwrap());
        data.fetch(&compiled(&model), None, |e: &Employee| e.id).unwrap();
        let after: Vec<i32> = data.iter().map(|e: &Employee| e.id).collect();
        assert_eq!(before, after);
    }
}
