//! Query Engine
//!
//! Orchestrates one request: compiles the predicate and sort plan of a
//! [`QueryModel`] against a record schema, counts the matching records of a
//! source, computes page metadata and fetches the shaped page.
//!
//! Compilation never touches the source, so every schema, operand and value
//! error surfaces before any data is read.

use serde_json::{Map, Value as Json};
use tracing::{debug, info, warn};

use dq_core::{PagedResponse, PaginationInfo, QueryConfig, QueryError, QueryPagination, QueryResult};

use crate::columns::Projection;
use crate::predicate::{Predicate, PredicateCompiler};
use crate::query::QueryModel;
use crate::schema::{Record, Schema};
use crate::sorts::SortPlan;
use crate::source::QuerySource;

/// A query compiled against one schema, ready to run on any matching source
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    predicate: Predicate,
    sort_plan: SortPlan,
    pagination: QueryPagination,
}

impl CompiledQuery {
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn sort_plan(&self) -> &SortPlan {
        &self.sort_plan
    }

    pub fn pagination(&self) -> QueryPagination {
        self.pagination
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        self.predicate.evaluate(record)
    }

    /// Filter and order `rows` without paginating
    pub fn apply<'r, R: Record + 'r>(&self, rows: impl IntoIterator<Item = &'r R>) -> Vec<&'r R> {
        let mut selected: Vec<&R> = rows.into_iter().filter(|r| self.matches(*r)).collect();
        self.sort_plan.sort(&mut selected);
        selected
    }
}

/// Stateless query orchestrator holding read-only configuration
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    config: QueryConfig,
}

impl QueryEngine {
    /// Engine for `config`, rejecting settings that no request could satisfy
    pub fn new(config: QueryConfig) -> QueryResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Empty model seeded with this engine's defaults
    pub fn model(&self) -> QueryModel {
        QueryModel::new(&self.config)
    }

    /// Parse a JSON wire payload with this engine's defaults
    pub fn parse(&self, json: &str) -> QueryResult<QueryModel> {
        QueryModel::from_json(json, &self.config)
    }

    /// Compile `model` for records of type `R` without executing it
    pub fn build_query<R: Record>(&self, model: &QueryModel) -> QueryResult<CompiledQuery> {
        self.build_query_for(R::schema(), model)
    }

    pub fn build_query_for(&self, schema: &Schema, model: &QueryModel) -> QueryResult<CompiledQuery> {
        let predicate = PredicateCompiler::new(schema).compile(model.filters(), model.search())?;
        let sort_plan = SortPlan::compile(schema, model.sorts(), self.config.sort_composition)?;

        debug!(
            schema = schema.name(),
            comparisons = predicate.comparison_count(),
            sort_keys = sort_plan.keys().len(),
            "Built query"
        );

        Ok(CompiledQuery {
            predicate,
            sort_plan,
            pagination: model.pagination(),
        })
    }

    /// Run `model` against `source`, shaping every returned record.
    ///
    /// Page metadata always reflects the full filtered count. The data is
    /// limited to the requested page unless `paginate_data` is off.
    pub fn execute<S, T, F>(&self, source: &S, model: &QueryModel, shape: F) -> QueryResult<PagedResponse<T>>
    where
        S: QuerySource + ?Sized,
        F: FnMut(&S::Record) -> T,
    {
        let query = self.build_query::<S::Record>(model)?;
        let pagination = query.pagination();

        let count = source.count(&query)?;
        let total_count = i64::try_from(count)
            .map_err(|_| QueryError::Provider(format!("row count {} out of range", count)))?;
        let info = PaginationInfo::calculate(total_count, pagination.rows(), pagination.page())?;
        if info.total_pages > 0 && pagination.page() > info.total_pages {
            warn!(
                requested_page = pagination.page(),
                total_pages = info.total_pages,
                "Requested page is past the end, serving the last page"
            );
        }

        let window = self.config.paginate_data.then(|| pagination.window(count));
        let data = source.fetch(&query, window, shape)?;

        info!(
            total_count = info.total_count,
            total_pages = info.total_pages,
            current_page = info.current_page,
            returned = data.len(),
            "Executed query"
        );
        Ok(PagedResponse::new(data, info))
    }

    /// Like [`execute`](Self::execute), projecting each record onto `columns`
    pub fn execute_projected<S>(
        &self,
        source: &S,
        model: &QueryModel,
        columns: &[&str],
    ) -> QueryResult<PagedResponse<Map<String, Json>>>
    where
        S: QuerySource + ?Sized,
    {
        let projection = Projection::compile(<S::Record as Record>::schema(), columns.iter().copied())?;
        self.execute(source, model, |record| projection.project(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::builder::QueryModelBuilder;
    use crate::filters::{LogicalOperator, QueryFilter};
    use crate::fixtures::{employees, Employee};
    use crate::operands::Operand;
    use dq_core::{PageWindow, QuerySort, SchemaError, SortComposition};

    fn scenario(config: &QueryConfig, page: i64) -> QueryModel {
        QueryModelBuilder::new(config)
            .and("Salary", Operand::GreaterThan, "2500")
            .and("Company.Name", Operand::Equals, "Global Company")
            .search_with("Jo", ["FirstName"], Operand::StartsWith, LogicalOperator::And)
            .sort_asc("FirstName")
            .rows(5)
            .page(page)
            .build()
            .unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let engine = QueryEngine::default();
        let model = scenario(engine.config(), 1);

        let response = engine
            .execute(&employees(), &model, |e: &Employee| e.first_name.clone())
            .unwrap();

        assert_eq!(response.data, vec!["Joan", "Joanna", "Jocelyn", "Jody", "Joe"]);
        assert_eq!(response.pagination.total_count, 18);
        assert_eq!(response.pagination.total_pages, 4);
        assert_eq!(response.pagination.page_size, 5);
        assert_eq!(response.pagination.current_page, 1);
    }

    #[test]
    fn test_pages_past_the_end_clamp() {
        let engine = QueryEngine::default();
        let rows = employees();

        let second = engine
            .execute(&rows, &scenario(engine.config(), 2), |e: &Employee| e.first_name.clone())
            .unwrap();
        assert_eq!(second.data, vec!["Joel", "Joey", "John", "Johnny", "Jolene"]);
        assert_eq!(second.pagination.current_page, 2);

        let beyond = engine
            .execute(&rows, &scenario(engine.config(), 10), |e: &Employee| e.first_name.clone())
            .unwrap();
        assert_eq!(beyond.data, vec!["Josh", "Joshua", "Joy"]);
        assert_eq!(beyond.pagination.current_page, 3);
    }

    #[test]
    fn test_metadata_only_pagination_returns_everything() {
        let engine = QueryEngine::new(QueryConfig::default().with_paginate_data(false)).unwrap();
        let response = engine
            .execute(&employees(), &scenario(engine.config(), 1), |e: &Employee| e.id)
            .unwrap();
        assert_eq!(response.len(), 18);
        assert_eq!(response.pagination.total_pages, 4);
    }

    #[test]
    fn test_no_matches() {
        let engine = QueryEngine::default();
        let model = engine
            .model()
            .with_filter(QueryFilter::and("FirstName", Operand::Equals, "Nobody").unwrap());
        let response = engine.execute(&employees(), &model, |e: &Employee| e.id).unwrap();
        assert!(response.is_empty());
        assert_eq!(response.pagination.total_count, 0);
        assert_eq!(response.pagination.total_pages, 0);
        assert_eq!(response.pagination.current_page, 0);
    }

    #[test]
    fn test_build_query_is_repeatable() {
        let engine = QueryEngine::default();
        let model = scenario(engine.config(), 1);
        let a = engine.build_query::<Employee>(&model).unwrap();
        let b = engine.build_query::<Employee>(&model).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.predicate().comparison_count(), 3);
    }

    #[test]
    fn test_sort_composition_is_configurable() {
        let model = |config: &QueryConfig| {
            QueryModel::new(config).with_sorts(vec![
                QuerySort::asc("Company.Name").unwrap(),
                QuerySort::desc("Salary").unwrap(),
            ])
        };

        let multi = QueryEngine::new(QueryConfig::default()).unwrap();
        let first = multi
            .execute(&employees(), &model(multi.config()), |e: &Employee| e.first_name.clone())
            .unwrap();
        assert_eq!(first.data[0], "Alice");

        let sequential = QueryEngine::new(
            QueryConfig::default()
                .with_sort_composition(SortComposition::Sequential)
                .with_paginate_data(false),
        )
        .unwrap();
        let all = sequential
            .execute(&employees(), &model(sequential.config()), |e: &Employee| e.salary)
            .unwrap();
        assert!(all.data.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_projected_response_serializes() {
        let engine = QueryEngine::default();
        let model = engine
            .model()
            .with_filter(QueryFilter::and("Company.Name", Operand::Equals, "Local Company").unwrap())
            .with_sort(QuerySort::asc("FirstName").unwrap());

        let response = engine
            .execute_projected(employees().as_slice(), &model, &["FirstName", "Company.Name"])
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "pagination": {"currentPage": 0, "pageSize": 10, "totalCount": 2, "totalPages": 1},
                "data": [
                    {"FirstName": "Josephine", "Company": {"Name": "Local Company"}},
                    {"FirstName": "Mary", "Company": {"Name": "Local Company"}}
                ]
            })
        );
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let config: QueryConfig = serde_json::from_str(r#"{"max_rows": 0}"#).unwrap();
        let err = QueryEngine::new(config).unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
        assert_eq!(err.error_code(), "configuration_error");
    }

    struct CountingSource {
        rows: Vec<Employee>,
        calls: Cell<usize>,
        fail: bool,
    }

    impl QuerySource for CountingSource {
        type Record = Employee;

        fn count(&self, query: &CompiledQuery) -> QueryResult<usize> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(QueryError::Provider("connection reset".into()));
            }
            self.rows.count(query)
        }

        fn fetch<T, F>(&self, query: &CompiledQuery, window: Option<PageWindow>, shape: F) -> QueryResult<Vec<T>>
        where
            F: FnMut(&Employee) -> T,
        {
            self.calls.set(self.calls.get() + 1);
            self.rows.fetch(query, window, shape)
        }
    }

    #[test]
    fn test_compile_errors_surface_before_touching_source() {
        let source = CountingSource {
            rows: employees(),
            calls: Cell::new(0),
            fail: false,
        };
        let engine = QueryEngine::default();
        let model = engine
            .model()
            .with_filter(QueryFilter::and("FirstName", Operand::Equals, "Joe").unwrap())
            .with_filter(QueryFilter::and("Salary", Operand::Contains, "25").unwrap());

        let err = engine.execute(&source, &model, |e: &Employee| e.id).unwrap_err();
        assert!(matches!(err, QueryError::Schema(SchemaError::OperandNotAllowed { .. })));
        assert_eq!(source.calls.get(), 0);

        let ok = engine.execute(&source, &engine.model(), |e: &Employee| e.id).unwrap();
        assert_eq!(ok.pagination.total_count, 24);
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn test_provider_errors_propagate() {
        let source = CountingSource {
            rows: employees(),
            calls: Cell::new(0),
            fail: true,
        };
        let engine = QueryEngine::default();
        let err = engine.execute(&source, &engine.model(), |e: &Employee| e.id).unwrap_err();
        assert_eq!(err.error_code(), "query_source_error");
    }
}
