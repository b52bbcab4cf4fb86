//! # dq-queries
//!
//! Declarative query compilation over typed records.
//!
//! A [`QueryModel`] (filters, an optional search clause, sort directives and
//! pagination) is compiled against a record [`Schema`] into a predicate and a
//! sort plan, then run against any [`QuerySource`].
//!
//! ## Structure
//!
//! - `schema` - Record schemas and the `Record` capability
//! - `value` - Runtime values read from records
//! - `path` - Dot-path resolution against a schema
//! - `operands` - Operands and the per-type compatibility table
//! - `coercion` - Parsing filter literals into typed values
//! - `filters` - Filters, search clauses and logical operators
//! - `predicate` - Left-to-right predicate compilation
//! - `sorts` - Sort plan compilation
//! - `query` - The query model
//! - `builder` - Fluent API for constructing query models
//! - `wire` - JSON wire format
//! - `columns` - Projection of records into JSON objects
//! - `source` - Queryable sources
//! - `engine` - Query orchestration
//!
//! ## Example
//!
//! ```
//! use std::sync::LazyLock;
//! use dq_queries::{FieldType, QueryEngine, Record, Schema, Value};
//!
//! struct Book {
//!     title: String,
//!     pages: i32,
//! }
//!
//! static BOOK: LazyLock<Schema> = LazyLock::new(|| {
//!     Schema::builder("Book")
//!         .field("Title", FieldType::Text)
//!         .field("Pages", FieldType::Int32)
//!         .build()
//! });
//!
//! impl Record for Book {
//!     fn schema() -> &'static Schema {
//!         &BOOK
//!     }
//!
//!     fn value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "Title" => Value::from(&self.title),
//!             "Pages" => Value::from(self.pages),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! let books = vec![
//!     Book { title: "Dune".into(), pages: 412 },
//!     Book { title: "Emma".into(), pages: 474 },
//!     Book { title: "Ubik".into(), pages: 202 },
//! ];
//!
//! let engine = QueryEngine::default();
//! let model = engine
//!     .parse(r#"{"filters": [{"property": "pages", "operand": "gt", "value": 300}],
//!                "sort": [{"property": "Title", "ascending": false}]}"#)
//!     .unwrap();
//! let page = engine.execute(&books, &model, |b: &Book| b.title.clone()).unwrap();
//!
//! assert_eq!(page.data, vec!["Emma", "Dune"]);
//! assert_eq!(page.pagination.total_count, 2);
//! ```

pub mod schema;
pub mod value;
pub mod path;
pub mod operands;
pub mod coercion;
pub mod filters;
pub mod predicate;
pub mod sorts;
pub mod query;
pub mod builder;
pub mod wire;
pub mod columns;
pub mod source;
pub mod engine;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-exports for convenience
pub use schema::{EnumDescriptor, FieldDef, FieldType, QueryEnum, Record, Schema, SchemaRef, TypeCategory};
pub use value::{EnumValue, Value};
pub use path::PropertyPath;
pub use operands::{ensure_operand, operands_for, validate_operand, Operand};
pub use coercion::coerce;
pub use filters::{LogicalOperator, QueryFilter, QuerySearch};
pub use predicate::{Comparison, Predicate, PredicateCompiler};
pub use sorts::{SortKey, SortPlan};
pub use query::QueryModel;
pub use builder::QueryModelBuilder;
pub use wire::QueryRequest;
pub use columns::Projection;
pub use source::QuerySource;
pub use engine::{CompiledQuery, QueryEngine};

pub use dq_core::{
    PagedResponse, PaginationInfo, QueryConfig, QueryError, QueryPagination, QueryResult, QuerySort,
    SchemaError, SortComposition,
};
