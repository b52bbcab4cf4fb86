//! JSON Wire Format
//!
//! Serde representation of a query request:
//!
//! ```json
//! {
//!   "filters": [{"property": "Salary", "value": "2500", "operand": "gt", "operator": "and"}],
//!   "search": {"term": "Jo", "operand": "sw", "properties": ["FirstName"]},
//!   "sort": [{"property": "FirstName", "ascending": true}],
//!   "pagination": {"rows": 5, "page": 1}
//! }
//! ```
//!
//! Every section is optional. Codes are validated when the request is turned
//! into a [`QueryModel`], not while deserializing.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use dq_core::{QueryConfig, QueryPagination, QueryResult, QuerySort};

use crate::filters::{LogicalOperator, QueryFilter, QuerySearch};
use crate::operands::Operand;
use crate::query::QueryModel;

/// Scalar filter literal; numbers and booleans are kept in their JSON spelling.
///
/// Numbers keep the digits of the payload, so a decimal literal is never
/// rounded through a float before coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Json::deserialize(deserializer)? {
            Json::String(s) => Ok(WireValue::Text(s)),
            Json::Number(n) => Ok(WireValue::Number(n)),
            Json::Bool(b) => Ok(WireValue::Bool(b)),
            other => Err(de::Error::custom(format!(
                "filter value must be a string, number or boolean, found {}",
                other
            ))),
        }
    }
}

impl WireValue {
    pub fn into_literal(self) -> String {
        match self {
            WireValue::Text(s) => s,
            WireValue::Number(n) => n.to_string(),
            WireValue::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterRequest {
    pub property: String,
    pub value: WireValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchRequest {
    pub term: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationRequest {
    pub rows: i64,
    pub page: i64,
}

/// A query request as received over the wire
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryRequest {
    pub filters: Vec<FilterRequest>,
    pub search: Option<SearchRequest>,
    pub sort: Vec<QuerySort>,
    pub pagination: Option<PaginationRequest>,
}

impl QueryRequest {
    pub fn from_json(json: &str) -> QueryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate codes and build the model.
    ///
    /// Without sort directives the configured default sort applies; without
    /// pagination the configured defaults apply.
    pub fn into_model(self, config: &QueryConfig) -> QueryResult<QueryModel> {
        let filters = self
            .filters
            .into_iter()
            .map(FilterRequest::into_filter)
            .collect::<QueryResult<Vec<_>>>()?;

        let mut model = QueryModel::new(config).with_filters(filters);

        if let Some(search) = self.search {
            model = model.with_search(search.into_search()?);
        }

        if !self.sort.is_empty() {
            let sorts = self
                .sort
                .into_iter()
                .map(|s| QuerySort::new(s.property, s.ascending))
                .collect::<QueryResult<Vec<_>>>()?;
            model = model.with_sorts(sorts);
        }

        if let Some(p) = self.pagination {
            model = model.with_pagination(QueryPagination::new(p.rows, p.page, config));
        }

        Ok(model)
    }
}

impl FilterRequest {
    fn into_filter(self) -> QueryResult<QueryFilter> {
        let operand = match self.operand.as_deref() {
            Some(code) => code.parse()?,
            None => Operand::Equals,
        };
        let operator = match self.operator.as_deref() {
            Some(code) => code.parse()?,
            None => LogicalOperator::And,
        };
        QueryFilter::new(self.property, operand, self.value.into_literal(), operator)
    }
}

impl SearchRequest {
    fn into_search(self) -> QueryResult<QuerySearch> {
        let mut search = QuerySearch::new(self.term, self.properties)?;
        if let Some(code) = self.operand.as_deref() {
            search = search.with_operand(code.parse()?);
        }
        if let Some(code) = self.operator.as_deref() {
            search = search.with_logical_operator(code.parse()?);
        }
        Ok(search)
    }
}
