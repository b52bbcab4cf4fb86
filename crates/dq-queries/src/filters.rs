//! Query Filters
//!
//! Filters are the building blocks of a query: one comparison of a property
//! against a literal, plus the logical operator that joins it to the filters
//! before it. A search clause is shorthand for several filters sharing one
//! term, one operand and one logical operator.

use std::fmt;
use std::str::FromStr;

use dq_core::{QueryError, QueryResult};

use crate::operands::Operand;

/// How a filter joins the expression built from the filters before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl FromStr for LogicalOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(QueryError::argument(
                "operator",
                format!("unknown logical operator '{}'", other),
            )),
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    property: String,
    operand: Operand,
    value: String,
    logical_operator: LogicalOperator,
}

impl QueryFilter {
    /// Create a filter, rejecting an empty property path or value
    pub fn new(
        property: impl Into<String>,
        operand: Operand,
        value: impl Into<String>,
        logical_operator: LogicalOperator,
    ) -> QueryResult<Self> {
        let property = property.into();
        let value = value.into();
        if property.trim().is_empty() {
            return Err(QueryError::argument("filter.property", "must not be empty"));
        }
        if value.is_empty() {
            return Err(QueryError::argument(
                "filter.value",
                format!("must not be empty (property '{}')", property),
            ));
        }
        Ok(Self {
            property,
            operand,
            value,
            logical_operator,
        })
    }

    /// Filter joined with AND
    pub fn and(property: impl Into<String>, operand: Operand, value: impl Into<String>) -> QueryResult<Self> {
        Self::new(property, operand, value, LogicalOperator::And)
    }

    /// Filter joined with OR
    pub fn or(property: impl Into<String>, operand: Operand, value: impl Into<String>) -> QueryResult<Self> {
        Self::new(property, operand, value, LogicalOperator::Or)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn operand(&self) -> Operand {
        self.operand
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn logical_operator(&self) -> LogicalOperator {
        self.logical_operator
    }
}

/// A term matched against several properties at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySearch {
    term: String,
    properties: Vec<String>,
    operand: Operand,
    logical_operator: LogicalOperator,
}

impl QuerySearch {
    /// Search `properties` for `term` with `Contains`, any match sufficing.
    ///
    /// Duplicate properties are dropped, keeping the first occurrence.
    pub fn new<I, S>(term: impl Into<String>, properties: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let term = term.into();
        if term.is_empty() {
            return Err(QueryError::argument("search.term", "must not be empty"));
        }

        let mut unique: Vec<String> = Vec::new();
        for property in properties {
            let property = property.into();
            if property.trim().is_empty() {
                return Err(QueryError::argument("search.properties", "must not contain empty paths"));
            }
            if !unique.contains(&property) {
                unique.push(property);
            }
        }

        Ok(Self {
            term,
            properties: unique,
            operand: Operand::Contains,
            logical_operator: LogicalOperator::Or,
        })
    }

    pub fn with_operand(mut self, operand: Operand) -> Self {
        self.operand = operand;
        self
    }

    pub fn with_logical_operator(mut self, logical_operator: LogicalOperator) -> Self {
        self.logical_operator = logical_operator;
        self
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn operand(&self) -> Operand {
        self.operand
    }

    pub fn logical_operator(&self) -> LogicalOperator {
        self.logical_operator
    }

    /// One filter per property, in listed order, sharing this clause's
    /// term, operand and logical operator
    pub fn expand(&self) -> Vec<QueryFilter> {
        self.properties
            .iter()
            .map(|property| QueryFilter {
                property: property.clone(),
                operand: self.operand,
                value: self.term.clone(),
                logical_operator: self.logical_operator,
            })
            .collect()
    }
}
