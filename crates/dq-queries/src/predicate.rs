//! Predicate Compiler
//!
//! Folds the filter list of a query (plus its expanded search clause) into a
//! small boolean expression tree that can be evaluated against any record of
//! the schema it was compiled for.
//!
//! Filters combine strictly left to right: each filter joins the expression
//! built so far with its own logical operator, so `a AND b OR c` compiles to
//! `((a AND b) OR c)` and there is no precedence between AND and OR. The
//! logical operator of the first filter is never consulted.

use std::fmt;

use tracing::debug;

use dq_core::QueryResult;

use crate::coercion::coerce;
use crate::filters::{LogicalOperator, QueryFilter, QuerySearch};
use crate::operands::{ensure_operand, Operand};
use crate::path::PropertyPath;
use crate::schema::{Record, Schema};
use crate::value::Value;

/// One atomic comparison of a property against a coerced literal
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    path: PropertyPath,
    operand: Operand,
    value: Value<'static>,
}

impl Comparison {
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn operand(&self) -> Operand {
        self.operand
    }

    pub fn value(&self) -> &Value<'static> {
        &self.value
    }

    /// Evaluate against a record.
    ///
    /// A null member only satisfies `NotEquals`.
    pub fn evaluate(&self, record: &dyn Record) -> bool {
        let actual = self.path.read(record);
        if actual.is_null() {
            return self.operand == Operand::NotEquals;
        }

        if self.operand.is_text_match() {
            return match (actual.as_str(), self.value.as_str()) {
                (Some(haystack), Some(needle)) => match self.operand {
                    Operand::Contains => haystack.contains(needle),
                    Operand::StartsWith => haystack.starts_with(needle),
                    _ => haystack.ends_with(needle),
                },
                _ => false,
            };
        }

        match actual.compare(&self.value) {
            Some(ordering) => self.operand.eval_ordering(ordering),
            None => self.operand == Operand::NotEquals,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.path, self.operand, self.value)
    }
}

/// Boolean expression over one record
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record
    Always,
    Compare(Comparison),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn evaluate(&self, record: &dyn Record) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Compare(comparison) => comparison.evaluate(record),
            Predicate::And(left, right) => left.evaluate(record) && right.evaluate(record),
            Predicate::Or(left, right) => left.evaluate(record) || right.evaluate(record),
        }
    }

    /// Join `self` and `rhs` with `operator`, `self` on the left
    pub fn combine(self, operator: LogicalOperator, rhs: Predicate) -> Predicate {
        match operator {
            LogicalOperator::And => Predicate::And(Box::new(self), Box::new(rhs)),
            LogicalOperator::Or => Predicate::Or(Box::new(self), Box::new(rhs)),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    /// Number of atomic comparisons in the tree
    pub fn comparison_count(&self) -> usize {
        match self {
            Predicate::Always => 0,
            Predicate::Compare(_) => 1,
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.comparison_count() + right.comparison_count()
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => f.write_str("true"),
            Predicate::Compare(comparison) => write!(f, "{}", comparison),
            Predicate::And(left, right) => write!(f, "({} and {})", left, right),
            Predicate::Or(left, right) => write!(f, "({} or {})", left, right),
        }
    }
}

/// Compiles filters into a [`Predicate`] for one schema
#[derive(Debug, Clone, Copy)]
pub struct PredicateCompiler<'s> {
    schema: &'s Schema,
}

impl<'s> PredicateCompiler<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    /// Resolve, type-check and coerce a single filter
    pub fn compile_filter(&self, filter: &QueryFilter) -> QueryResult<Comparison> {
        let path = PropertyPath::resolve(self.schema, filter.property())?;
        ensure_operand(filter.operand(), path.field_type())?;
        let value = coerce(path.field_type(), filter.value())?;

        Ok(Comparison {
            path,
            operand: filter.operand(),
            value,
        })
    }

    /// Compile explicit filters followed by the expanded search clause
    pub fn compile(&self, filters: &[QueryFilter], search: Option<&QuerySearch>) -> QueryResult<Predicate> {
        let expanded = search.map(QuerySearch::expand).unwrap_or_default();

        let mut all = filters.iter().chain(expanded.iter());
        let Some(first) = all.next() else {
            return Ok(Predicate::Always);
        };

        let mut predicate = Predicate::Compare(self.compile_filter(first)?);
        for filter in all {
            let rhs = Predicate::Compare(self.compile_filter(filter)?);
            predicate = predicate.combine(filter.logical_operator(), rhs);
        }

        debug!(
            schema = self.schema.name(),
            filters = filters.len(),
            search_filters = expanded.len(),
            predicate = %predicate,
            "Compiled predicate"
        );
        Ok(predicate)
    }
}
