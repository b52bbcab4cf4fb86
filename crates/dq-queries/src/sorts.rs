//! Sort Compiler
//!
//! Turns the ordered sort directives of a query into a [`SortPlan`]: resolved
//! property paths checked for orderability, combined according to the
//! configured [`SortComposition`].

use std::cmp::Ordering;

use tracing::debug;

use dq_core::{QueryResult, QuerySort, SchemaError, SortComposition};

use crate::path::PropertyPath;
use crate::schema::{Record, Schema};

/// One resolved ordering key
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    path: PropertyPath,
    ascending: bool,
}

impl SortKey {
    /// Resolve a directive, rejecting members that have no natural order
    pub fn compile(schema: &Schema, sort: &QuerySort) -> QueryResult<Self> {
        let path = PropertyPath::resolve(schema, &sort.property)?;
        if !path.field_type().is_orderable() {
            return Err(SchemaError::NotOrderable {
                property: path.to_string(),
                type_name: path.field_type().name().to_string(),
            }
            .into());
        }
        Ok(Self {
            path,
            ascending: sort.ascending,
        })
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Nulls order first ascending, last descending
    pub fn compare(&self, a: &dyn Record, b: &dyn Record) -> Ordering {
        let ordering = self.path.read(a).sort_cmp(&self.path.read(b));
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

/// Compiled ordering of a query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortPlan {
    keys: Vec<SortKey>,
    composition: SortComposition,
}

impl SortPlan {
    pub fn compile(schema: &Schema, sorts: &[QuerySort], composition: SortComposition) -> QueryResult<Self> {
        let keys = sorts
            .iter()
            .map(|sort| SortKey::compile(schema, sort))
            .collect::<QueryResult<Vec<_>>>()?;

        debug!(
            schema = schema.name(),
            keys = keys.len(),
            composition = ?composition,
            "Compiled sort plan"
        );
        Ok(Self { keys, composition })
    }

    /// Plan that keeps the source order
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn composition(&self) -> SortComposition {
        self.composition
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compare two records.
    ///
    /// `MultiKey` treats the first directive as the primary key. `Sequential`
    /// gives the result of stable-sorting once per directive in list order,
    /// which makes the last directive primary.
    pub fn compare(&self, a: &dyn Record, b: &dyn Record) -> Ordering {
        match self.composition {
            SortComposition::MultiKey => self
                .keys
                .iter()
                .map(|key| key.compare(a, b))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal),
            SortComposition::Sequential => self
                .keys
                .iter()
                .rev()
                .map(|key| key.compare(a, b))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal),
        }
    }

    /// Stable in-place sort; an empty plan leaves `rows` untouched
    pub fn sort<R: Record>(&self, rows: &mut [&R]) {
        if self.is_empty() {
            return;
        }
        rows.sort_by(|a, b| self.compare(*a, *b));
    }
}
