//! Property Paths
//!
//! Resolves dot-separated paths such as `"Company.Address.Street"` against a
//! record schema into an accessor that reads the member from any record of
//! that schema.

use std::fmt;

use dq_core::{QueryError, QueryResult};

use crate::schema::{FieldType, Record, Schema};
use crate::value::Value;

/// A property path validated against a schema
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPath {
    /// Canonical member names, root first
    segments: Vec<&'static str>,
    field_type: FieldType,
}

impl PropertyPath {
    /// Resolve `path` against `schema`.
    ///
    /// Every segment but the last must name a nested record member. Fails with
    /// an argument error for empty paths or segments, and with a schema error
    /// naming the first segment that does not exist on the type it was looked
    /// up on.
    pub fn resolve(schema: &Schema, path: &str) -> QueryResult<Self> {
        if path.trim().is_empty() {
            return Err(QueryError::argument("property", "path must not be empty"));
        }

        let mut segments = Vec::new();
        let mut owner_name = schema.name();
        let mut current = Some(schema);
        let mut field_type = None;

        for segment in path.split('.') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(QueryError::argument(
                    "property",
                    format!("path '{}' contains an empty segment", path),
                ));
            }

            // The previous segment was a scalar: nothing to navigate into
            let owner = current.ok_or_else(|| QueryError::member_not_found(segment, owner_name))?;
            let field = owner
                .field(segment)
                .ok_or_else(|| QueryError::member_not_found(segment, owner.name()))?;

            segments.push(field.name);
            owner_name = field.field_type.name();
            current = field.field_type.nested_schema();
            field_type = Some(field.field_type);
        }

        let field_type = field_type
            .ok_or_else(|| QueryError::argument("property", "path must not be empty"))?;

        Ok(Self {
            segments,
            field_type,
        })
    }

    /// Semantic type of the member at the end of the path
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// Read the member from a record.
    ///
    /// An absent nested record along the way reads as `Value::Null`.
    pub fn read<'r>(&self, record: &'r dyn Record) -> Value<'r> {
        let Some((leaf, parents)) = self.segments.split_last() else {
            return Value::Null;
        };

        let mut current = record;
        for segment in parents {
            match current.nested(segment) {
                Some(next) => current = next,
                None => return Value::Null,
            }
        }
        current.value(leaf)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
