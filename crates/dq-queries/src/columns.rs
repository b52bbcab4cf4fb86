//! Projection Columns
//!
//! A [`Projection`] is a list of property paths selected for output. It is
//! compiled against a schema like filters and sorts are, and turns each
//! record into a JSON object nested along the dotted paths.

use serde_json::{Map, Value as Json};

use dq_core::{QueryError, QueryResult};

use crate::path::PropertyPath;
use crate::schema::{Record, Schema};

/// Compiled list of output columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    columns: Vec<PropertyPath>,
}

impl Projection {
    /// Resolve `paths` against `schema`.
    ///
    /// Columns must be scalar members; a path naming the same member twice is
    /// kept once.
    pub fn compile<I, S>(schema: &Schema, paths: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns: Vec<PropertyPath> = Vec::new();
        for path in paths {
            let column = PropertyPath::resolve(schema, path.as_ref())?;
            if column.field_type().category().is_none() {
                return Err(QueryError::unsupported_type(column.field_type().name()));
            }
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        Ok(Self { columns })
    }

    /// Every scalar member at the top level of `schema`, in declaration order
    pub fn all_scalars(schema: &Schema) -> Self {
        let columns = schema
            .fields()
            .iter()
            .filter(|f| f.field_type.category().is_some())
            .filter_map(|f| PropertyPath::resolve(schema, f.name).ok())
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[PropertyPath] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Canonical dotted names of the columns
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.to_string()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.to_string() == name)
    }

    /// Project one record
    pub fn project(&self, record: &dyn Record) -> Map<String, Json> {
        let mut object = Map::new();
        for column in &self.columns {
            insert_path(&mut object, column.segments(), column.read(record).to_json());
        }
        object
    }
}

fn insert_path(object: &mut Map<String, Json>, segments: &[&str], value: Json) {
    match segments {
        [] => {}
        [leaf] => {
            object.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let child = object
                .entry((*head).to_string())
                .or_insert_with(|| Json::Object(Map::new()));
            if !child.is_object() {
                *child = Json::Object(Map::new());
            }
            if let Json::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}
