//! Record Schemas
//!
//! A schema is the static description of a record type: its member names and
//! their semantic types. Schemas are built once per record type and kept in a
//! `LazyLock` static; property paths are resolved against them without
//! touching any record.
//!
//! ```
//! use std::sync::LazyLock;
//! use dq_queries::schema::{FieldType, Record, Schema};
//! use dq_queries::value::Value;
//!
//! struct City {
//!     name: String,
//!     population: i64,
//! }
//!
//! static CITY_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
//!     Schema::builder("City")
//!         .field("Name", FieldType::Text)
//!         .field("Population", FieldType::Int64)
//!         .build()
//! });
//!
//! impl Record for City {
//!     fn schema() -> &'static Schema {
//!         &CITY_SCHEMA
//!     }
//!
//!     fn value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "Name" => Value::from(&self.name),
//!             "Population" => Value::from(self.population),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! assert!(City::schema().field("Population").is_some());
//! ```

use std::fmt;

use crate::value::{EnumValue, Value};

/// Function returning the schema of a nested record type.
///
/// A function pointer rather than a reference so schemas can refer to each
/// other (or to themselves) while being built lazily.
pub type SchemaRef = fn() -> &'static Schema;

/// Semantic type of a record member
#[derive(Clone, Copy)]
pub enum FieldType {
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Bool,
    DateTime,
    Date,
    Enum(&'static EnumDescriptor),
    /// A nested record that paths can navigate into
    Object(SchemaRef),
    /// A member that exists but cannot be filtered or sorted on
    Unsupported(&'static str),
}

/// Broad category of a field type, used by the operand table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Text,
    Numeric,
    Temporal,
    Boolean,
    Enumerated,
}

impl FieldType {
    /// Type name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Int32 => "i32",
            FieldType::Int64 => "i64",
            FieldType::Float32 => "f32",
            FieldType::Float64 => "f64",
            FieldType::Decimal => "decimal",
            FieldType::Bool => "bool",
            FieldType::DateTime => "datetime",
            FieldType::Date => "date",
            FieldType::Enum(descriptor) => descriptor.name,
            FieldType::Object(schema) => schema().name(),
            FieldType::Unsupported(name) => *name,
        }
    }

    /// Category of a scalar type; `None` for objects and unsupported members
    pub fn category(&self) -> Option<TypeCategory> {
        match self {
            FieldType::Text => Some(TypeCategory::Text),
            FieldType::Int32
            | FieldType::Int64
            | FieldType::Float32
            | FieldType::Float64
            | FieldType::Decimal => Some(TypeCategory::Numeric),
            FieldType::DateTime | FieldType::Date => Some(TypeCategory::Temporal),
            FieldType::Bool => Some(TypeCategory::Boolean),
            FieldType::Enum(_) => Some(TypeCategory::Enumerated),
            FieldType::Object(_) | FieldType::Unsupported(_) => None,
        }
    }

    /// Whether rows can be ordered by a member of this type
    pub fn is_orderable(&self) -> bool {
        self.category().is_some()
    }

    /// Schema of a nested record type
    pub fn nested_schema(&self) -> Option<&'static Schema> {
        match self {
            FieldType::Object(schema) => Some(schema()),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Enum(descriptor) => write!(f, "Enum({})", descriptor.name),
            FieldType::Object(schema) => write!(f, "Object({})", schema().name()),
            FieldType::Unsupported(name) => write!(f, "Unsupported({})", name),
            other => f.write_str(other.name()),
        }
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldType::Enum(a), FieldType::Enum(b)) => a == b,
            (FieldType::Object(a), FieldType::Object(b)) => a().name() == b().name(),
            (FieldType::Unsupported(a), FieldType::Unsupported(b)) => a == b,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

/// Named constants of an enumerated type, in declaration order
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumDescriptor {
    pub const fn new(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self { name, variants }
    }

    /// Case-insensitive lookup of a member by name
    pub fn parse(&self, literal: &str) -> Option<EnumValue> {
        self.variants
            .iter()
            .position(|variant| variant.eq_ignore_ascii_case(literal))
            .map(|ordinal| EnumValue::new(ordinal as u32, self.variants[ordinal]))
    }

    pub fn variant(&self, ordinal: u32) -> Option<&'static str> {
        self.variants.get(ordinal as usize).copied()
    }
}

/// Rust enums exposed to queries as named constants
pub trait QueryEnum {
    const DESCRIPTOR: &'static EnumDescriptor;

    /// Position of this member in `DESCRIPTOR.variants`
    fn ordinal(&self) -> u32;

    fn field_type() -> FieldType
    where
        Self: Sized,
    {
        FieldType::Enum(Self::DESCRIPTOR)
    }
}

/// A member of a record schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
}

/// Static description of a record type
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            name,
            fields: vec![],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look a member up by name.
    ///
    /// An exact match wins; otherwise the first member matching
    /// case-insensitively is returned.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    name: &'static str,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Add a member. A later member with the same name replaces the earlier one.
    pub fn field(mut self, name: &'static str, field_type: FieldType) -> Self {
        self.fields.retain(|f| f.name != name);
        self.fields.push(FieldDef { name, field_type });
        self
    }

    /// Add a nested record member
    pub fn object(self, name: &'static str, schema: SchemaRef) -> Self {
        self.field(name, FieldType::Object(schema))
    }

    /// Add an enumerated member
    pub fn enumeration<E: QueryEnum>(self, name: &'static str) -> Self {
        self.field(name, E::field_type())
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}

/// A record that can be queried.
///
/// Implementations answer member reads by the canonical names declared in
/// their schema.
pub trait Record {
    fn schema() -> &'static Schema
    where
        Self: Sized;

    /// Value of a scalar member. Absent optional members read as `Value::Null`.
    fn value(&self, field: &str) -> Value<'_>;

    /// Nested record behind an object member, `None` when absent
    fn nested(&self, _field: &str) -> Option<&dyn Record> {
        None
    }
}
