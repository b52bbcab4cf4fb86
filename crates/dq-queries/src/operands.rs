//! Filter Operands
//!
//! The comparison kinds a filter can apply, their wire codes, and the table
//! of operands legal for each category of member type.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use dq_core::{QueryError, QueryResult, SchemaError};

use crate::schema::{FieldType, TypeCategory};

/// Comparison kind of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Equals (eq)
    Equals,
    /// Not equals (neq)
    NotEquals,
    /// Greater than (gt)
    GreaterThan,
    /// Greater than or equal (gte)
    GreaterThanOrEqual,
    /// Less than (lt)
    LessThan,
    /// Less than or equal (lte)
    LessThanOrEqual,
    /// Substring (cn)
    Contains,
    /// Prefix (sw)
    StartsWith,
    /// Suffix (ew)
    EndsWith,
}

const TEXT_OPERANDS: &[Operand] = &[
    Operand::Equals,
    Operand::NotEquals,
    Operand::Contains,
    Operand::StartsWith,
    Operand::EndsWith,
];

const RELATIONAL_OPERANDS: &[Operand] = &[
    Operand::Equals,
    Operand::NotEquals,
    Operand::GreaterThan,
    Operand::GreaterThanOrEqual,
    Operand::LessThan,
    Operand::LessThanOrEqual,
];

const EQUALITY_OPERANDS: &[Operand] = &[Operand::Equals, Operand::NotEquals];

impl Operand {
    pub const ALL: [Operand; 9] = [
        Operand::Equals,
        Operand::NotEquals,
        Operand::GreaterThan,
        Operand::GreaterThanOrEqual,
        Operand::LessThan,
        Operand::LessThanOrEqual,
        Operand::Contains,
        Operand::StartsWith,
        Operand::EndsWith,
    ];

    /// Wire code of this operand
    pub fn code(&self) -> &'static str {
        match self {
            Self::Equals => "eq",
            Self::NotEquals => "neq",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "gte",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "lte",
            Self::Contains => "cn",
            Self::StartsWith => "sw",
            Self::EndsWith => "ew",
        }
    }

    /// Whether the operand works on text only
    pub fn is_text_match(&self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }

    /// Evaluate an ordering-based operand for the ordering of `field` vs `literal`
    pub fn eval_ordering(&self, ordering: Ordering) -> bool {
        match self {
            Self::Equals => ordering == Ordering::Equal,
            Self::NotEquals => ordering != Ordering::Equal,
            Self::GreaterThan => ordering == Ordering::Greater,
            Self::GreaterThanOrEqual => ordering != Ordering::Less,
            Self::LessThan => ordering == Ordering::Less,
            Self::LessThanOrEqual => ordering != Ordering::Greater,
            Self::Contains | Self::StartsWith | Self::EndsWith => false,
        }
    }
}

impl FromStr for Operand {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eq" => Ok(Self::Equals),
            "neq" => Ok(Self::NotEquals),
            "gt" => Ok(Self::GreaterThan),
            "gte" => Ok(Self::GreaterThanOrEqual),
            "lt" => Ok(Self::LessThan),
            "lte" => Ok(Self::LessThanOrEqual),
            "cn" => Ok(Self::Contains),
            "sw" => Ok(Self::StartsWith),
            "ew" => Ok(Self::EndsWith),
            other => Err(QueryError::argument(
                "operand",
                format!("unknown operand '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Operands legal for a member type.
///
/// Objects and unsupported members have no entry and fail with a schema error.
pub fn operands_for(field_type: &FieldType) -> QueryResult<&'static [Operand]> {
    match field_type.category() {
        Some(TypeCategory::Text) => Ok(TEXT_OPERANDS),
        Some(TypeCategory::Numeric) | Some(TypeCategory::Temporal) => Ok(RELATIONAL_OPERANDS),
        Some(TypeCategory::Boolean) | Some(TypeCategory::Enumerated) => Ok(EQUALITY_OPERANDS),
        None => Err(QueryError::unsupported_type(field_type.name())),
    }
}

/// Whether `operand` may be applied to a member of `field_type`.
///
/// Returns `Ok(false)` for a supported type that does not allow the operand;
/// an unsupported type is an error, not `false`.
pub fn validate_operand(operand: Operand, field_type: &FieldType) -> QueryResult<bool> {
    Ok(operands_for(field_type)?.contains(&operand))
}

/// Like [`validate_operand`], but a disallowed operand is a schema error
pub fn ensure_operand(operand: Operand, field_type: &FieldType) -> QueryResult<()> {
    if validate_operand(operand, field_type)? {
        Ok(())
    } else {
        Err(SchemaError::OperandNotAllowed {
            operand: operand.code().to_string(),
            type_name: field_type.name().to_string(),
        }
        .into())
    }
}
