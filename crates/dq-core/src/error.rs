//! Core error types for the query engine
//!
//! Every failure is a deterministic function of the record schema and the
//! query model, so nothing here is retryable.

use thiserror::Error;

/// Core error type for all query operations
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid argument {argument}: {message}")]
    Argument { argument: String, message: String },

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Cannot parse '{literal}' as {type_name}")]
    ValueParse { type_name: String, literal: String },

    #[error("Malformed query payload: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query source error: {0}")]
    Provider(String),
}

/// Errors raised when a query does not fit the record schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Member '{member}' not found on type {type_name}")]
    MemberNotFound { member: String, type_name: String },

    #[error("Type {type_name} is not supported for querying")]
    UnsupportedType { type_name: String },

    #[error("Operand '{operand}' is not allowed for type {type_name}")]
    OperandNotAllowed { operand: String, type_name: String },

    #[error("Property '{property}' of type {type_name} cannot be used for ordering")]
    NotOrderable { property: String, type_name: String },
}

impl QueryError {
    pub fn argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::Argument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    pub fn value_parse(type_name: impl Into<String>, literal: impl Into<String>) -> Self {
        QueryError::ValueParse {
            type_name: type_name.into(),
            literal: literal.into(),
        }
    }

    pub fn member_not_found(member: impl Into<String>, type_name: impl Into<String>) -> Self {
        SchemaError::MemberNotFound {
            member: member.into(),
            type_name: type_name.into(),
        }
        .into()
    }

    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        SchemaError::UnsupportedType {
            type_name: type_name.into(),
        }
        .into()
    }

    /// HTTP status code an API layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::Argument { .. } | QueryError::Deserialization(_) => 400,
            QueryError::Schema(_) | QueryError::ValueParse { .. } => 422,
            QueryError::Config(_) | QueryError::Provider(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::Argument { .. } => "invalid_argument",
            QueryError::Schema(SchemaError::MemberNotFound { .. }) => "unknown_property",
            QueryError::Schema(SchemaError::UnsupportedType { .. }) => "unsupported_type",
            QueryError::Schema(SchemaError::OperandNotAllowed { .. }) => "operand_not_allowed",
            QueryError::Schema(SchemaError::NotOrderable { .. }) => "not_orderable",
            QueryError::ValueParse { .. } => "invalid_value",
            QueryError::Deserialization(_) => "malformed_payload",
            QueryError::Config(_) => "configuration_error",
            QueryError::Provider(_) => "query_source_error",
        }
    }
}
