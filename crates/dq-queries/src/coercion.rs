//! Value Coercion
//!
//! Turns the literal string of a filter into a value of the member's type.
//! Parsing is strict: surrounding whitespace, trailing characters, or a
//! literal that would lose precision is rejected rather than truncated.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use dq_core::{QueryError, QueryResult};

use crate::schema::FieldType;
use crate::value::Value;

/// Accepted timestamp layouts after RFC 3339; naive timestamps are read as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coerce `literal` into a value of `field_type`
pub fn coerce(field_type: &FieldType, literal: &str) -> QueryResult<Value<'static>> {
    let fail = || QueryError::value_parse(field_type.name(), literal);

    match field_type {
        FieldType::Text => Ok(Value::Text(Cow::Owned(literal.to_string()))),
        FieldType::Int32 => literal.parse::<i32>().map(Value::Int32).map_err(|_| fail()),
        FieldType::Int64 => literal.parse::<i64>().map(Value::Int64).map_err(|_| fail()),
        FieldType::Float32 => literal
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Float32)
            .ok_or_else(fail),
        FieldType::Float64 => literal
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Float64)
            .ok_or_else(fail),
        FieldType::Decimal => Decimal::from_str_exact(literal)
            .map(Value::Decimal)
            .map_err(|_| fail()),
        FieldType::Bool => parse_bool(literal).map(Value::Bool).ok_or_else(fail),
        FieldType::DateTime => parse_datetime(literal).map(Value::DateTime).ok_or_else(fail),
        FieldType::Date => NaiveDate::parse_from_str(literal, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|_| fail()),
        FieldType::Enum(descriptor) => descriptor.parse(literal).map(Value::Enum).ok_or_else(fail),
        FieldType::Object(_) | FieldType::Unsupported(_) => {
            Err(QueryError::unsupported_type(field_type.name()))
        }
    }
}

fn parse_bool(literal: &str) -> Option<bool> {
    if literal.eq_ignore_ascii_case("true") {
        Some(true)
    } else if literal.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// RFC 3339 first, then naive layouts, then a bare date at midnight
fn parse_datetime(literal: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(literal) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(literal, format).ok())
    {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(literal, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Role;
    use crate::schema::QueryEnum;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(coerce(&FieldType::Int32, "2500").unwrap(), Value::Int32(2500));
        assert_eq!(coerce(&FieldType::Int64, "-42").unwrap(), Value::Int64(-42));
        assert_eq!(coerce(&FieldType::Float64, "2.5").unwrap(), Value::Float64(2.5));
        assert_eq!(
            coerce(&FieldType::Decimal, "2500").unwrap(),
            Value::Decimal(Decimal::from(2500))
        );
        assert_eq!(
            coerce(&FieldType::Decimal, "19.99").unwrap(),
            Value::Decimal(Decimal::new(1999, 2))
        );
    }

    #[test]
    fn test_unparsable_numbers_fail() {
        for (field_type, literal) in [
            (FieldType::Int32, "abc"),
            (FieldType::Int32, "12.5"),
            (FieldType::Int32, " 12"),
            (FieldType::Int32, "3000000000"),
            (FieldType::Int64, "12abc"),
            (FieldType::Float64, "NaN"),
            (FieldType::Float32, "inf"),
            (FieldType::Decimal, "1.2.3"),
        ] {
            let err = coerce(&field_type, literal).unwrap_err();
            match err {
                QueryError::ValueParse { type_name, literal: l } => {
                    assert_eq!(type_name, field_type.name());
                    assert_eq!(l, literal);
                }
                other => panic!("unexpected error for {:?}: {:?}", literal, other),
            }
        }
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(coerce(&FieldType::Bool, "true").unwrap(), Value::Bool(true));
        assert_eq!(coerce(&FieldType::Bool, "False").unwrap(), Value::Bool(false));
        assert!(coerce(&FieldType::Bool, "yes").is_err());
        assert!(coerce(&FieldType::Bool, "1").is_err());
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(
            coerce(&FieldType::Text, " Global Company ").unwrap(),
            Value::from(" Global Company ").into_owned()
        );
    }

    #[test]
    fn test_datetime_coercion() {
        let expected = Utc.with_ymd_and_hms(2023, 3, 15, 8, 30, 0).unwrap();
        assert_eq!(
            coerce(&FieldType::DateTime, "2023-03-15T08:30:00Z").unwrap(),
            Value::DateTime(expected)
        );
        assert_eq!(
            coerce(&FieldType::DateTime, "2023-03-15T10:30:00+02:00").unwrap(),
            Value::DateTime(expected)
        );
        assert_eq!(
            coerce(&FieldType::DateTime, "2023-03-15 08:30:00").unwrap(),
            Value::DateTime(expected)
        );
        assert_eq!(
            coerce(&FieldType::DateTime, "2023-03-15").unwrap(),
            Value::DateTime(Utc.with_ymd_and_hms(2023, 3, 15, 0, 0, 0).unwrap())
        );
        assert!(coerce(&FieldType::DateTime, "15/03/2023").is_err());
        assert!(coerce(&FieldType::DateTime, "2023-02-30").is_err());
    }

    #[test]
    fn test_date_coercion_is_strict() {
        assert_eq!(
            coerce(&FieldType::Date, "2024-02-29").unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(coerce(&FieldType::Date, "2024-02-29T10:00:00").is_err());
    }

    #[test]
    fn test_enum_coercion_ignores_case() {
        let field_type = Role::field_type();
        match coerce(&field_type, "developer").unwrap() {
            Value::Enum(member) => assert_eq!(member.name(), "Developer"),
            other => panic!("unexpected value: {:?}", other),
        }
        let err = coerce(&field_type, "Astronaut").unwrap_err();
        assert!(matches!(err, QueryError::ValueParse { ref type_name, .. } if type_name == "Role"));
    }

    #[test]
    fn test_objects_are_not_coercible() {
        let err = coerce(&FieldType::Unsupported("list"), "x").unwrap_err();
        assert!(matches!(err, QueryError::Schema(_)));
    }
}
