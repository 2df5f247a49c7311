//! Value codec.
//!
//! Coerces a native [`Value`] to the declared type of a field and renders
//! it in the backend's literal syntax. Coercion failures surface as `Type`
//! errors, values outside the representable range of the field as `Range`
//! errors.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::data::Value;
use crate::error::{Result, SolrqError};
use crate::schema::field::{FieldDescriptor, FieldType};
use crate::util::escape::{escape_all, escape_chars, escape_term, escape_wildcard};
use crate::util::number::format_float;

/// Timestamp layout with fixed microsecond precision.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// A value coerced to a field type, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(DateTime<Utc>),
    Text(String),
    Raw(String),
    Wildcard(String),
}

impl Literal {
    /// Render for use as a term (`field:<term>`).
    pub fn to_term(&self) -> String {
        match self {
            Literal::Bool(b) => b.to_string(),
            Literal::Int(i) => escape_all(&i.to_string()),
            Literal::Float(f) => escape_all(&format_float(*f)),
            Literal::Date(dt) => escape_chars(&format_date(dt), &[':']),
            Literal::Text(s) => escape_term(s),
            Literal::Raw(s) if s.is_empty() => "\"\"".to_string(),
            Literal::Raw(s) => escape_all(s),
            Literal::Wildcard(s) => escape_wildcard(s),
        }
    }

    /// Render for use as a range bound (`[<lo> TO <hi>]`).
    pub fn to_range_bound(&self) -> String {
        match self {
            Literal::Date(dt) => escape_all(&format_date(dt)),
            other => other.to_term(),
        }
    }

    /// Whether this literal should be treated as phrase text.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Literal::Text(_) | Literal::Raw(_) | Literal::Wildcard(_)
        )
    }

    /// Order two literals of the same kind. Mixed kinds are unordered.
    pub fn compare(&self, other: &Literal) -> Option<Ordering> {
        match (self, other) {
            (Literal::Bool(a), Literal::Bool(b)) => a.partial_cmp(b),
            (Literal::Int(a), Literal::Int(b)) => a.partial_cmp(b),
            (Literal::Float(a), Literal::Float(b)) => a.partial_cmp(b),
            (Literal::Date(a), Literal::Date(b)) => a.partial_cmp(b),
            (a, b) if a.is_textual() && b.is_textual() => a.text().partial_cmp(b.text()),
            _ => None,
        }
    }

    fn text(&self) -> &str {
        match self {
            Literal::Text(s) | Literal::Raw(s) | Literal::Wildcard(s) => s,
            _ => "",
        }
    }
}

/// Format a timestamp as ISO-8601 UTC with microseconds and a `Z` suffix.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// Coerce `value` to the type of `field`.
///
/// `None` stands for the default search field and is coerced as text when
/// the schema declares no default field.
pub fn coerce(field: Option<&FieldDescriptor>, value: &Value) -> Result<Literal> {
    let field_type = field.map_or(FieldType::Text, |f| f.field_type);
    let name = field.map_or("<default>", |f| f.name.as_str());
    let literal = match field_type {
        FieldType::String | FieldType::Text => coerce_text(value),
        FieldType::Boolean => coerce_bool(value).map(Literal::Bool),
        FieldType::Int => coerce_int(value, i32::MIN as i128, i32::MAX as i128).map(Literal::Int),
        FieldType::Long => coerce_int(value, i64::MIN as i128, i64::MAX as i128).map(Literal::Int),
        FieldType::Float => coerce_float(value, f32::MAX as f64).map(Literal::Float),
        FieldType::Double => coerce_float(value, f64::MAX).map(Literal::Float),
        FieldType::Date => coerce_date(value).map(Literal::Date),
    };
    literal.map_err(|e| match e {
        SolrqError::Type(msg) => {
            SolrqError::type_error(format!("{} field '{}': {}", field_type.name(), name, msg))
        }
        SolrqError::Range(msg) => {
            SolrqError::range_error(format!("{} field '{}': {}", field_type.name(), name, msg))
        }
        other => other,
    })
}

/// Coerce and render `value` as a term for `field`.
pub fn encode(field: Option<&FieldDescriptor>, value: &Value) -> Result<String> {
    coerce(field, value).map(|literal| literal.to_term())
}

fn coerce_text(value: &Value) -> Result<Literal> {
    match value {
        Value::Str(s) => Ok(Literal::Text(s.clone())),
        Value::Raw(s) => Ok(Literal::Raw(s.0.clone())),
        Value::Wildcard(s) => Ok(Literal::Wildcard(s.0.clone())),
        Value::Int(i) => Ok(Literal::Text(i.to_string())),
        Value::Float(f) => Ok(Literal::Text(format_float(*f))),
        Value::Bool(b) => Ok(Literal::Text(b.to_string())),
        other => Err(unexpected(other)),
    }
}

/// Truthiness of a value for boolean fields.
///
/// Strings are read as boolean tokens, so `"false"` is false. Strings that
/// are not boolean tokens are rejected rather than guessed at.
fn coerce_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Str(s) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" | "on" => Ok(true),
            "false" | "f" | "no" | "n" | "0" | "off" | "" => Ok(false),
            _ => Err(SolrqError::type_error(format!(
                "'{}' is not a boolean token",
                s
            ))),
        },
        other => Err(unexpected(other)),
    }
}

fn coerce_int(value: &Value, min: i128, max: i128) -> Result<i64> {
    let wide = match value {
        Value::Int(i) => *i,
        Value::Float(f) => float_to_int(*f)?,
        Value::Str(s) => {
            let s = s.trim();
            match s.parse::<i128>() {
                Ok(i) => i,
                Err(_) => {
                    let f = s.parse::<f64>().map_err(|_| {
                        SolrqError::type_error(format!("'{}' is not a number", s))
                    })?;
                    float_to_int(f)?
                }
            }
        }
        other => return Err(unexpected(other)),
    };
    if wide < min || wide > max {
        return Err(SolrqError::range_error(format!(
            "{} is outside [{}, {}]",
            wide, min, max
        )));
    }
    // Bounds are at most the i64 range.
    Ok(wide as i64)
}

fn float_to_int(f: f64) -> Result<i128> {
    if !f.is_finite() {
        return Err(SolrqError::range_error(format!("{} is not finite", f)));
    }
    let truncated = f.trunc();
    if truncated.abs() >= 2f64.powi(126) {
        return Err(SolrqError::range_error(format!("{} is too large", f)));
    }
    Ok(truncated as i128)
}

fn coerce_float(value: &Value, max: f64) -> Result<f64> {
    let f = match value {
        Value::Float(f) => *f,
        Value::Int(i) => *i as f64,
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| SolrqError::type_error(format!("'{}' is not a number", s)))?,
        other => return Err(unexpected(other)),
    };
    if !f.is_finite() || f.abs() > max {
        return Err(SolrqError::range_error(format!(
            "{} overflows magnitude {:e}",
            f, max
        )));
    }
    Ok(f)
}

fn coerce_date(value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::Str(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| SolrqError::type_error(format!("'{}' is not a timestamp: {}", s, e))),
        other => Err(unexpected(other)),
    }
}

fn unexpected(value: &Value) -> SolrqError {
    SolrqError::type_error(format!("cannot coerce a {} value", value.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn field(name: &str, field_type: FieldType) -> FieldDescriptor {
        FieldDescriptor::new(name, field_type)
    }

    #[test]
    fn test_integral_float_encodes_like_integer() {
        let f = field("int_field", FieldType::Int);
        assert_eq!(encode(Some(&f), &Value::Int(3)).unwrap(), "3");
        assert_eq!(encode(Some(&f), &Value::Float(3.0)).unwrap(), "3");
        assert_eq!(encode(Some(&f), &Value::Float(3.1)).unwrap(), "3");
        assert_eq!(encode(Some(&f), &Value::from("3")).unwrap(), "3");
        assert_eq!(encode(Some(&f), &Value::Int(-3)).unwrap(), "\\-3");
    }

    #[test]
    fn test_int_bounds() {
        let int = field("int_field", FieldType::Int);
        let long = field("long_field", FieldType::Long);
        let two_31 = 1i128 << 31;
        let two_63 = 1i128 << 63;

        assert!(encode(Some(&int), &Value::Int(two_31)).unwrap_err().is_range());
        assert!(encode(Some(&int), &Value::Int(-two_31 - 1)).unwrap_err().is_range());
        assert_eq!(encode(Some(&int), &Value::Int(-two_31)).unwrap(), "\\-2147483648");
        assert_eq!(encode(Some(&long), &Value::Int(two_31)).unwrap(), "2147483648");
        assert!(encode(Some(&long), &Value::Int(two_63)).unwrap_err().is_range());
        assert!(encode(Some(&long), &Value::Int(-two_63 - 1)).unwrap_err().is_range());
        assert!(encode(Some(&int), &Value::from("a")).unwrap_err().is_type());
        assert!(encode(Some(&int), &Value::Float(f64::NAN)).unwrap_err().is_range());
    }

    #[test]
    fn test_float_fields() {
        let float = field("float_field", FieldType::Float);
        let double = field("double_field", FieldType::Double);

        assert_eq!(encode(Some(&float), &Value::Int(3)).unwrap(), "3.0");
        assert_eq!(encode(Some(&double), &Value::Float(3.0)).unwrap(), "3.0");
        assert!(encode(Some(&float), &Value::Float(2f64.powi(1000))).unwrap_err().is_range());
        assert!(encode(Some(&float), &Value::Float(-(2f64.powi(1000)))).unwrap_err().is_range());
        assert!(encode(Some(&double), &Value::Float(f64::INFINITY)).unwrap_err().is_range());
        assert!(encode(Some(&double), &Value::from("a")).unwrap_err().is_type());
    }

    #[test]
    fn test_float_extremes_keep_decimal_point() {
        let double = field("double_field", FieldType::Double);
        assert_eq!(encode(Some(&double), &Value::Float(1e16)).unwrap(), "1.0e16");
        assert_eq!(encode(Some(&double), &Value::Float(1e-5)).unwrap(), "1.0e\\-5");
        assert_eq!(encode(Some(&double), &Value::Int(-(10i128.pow(20)))).unwrap(), "\\-1.0e20");
    }

    #[test]
    fn test_boolean_truthiness() {
        let f = field("boolean_field", FieldType::Boolean);
        assert_eq!(encode(Some(&f), &Value::Bool(true)).unwrap(), "true");
        assert_eq!(encode(Some(&f), &Value::Int(0)).unwrap(), "false");
        assert_eq!(encode(Some(&f), &Value::Int(7)).unwrap(), "true");
        assert_eq!(encode(Some(&f), &Value::from("false")).unwrap(), "false");
        assert_eq!(encode(Some(&f), &Value::from("Yes")).unwrap(), "true");
        assert_eq!(encode(Some(&f), &Value::from("")).unwrap(), "false");
        assert!(encode(Some(&f), &Value::from("maybe")).unwrap_err().is_type());
    }

    #[test]
    fn test_dates() {
        let f = field("date_field", FieldType::Date);
        let dt = Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap();
        let literal = coerce(Some(&f), &Value::from(dt)).unwrap();
        assert_eq!(literal.to_term(), "2009-01-01T00\\:00\\:00.000000Z");
        assert_eq!(
            literal.to_range_bound(),
            "2009\\-01\\-01T00\\:00\\:00.000000Z"
        );

        let parsed = encode(Some(&f), &Value::from("2009-01-01T01:00:00+01:00")).unwrap();
        assert_eq!(parsed, "2009-01-01T00\\:00\\:00.000000Z");
        assert!(encode(Some(&f), &Value::from("a")).unwrap_err().is_type());
        assert!(encode(Some(&f), &Value::Int(3)).unwrap_err().is_type());
    }

    #[test]
    fn test_strings() {
        let f = field("string_field", FieldType::String);
        assert_eq!(encode(Some(&f), &Value::from("hello world")).unwrap(), "hello\\ world");
        assert_eq!(
            encode(Some(&f), &Value::from(crate::data::RawString::new("abc*???"))).unwrap(),
            "abc\\*\\?\\?\\?"
        );
        assert_eq!(
            encode(Some(&f), &Value::from(crate::data::WildcardString::new("abc*"))).unwrap(),
            "abc*"
        );
        assert_eq!(encode(None, &Value::from("OR")).unwrap(), "\"OR\"");
        assert!(encode(None, &Value::Null).unwrap_err().is_type());
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            Literal::Int(3).compare(&Literal::Int(-3)),
            Some(Ordering::Greater)
        );
        assert_eq!(Literal::Int(3).compare(&Literal::Float(3.0)), None);
        assert_eq!(
            Literal::Text("a".into()).compare(&Literal::Raw("b".into())),
            Some(Ordering::Less)
        );
    }
}
