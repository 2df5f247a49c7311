use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// A string whose every special character is matched literally.
///
/// Unlike a plain string, a raw string is never quoted as a reserved word
/// and escapes the wildcard characters `*` and `?` too.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawString(pub String);

impl RawString {
    pub fn new(s: impl Into<String>) -> Self {
        RawString(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A string in which unescaped `*` and `?` are wildcards.
///
/// A backslash escapes the following character, so `\*` matches a literal
/// asterisk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WildcardString(pub String);

impl WildcardString {
    pub fn new(s: impl Into<String>) -> Self {
        WildcardString(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A native value handed to the query layer.
///
/// Values carry no field type of their own; the codec coerces them against
/// the declared type of the field they are matched against.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Integers are held wide so that out-of-range input stays observable.
    Int(i128),
    Float(f64),

    /// Plain string, escaped for literal matching.
    Str(String),

    Raw(RawString),

    Wildcard(WildcardString),

    /// Date and time in UTC.
    DateTime(DateTime<Utc>),

    /// Several values for the same field.
    List(Vec<Value>),
}

impl Value {
    /// Returns the string content of the textual variants.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Raw(s) => Some(s.as_str()),
            Value::Wildcard(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Raw(_) => "raw string",
            Value::Wildcard(_) => "wildcard string",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
        }
    }
}

// --- Conversions ---

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<RawString> for Value {
    fn from(v: RawString) -> Self {
        Value::Raw(v)
    }
}

impl From<WildcardString> for Value {
    fn from(v: WildcardString) -> Self {
        Value::Wildcard(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(v as i128)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, usize, isize);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(dt: DateTime<Tz>) -> Self {
        Value::DateTime(dt.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt.and_utc())
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::DateTime(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}
