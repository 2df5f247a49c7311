//! Request parameter encoding.
//!
//! Builders and option families produce a [`ParamMap`]; [`encode`] turns it
//! into the flat `(name, value)` pair list a transport puts on the wire.

use std::collections::BTreeMap;
use std::fmt;

use crate::util::number::format_float;

/// A single parameter value before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Repeated parameter, one pair per element.
    List(Vec<String>),
}

impl ParamValue {
    /// Encoded string forms, one per emitted pair.
    fn encoded(&self) -> Vec<String> {
        match self {
            ParamValue::List(items) => items.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => f.write_str(&format_float(*x)),
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::List(items)
    }
}

/// Unordered parameter mapping. Keys iterate in lexicographic order.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Encoded parameters, ready for a transport.
pub type Params = Vec<(String, String)>;

/// Encode a mapping. Keys come out sorted; list values repeat their key.
pub fn encode(map: &ParamMap) -> Params {
    encode_pairs(map.iter().map(|(k, v)| (k.as_str(), v)))
}

/// Encode an explicit pair sequence, keeping its order.
pub fn encode_pairs<'a, K, I>(pairs: I) -> Params
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, &'a ParamValue)>,
{
    let mut params = Vec::new();
    for (key, value) in pairs {
        for encoded in value.encoded() {
            params.push((key.as_ref().to_string(), encoded));
        }
    }
    params
}
