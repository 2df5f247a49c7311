//! Option families.
//!
//! Each family validates a bundle of backend feature settings against the
//! field registry and renders them as request parameters. Validation
//! happens in [`OptionFamily::update`]; an update that fails leaves the
//! family exactly as it was.

pub mod facet;
pub mod field_limit;
pub mod group;
pub mod highlight;
pub mod mlt;
pub mod paginate;
pub mod sort;

use std::collections::BTreeMap;
use std::fmt::Debug;

use log::debug;
use regex::Regex;

use crate::data::Value;
use crate::error::{Result, SolrqError};
use crate::params::{ParamMap, ParamValue};
use crate::schema::FieldRegistry;
use crate::schema::field::FieldDescriptor;

pub use facet::FacetOptions;
pub use field_limit::FieldLimitOptions;
pub use group::GroupOptions;
pub use highlight::HighlightOptions;
pub use mlt::MoreLikeThisOptions;
pub use paginate::PaginateOptions;
pub use sort::SortOptions;

/// Named settings handed to an option family.
///
/// Settings apply in insertion order, so a later value for the same name
/// wins.
///
/// ```
/// use solrq::options::Settings;
///
/// let settings = Settings::new()
///     .set("fields", vec!["text_field", "string_field"])
///     .set("count", 5)
///     .query_field("text_field", 0.25);
/// assert_eq!(settings.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    entries: Vec<(String, Value)>,
    query_fields: Vec<(String, Value)>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// Per-field query boost, only meaningful to more-like-this.
    pub fn query_field(mut self, field: impl Into<String>, weight: impl Into<Value>) -> Self {
        self.query_fields.push((field.into(), weight.into()));
        self
    }

    /// Latest value set for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn query_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.query_fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of named settings, not counting query fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.query_fields.is_empty()
    }

    pub(crate) fn reject_query_fields(&self, family: &str) -> Result<()> {
        match self.query_fields.first() {
            Some((field, _)) => Err(SolrqError::config(format!(
                "{} options do not take query fields (got '{}')",
                family, field
            ))),
            None => Ok(()),
        }
    }
}

/// A bundle of validated backend feature settings.
pub trait OptionFamily: Clone + Debug {
    /// Short name used in error and log messages.
    const NAME: &'static str;

    /// Validate and merge settings into `self`. May leave `self` partially
    /// updated on error; callers go through [`OptionFamily::update`].
    fn apply(&mut self, settings: Settings) -> Result<()>;

    /// Parameters for the current settings. Empty when nothing is set.
    fn options(&self) -> ParamMap;

    /// Validate and merge settings. On error nothing changes.
    fn update(&mut self, settings: Settings) -> Result<()> {
        let mut next = self.clone();
        next.apply(settings)?;
        *self = next;
        debug!("{} options updated: {} parameters", Self::NAME, self.options().len());
        Ok(())
    }
}

/// What a named setting accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Kind {
    Int,
    NonNegative,
    Bool,
    Float,
    Str,
    /// One of a fixed set of words. Booleans are accepted when `"true"` or
    /// `"false"` is among them.
    Choice(&'static [&'static str]),
    /// Name of a declared field.
    Field,
    /// A regular expression.
    Pattern,
}

/// Validate one setting value and convert it to its parameter form.
pub(crate) fn check(
    registry: &dyn FieldRegistry,
    name: &str,
    kind: Kind,
    value: &Value,
) -> Result<ParamValue> {
    match kind {
        Kind::Int => to_int(name, value).map(ParamValue::Int),
        Kind::NonNegative => {
            let i = to_int(name, value)?;
            if i < 0 {
                return Err(SolrqError::config(format!(
                    "'{}' must be non-negative, got {}",
                    name, i
                )));
            }
            Ok(ParamValue::Int(i))
        }
        Kind::Bool => to_bool(name, value).map(ParamValue::Bool),
        Kind::Float => to_float(name, value).map(ParamValue::Float),
        Kind::Str => to_str(name, value).map(|s| ParamValue::Str(s.to_string())),
        Kind::Choice(choices) => match value {
            Value::Bool(b) if choices.contains(&if *b { "true" } else { "false" }) => {
                Ok(ParamValue::Bool(*b))
            }
            _ => {
                let s = to_str(name, value)?;
                if choices.contains(&s) {
                    Ok(ParamValue::Str(s.to_string()))
                } else {
                    Err(SolrqError::config(format!(
                        "'{}' must be one of {:?}, got '{}'",
                        name, choices, s
                    )))
                }
            }
        },
        Kind::Field => {
            let s = to_str(name, value)?;
            lookup_field(registry, s)?;
            Ok(ParamValue::Str(s.to_string()))
        }
        Kind::Pattern => {
            let s = to_str(name, value)?;
            Regex::new(s).map_err(|e| {
                SolrqError::config(format!("'{}' is not a valid pattern: {}", name, e))
            })?;
            Ok(ParamValue::Str(s.to_string()))
        }
    }
}

/// Look up a field, reporting an unknown name as a configuration error.
pub(crate) fn lookup_field<'a>(
    registry: &'a dyn FieldRegistry,
    name: &str,
) -> Result<&'a FieldDescriptor> {
    registry.lookup(name).map_err(SolrqError::into_config)
}

/// A field name or list of field names, each of which must be declared.
pub(crate) fn field_list(registry: &dyn FieldRegistry, value: &Value) -> Result<Vec<String>> {
    let names: Vec<&str> = match value {
        Value::List(items) => items
            .iter()
            .map(|item| to_str("fields", item))
            .collect::<Result<_>>()?,
        other => vec![to_str("fields", other)?],
    };
    let mut fields = Vec::with_capacity(names.len());
    for name in names {
        lookup_field(registry, name)?;
        fields.push(name.to_string());
    }
    Ok(fields)
}

/// Parse `field` or `-field` into `field asc` / `field desc`.
///
/// The field must be declared and sortable.
pub(crate) fn sort_clause(registry: &dyn FieldRegistry, key: &str) -> Result<String> {
    let key = key.trim();
    let (name, direction) = match key.strip_prefix('-') {
        Some(name) => (name, "desc"),
        None => (key, "asc"),
    };
    let descriptor = lookup_field(registry, name)?;
    if !descriptor.is_sortable() {
        return Err(SolrqError::config(format!(
            "cannot sort on field '{}': it is multi-valued or not indexed",
            name
        )));
    }
    Ok(format!("{} {}", name, direction))
}

/// Reject a setting no family knows about.
pub(crate) fn unknown_setting(family: &str, name: &str) -> SolrqError {
    SolrqError::config(format!("'{}' is not a valid {} option", name, family))
}

/// Settings scoped either globally or to the fields they were given with.
///
/// Settings passed together with a field list apply to each of those fields
/// and render as `f.<field>.<prefix>.<name>`; settings passed without fields
/// render as `<prefix>.<name>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FieldScoped {
    fields: Vec<(String, BTreeMap<String, ParamValue>)>,
    global: BTreeMap<String, ParamValue>,
}

impl FieldScoped {
    pub(crate) fn apply(&mut self, fields: &[String], values: Vec<(String, ParamValue)>) {
        if fields.is_empty() {
            self.global.extend(values);
            return;
        }
        for field in fields {
            let pos = match self.fields.iter().position(|(name, _)| name == field) {
                Some(pos) => pos,
                None => {
                    self.fields.push((field.clone(), BTreeMap::new()));
                    self.fields.len() - 1
                }
            };
            self.fields[pos].1.extend(values.iter().cloned());
        }
    }

    pub(crate) fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.global.is_empty()
    }

    /// Emit global and per-field settings under `prefix`.
    pub(crate) fn emit(&self, prefix: &str, map: &mut ParamMap) {
        for (name, value) in &self.global {
            map.insert(format!("{}.{}", prefix, name), value.clone());
        }
        for (field, values) in &self.fields {
            for (name, value) in values {
                map.insert(format!("f.{}.{}.{}", field, prefix, name), value.clone());
            }
        }
    }
}

fn to_int(name: &str, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Int(i) => i64::try_from(*i).ok(),
        Value::Str(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SolrqError::config(format!("'{}' must be an integer, got {:?}", name, value))
    })
}

fn to_bool(name: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Str(s) if s == "true" => Ok(true),
        Value::Str(s) if s == "false" => Ok(false),
        other => Err(SolrqError::config(format!(
            "'{}' must be a boolean, got {:?}",
            name, other
        ))),
    }
}

pub(crate) fn to_float(name: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f64),
        Value::Str(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(SolrqError::config(format!(
            "'{}' must be a finite number, got {:?}",
            name, value
        ))),
    }
}

pub(crate) fn to_str<'a>(name: &str, value: &'a Value) -> Result<&'a str> {
    value.as_text().ok_or_else(|| {
        SolrqError::config(format!("'{}' must be a string, got {}", name, value.kind()))
    })
}
