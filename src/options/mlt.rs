//! More-like-this.
//!
//! `fields` names the fields similarity is computed over; they render
//! sorted. Query fields (see [`Settings::query_field`]) boost individual
//! fields and must be among `fields`.

use std::collections::BTreeSet;
use std::sync::Arc;

use ahash::AHashMap;
use lazy_static::lazy_static;

use crate::error::{Result, SolrqError};
use crate::options::{
    Kind, OptionFamily, Settings, check, field_list, to_float, unknown_setting,
};
use crate::params::{ParamMap, ParamValue};
use crate::schema::FieldRegistry;
use crate::util::number::format_float;

lazy_static! {
    static ref MLT_SETTINGS: AHashMap<&'static str, Kind> = {
        let mut m = AHashMap::new();
        m.insert("count", Kind::Int);
        m.insert("mintf", Kind::Int);
        m.insert("mindf", Kind::Int);
        m.insert("minwl", Kind::Int);
        m.insert("maxwl", Kind::Int);
        m.insert("maxqt", Kind::Int);
        m.insert("maxntp", Kind::Int);
        m.insert("boost", Kind::Bool);
        m.insert("interestingTerms", Kind::Choice(&["list", "details", "none"]));
        m.insert("match.include", Kind::Bool);
        m.insert("match.offset", Kind::Int);
        m
    };
}

#[derive(Debug, Clone)]
pub struct MoreLikeThisOptions {
    registry: Arc<dyn FieldRegistry>,
    fields: BTreeSet<String>,
    query_fields: Vec<(String, f64)>,
    values: ParamMap,
}

impl MoreLikeThisOptions {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        MoreLikeThisOptions {
            registry,
            fields: BTreeSet::new(),
            query_fields: Vec::new(),
            values: ParamMap::new(),
        }
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Parameters without the `mlt` switch, as a dedicated more-like-this
    /// handler expects them.
    pub fn handler_options(&self) -> ParamMap {
        let mut map = ParamMap::new();
        if !self.fields.is_empty() {
            let fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
            map.insert("mlt.fl".into(), ParamValue::Str(fields.join(",")));
        }
        if !self.query_fields.is_empty() {
            let boosts: Vec<String> = self
                .query_fields
                .iter()
                .map(|(field, weight)| format!("{}^{}", field, format_float(*weight)))
                .collect();
            map.insert("mlt.qf".into(), ParamValue::Str(boosts.join(" ")));
        }
        for (name, value) in &self.values {
            map.insert(format!("mlt.{}", name), value.clone());
        }
        map
    }
}

impl OptionFamily for MoreLikeThisOptions {
    const NAME: &'static str = "more-like-this";

    fn apply(&mut self, settings: Settings) -> Result<()> {
        for (name, value) in settings.iter() {
            if name == "fields" {
                self.fields.extend(field_list(self.registry.as_ref(), value)?);
                continue;
            }
            let kind = MLT_SETTINGS
                .get(name)
                .ok_or_else(|| unknown_setting(Self::NAME, name))?;
            let value = check(self.registry.as_ref(), name, *kind, value)?;
            self.values.insert(name.to_string(), value);
        }
        for (field, weight) in settings.query_fields() {
            if !self.fields.contains(field) {
                return Err(SolrqError::config(format!(
                    "query field '{}' is not one of the more-like-this fields",
                    field
                )));
            }
            let weight = to_float(field, weight)?;
            match self.query_fields.iter_mut().find(|(name, _)| name == field) {
                Some(entry) => entry.1 = weight,
                None => self.query_fields.push((field.to_string(), weight)),
            }
        }
        Ok(())
    }

    fn options(&self) -> ParamMap {
        let mut map = self.handler_options();
        if !map.is_empty() {
            map.insert("mlt".into(), ParamValue::Bool(true));
        }
        map
    }
}
