//! Faceting.
//!
//! `fields` selects the facet fields. Other settings given in the same
//! update as `fields` are duplicated as `f.<field>.facet.<name>` overrides
//! for each of those fields; without `fields` they are global
//! `facet.<name>` defaults.

use std::sync::Arc;

use ahash::AHashMap;
use lazy_static::lazy_static;

use crate::error::Result;
use crate::options::{
    FieldScoped, Kind, OptionFamily, Settings, check, field_list, unknown_setting,
};
use crate::params::{ParamMap, ParamValue};
use crate::schema::FieldRegistry;

lazy_static! {
    static ref FACET_SETTINGS: AHashMap<&'static str, Kind> = {
        let mut m = AHashMap::new();
        m.insert("prefix", Kind::Str);
        m.insert("sort", Kind::Choice(&["true", "false", "count", "index"]));
        m.insert("limit", Kind::Int);
        m.insert("offset", Kind::NonNegative);
        m.insert("mincount", Kind::NonNegative);
        m.insert("missing", Kind::Bool);
        m.insert("method", Kind::Choice(&["enum", "fc", "fcs"]));
        m
    };
}

#[derive(Debug, Clone)]
pub struct FacetOptions {
    registry: Arc<dyn FieldRegistry>,
    scoped: FieldScoped,
    queries: Vec<String>,
}

impl FacetOptions {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        FacetOptions {
            registry,
            scoped: FieldScoped::default(),
            queries: Vec::new(),
        }
    }

    /// Add a rendered query whose match count is reported as a facet.
    pub fn add_query(&mut self, query: impl Into<String>) {
        self.queries.push(query.into());
    }
}

impl OptionFamily for FacetOptions {
    const NAME: &'static str = "facet";

    fn apply(&mut self, settings: Settings) -> Result<()> {
        settings.reject_query_fields(Self::NAME)?;
        let mut fields = Vec::new();
        let mut values = Vec::new();
        for (name, value) in settings.iter() {
            if name == "fields" {
                fields.extend(field_list(self.registry.as_ref(), value)?);
                continue;
            }
            let kind = FACET_SETTINGS
                .get(name)
                .ok_or_else(|| unknown_setting(Self::NAME, name))?;
            values.push((name.to_string(), check(self.registry.as_ref(), name, *kind, value)?));
        }
        self.scoped.apply(&fields, values);
        Ok(())
    }

    fn options(&self) -> ParamMap {
        let mut map = ParamMap::new();
        if self.scoped.is_empty() && self.queries.is_empty() {
            return map;
        }
        map.insert("facet".into(), ParamValue::Bool(true));
        let fields = self.scoped.field_names();
        if !fields.is_empty() {
            map.insert("facet.field".into(), ParamValue::List(fields));
        }
        if !self.queries.is_empty() {
            map.insert("facet.query".into(), ParamValue::List(self.queries.clone()));
        }
        self.scoped.emit("facet", &mut map);
        map
    }
}
