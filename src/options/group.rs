//! Result grouping.

use std::sync::Arc;

use crate::error::{Result, SolrqError};
use crate::options::{
    Kind, OptionFamily, Settings, check, lookup_field, sort_clause, to_str, unknown_setting,
};
use crate::params::{ParamMap, ParamValue};
use crate::schema::FieldRegistry;

/// Groups results by a single-valued field. Nothing is emitted until a
/// `field` is set.
#[derive(Debug, Clone)]
pub struct GroupOptions {
    registry: Arc<dyn FieldRegistry>,
    field: Option<String>,
    limit: Option<ParamValue>,
    offset: Option<ParamValue>,
    sort: Option<String>,
}

impl GroupOptions {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        GroupOptions {
            registry,
            field: None,
            limit: None,
            offset: None,
            sort: None,
        }
    }
}

impl OptionFamily for GroupOptions {
    const NAME: &'static str = "group";

    fn apply(&mut self, settings: Settings) -> Result<()> {
        settings.reject_query_fields(Self::NAME)?;
        let registry = self.registry.as_ref();
        for (name, value) in settings.iter() {
            match name {
                "field" => {
                    let field = to_str(name, value)?;
                    if !lookup_field(registry, field)?.is_sortable() {
                        return Err(SolrqError::config(format!(
                            "cannot group on field '{}': it is multi-valued or not indexed",
                            field
                        )));
                    }
                    self.field = Some(field.to_string());
                }
                "limit" => self.limit = Some(check(registry, name, Kind::Int, value)?),
                "offset" => self.offset = Some(check(registry, name, Kind::NonNegative, value)?),
                "sort" => self.sort = Some(sort_clause(registry, to_str(name, value)?)?),
                other => return Err(unknown_setting(Self::NAME, other)),
            }
        }
        Ok(())
    }

    fn options(&self) -> ParamMap {
        let mut map = ParamMap::new();
        let Some(field) = &self.field else {
            return map;
        };
        map.insert("group".into(), ParamValue::Bool(true));
        map.insert("group.field".into(), ParamValue::Str(field.clone()));
        if let Some(limit) = &self.limit {
            map.insert("group.limit".into(), limit.clone());
        }
        if let Some(offset) = &self.offset {
            map.insert("group.offset".into(), offset.clone());
        }
        if let Some(sort) = &self.sort {
            map.insert("group.sort".into(), ParamValue::Str(sort.clone()));
        }
        map
    }
}
