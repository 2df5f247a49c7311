//! `start` / `rows` pagination.

use std::sync::Arc;

use crate::data::Value;
use crate::error::Result;
use crate::options::{Kind, OptionFamily, Settings, check, unknown_setting};
use crate::params::{ParamMap, ParamValue};
use crate::schema::FieldRegistry;

#[derive(Debug, Clone)]
pub struct PaginateOptions {
    registry: Arc<dyn FieldRegistry>,
    start: Option<i64>,
    rows: Option<i64>,
}

impl PaginateOptions {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        PaginateOptions {
            registry,
            start: None,
            rows: None,
        }
    }

    fn bound(&self, name: &str, value: &Value) -> Result<Option<i64>> {
        if value.is_null() {
            return Ok(None);
        }
        match check(self.registry.as_ref(), name, Kind::NonNegative, value)? {
            ParamValue::Int(i) => Ok(Some(i)),
            _ => Ok(None),
        }
    }
}

impl OptionFamily for PaginateOptions {
    const NAME: &'static str = "paginate";

    /// A null value clears the setting.
    fn apply(&mut self, settings: Settings) -> Result<()> {
        settings.reject_query_fields(Self::NAME)?;
        for (name, value) in settings.iter() {
            match name {
                "start" => self.start = self.bound(name, value)?,
                "rows" => self.rows = self.bound(name, value)?,
                other => return Err(unknown_setting(Self::NAME, other)),
            }
        }
        Ok(())
    }

    fn options(&self) -> ParamMap {
        let mut map = ParamMap::new();
        if let Some(start) = self.start {
            map.insert("start".into(), ParamValue::Int(start));
        }
        if let Some(rows) = self.rows {
            map.insert("rows".into(), ParamValue::Int(rows));
        }
        map
    }
}
