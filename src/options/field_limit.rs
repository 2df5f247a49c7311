//! Returned field list (`fl`).

use std::sync::Arc;

use crate::data::Value;
use crate::error::Result;
use crate::options::{Kind, OptionFamily, Settings, check, field_list, unknown_setting};
use crate::params::{ParamMap, ParamValue};
use crate::schema::FieldRegistry;

#[derive(Debug, Clone)]
pub struct FieldLimitOptions {
    registry: Arc<dyn FieldRegistry>,
    fields: Vec<String>,
    all_fields: bool,
    score: bool,
}

impl FieldLimitOptions {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        FieldLimitOptions {
            registry,
            fields: Vec::new(),
            all_fields: false,
            score: false,
        }
    }

    fn flag(&self, name: &str, value: &Value) -> Result<bool> {
        Ok(check(self.registry.as_ref(), name, Kind::Bool, value)? == ParamValue::Bool(true))
    }
}

impl OptionFamily for FieldLimitOptions {
    const NAME: &'static str = "field limit";

    fn apply(&mut self, settings: Settings) -> Result<()> {
        settings.reject_query_fields(Self::NAME)?;
        for (name, value) in settings.iter() {
            match name {
                "fields" => {
                    for field in field_list(self.registry.as_ref(), value)? {
                        if !self.fields.contains(&field) {
                            self.fields.push(field);
                        }
                    }
                }
                "all_fields" => self.all_fields = self.flag(name, value)?,
                "score" => self.score = self.flag(name, value)?,
                other => return Err(unknown_setting(Self::NAME, other)),
            }
        }
        Ok(())
    }

    /// `*` stands in for the field list when all fields are requested.
    fn options(&self) -> ParamMap {
        let mut names: Vec<&str> = if self.all_fields {
            vec!["*"]
        } else {
            self.fields.iter().map(String::as_str).collect()
        };
        if self.score {
            names.push("score");
        }
        let mut map = ParamMap::new();
        if !names.is_empty() {
            map.insert("fl".into(), ParamValue::Str(names.join(",")));
        }
        map
    }
}
