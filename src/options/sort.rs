//! Result ordering.

use std::sync::Arc;

use crate::error::Result;
use crate::options::{OptionFamily, Settings, sort_clause, to_str, unknown_setting};
use crate::params::{ParamMap, ParamValue};
use crate::schema::FieldRegistry;

/// Sort clauses, in the order they were added.
///
/// Each `field` setting appends one clause; a leading `-` sorts descending.
#[derive(Debug, Clone)]
pub struct SortOptions {
    registry: Arc<dyn FieldRegistry>,
    clauses: Vec<String>,
}

impl SortOptions {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        SortOptions {
            registry,
            clauses: Vec::new(),
        }
    }
}

impl OptionFamily for SortOptions {
    const NAME: &'static str = "sort";

    fn apply(&mut self, settings: Settings) -> Result<()> {
        settings.reject_query_fields(Self::NAME)?;
        for (name, value) in settings.iter() {
            match name {
                "field" => {
                    let clause = sort_clause(self.registry.as_ref(), to_str(name, value)?)?;
                    self.clauses.push(clause);
                }
                other => return Err(unknown_setting(Self::NAME, other)),
            }
        }
        Ok(())
    }

    fn options(&self) -> ParamMap {
        let mut map = ParamMap::new();
        if !self.clauses.is_empty() {
            map.insert("sort".into(), ParamValue::Str(self.clauses.join(", ")));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::testing::registry;

    fn sort(field: &str) -> Result<ParamMap> {
        let mut options = SortOptions::new(registry());
        options.update(Settings::new().set("field", field))?;
        Ok(options.options())
    }

    #[test]
    fn test_directions() {
        assert_eq!(
            sort("int_field").unwrap().get("sort"),
            Some(&ParamValue::from("int_field asc"))
        );
        assert_eq!(
            sort("-int_field").unwrap().get("sort"),
            Some(&ParamValue::from("int_field desc"))
        );
    }

    #[test]
    fn test_bad_fields() {
        assert!(sort("myarse").unwrap_err().is_config());
        assert!(sort("string_field").unwrap_err().is_config());
    }

    #[test]
    fn test_clauses_accumulate() {
        let mut options = SortOptions::new(registry());
        options.update(Settings::new().set("field", "int_field")).unwrap();
        options.update(Settings::new().set("field", "-date_field")).unwrap();
        assert_eq!(
            options.options().get("sort"),
            Some(&ParamValue::from("int_field asc, date_field desc"))
        );
    }

    #[test]
    fn test_empty_emits_nothing() {
        assert!(SortOptions::new(registry()).options().is_empty());
    }
}
