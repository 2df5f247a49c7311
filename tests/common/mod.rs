#![allow(dead_code)]

use std::sync::Arc;

use solrq::{FieldRegistry, Schema, Search};

/// Field set shared by the integration tests. The sortable numeric types
/// (`sint`, `slong`, ...) decode to their plain counterparts.
pub const SCHEMA_JSON: &str = r#"{
    "fields": [
        {"name": "string_field", "type": "string", "multi_valued": true},
        {"name": "text_field", "type": "text"},
        {"name": "boolean_field", "type": "boolean"},
        {"name": "int_field", "type": "int"},
        {"name": "sint_field", "type": "sint"},
        {"name": "long_field", "type": "long"},
        {"name": "slong_field", "type": "slong"},
        {"name": "float_field", "type": "float"},
        {"name": "sfloat_field", "type": "sfloat"},
        {"name": "double_field", "type": "double"},
        {"name": "sdouble_field", "type": "sdouble"},
        {"name": "date_field", "type": "date"}
    ],
    "default_field": "text_field",
    "unique_key": "int_field"
}"#;

pub fn registry() -> Arc<dyn FieldRegistry> {
    Arc::new(Schema::from_json(SCHEMA_JSON).expect("fixture schema is valid"))
}

pub fn search() -> Search {
    Search::new(registry())
}

pub fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
