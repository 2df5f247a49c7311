//! Field type registry.
//!
//! The schema declares which fields exist, their types and cardinality, and
//! which field unqualified terms search. Every builder and option family
//! receives the registry explicitly as an `Arc<dyn FieldRegistry>`.

pub mod field;

use std::fmt::Debug;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolrqError};
use field::{FieldDescriptor, FieldType};

/// Lookup capability the query layer needs from a schema.
pub trait FieldRegistry: Send + Sync + Debug {
    /// Look up a field by name.
    fn lookup(&self, name: &str) -> Result<&FieldDescriptor>;

    /// The field unqualified terms are matched against, if declared.
    fn default_field(&self) -> Option<&FieldDescriptor>;
}

/// A search schema: the set of declared fields.
///
/// Serializes as a flat document:
///
/// ```json
/// {
///   "fields": [{"name": "title", "type": "text"}],
///   "default_field": "title",
///   "unique_key": null
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaDocument", into = "SchemaDocument")]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    positions: AHashMap<String, usize>,
    default_field: Option<String>,
    unique_key: Option<String>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Decode a schema from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn unique_key(&self) -> Option<&str> {
        self.unique_key.as_deref()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    fn from_parts(
        fields: Vec<FieldDescriptor>,
        default_field: Option<String>,
        unique_key: Option<String>,
    ) -> Result<Self> {
        let mut positions = AHashMap::with_capacity(fields.len());
        let mut unique = Vec::with_capacity(fields.len());
        for field in fields {
            // Later declarations of the same name replace earlier ones.
            match positions.get(&field.name) {
                Some(&pos) => unique[pos] = field,
                None => {
                    positions.insert(field.name.clone(), unique.len());
                    unique.push(field);
                }
            }
        }

        for name in default_field.iter().chain(unique_key.iter()) {
            if !positions.contains_key(name) {
                return Err(SolrqError::unknown_field(name.clone()));
            }
        }

        Ok(Schema {
            fields: unique,
            positions,
            default_field,
            unique_key,
        })
    }
}

impl FieldRegistry for Schema {
    fn lookup(&self, name: &str) -> Result<&FieldDescriptor> {
        self.positions
            .get(name)
            .map(|&pos| &self.fields[pos])
            .ok_or_else(|| SolrqError::unknown_field(name))
    }

    fn default_field(&self) -> Option<&FieldDescriptor> {
        self.default_field
            .as_deref()
            .and_then(|name| self.positions.get(name))
            .map(|&pos| &self.fields[pos])
    }
}

/// Wire form of [`Schema`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaDocument {
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    default_field: Option<String>,
    #[serde(default)]
    unique_key: Option<String>,
}

impl TryFrom<SchemaDocument> for Schema {
    type Error = SolrqError;

    fn try_from(doc: SchemaDocument) -> Result<Self> {
        Schema::from_parts(doc.fields, doc.default_field, doc.unique_key)
    }
}

impl From<Schema> for SchemaDocument {
    fn from(schema: Schema) -> Self {
        SchemaDocument {
            fields: schema.fields,
            default_field: schema.default_field,
            unique_key: schema.unique_key,
        }
    }
}

#[derive(Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDescriptor>,
    default_field: Option<String>,
    unique_key: Option<String>,
}

impl SchemaBuilder {
    pub fn add_field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Add an indexed, stored, single-valued field.
    pub fn add_typed_field(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.add_field(FieldDescriptor::new(name, field_type))
    }

    pub fn default_field(mut self, name: impl Into<String>) -> Self {
        self.default_field = Some(name.into());
        self
    }

    pub fn unique_key(mut self, name: impl Into<String>) -> Self {
        self.unique_key = Some(name.into());
        self
    }

    /// Build the schema, failing if the default field or unique key is not declared.
    pub fn build(self) -> Result<Schema> {
        Schema::from_parts(self.fields, self.default_field, self.unique_key)
    }
}
