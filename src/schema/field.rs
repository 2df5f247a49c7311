//! Field descriptors for the search schema.
//!
//! This module defines:
//! - [`FieldType`] - The declared backend type of a field
//! - [`FieldDescriptor`] - Name, type and cardinality of one schema field
//!
//! # Type names
//!
//! Field types deserialize from the backend's type names. The sortable
//! numeric variants (`sint`, `slong`, `sfloat`, `sdouble`) share the codec of
//! their plain counterparts:
//!
//! ```
//! use solrq::schema::field::FieldType;
//!
//! let ty: FieldType = serde_json::from_str(r#""sint""#).unwrap();
//! assert_eq!(ty, FieldType::Int);
//! ```

use serde::{Deserialize, Serialize};

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Untokenized string.
    String,
    /// Tokenized full text.
    Text,
    /// Boolean.
    Boolean,
    /// 32-bit signed integer.
    #[serde(alias = "sint", alias = "integer")]
    Int,
    /// 64-bit signed integer.
    #[serde(alias = "slong")]
    Long,
    /// 32-bit IEEE float.
    #[serde(alias = "sfloat")]
    Float,
    /// 64-bit IEEE float.
    #[serde(alias = "sdouble")]
    Double,
    /// UTC timestamp.
    Date,
}

impl FieldType {
    /// Returns true for string and text fields.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Text)
    }

    /// Returns true for integral and floating fields.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Int | FieldType::Long | FieldType::Float | FieldType::Double
        )
    }

    /// Backend type name.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Date => "date",
        }
    }
}

/// Schema metadata for one named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within the schema.
    pub name: String,

    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field holds several values per document.
    #[serde(default)]
    pub multi_valued: bool,

    /// Whether the field is indexed.
    #[serde(default = "default_true")]
    pub indexed: bool,

    /// Whether the original value is stored.
    #[serde(default = "default_true")]
    pub stored: bool,
}

fn default_true() -> bool {
    true
}

impl FieldDescriptor {
    /// Create an indexed, stored, single-valued descriptor.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            multi_valued: false,
            indexed: true,
            stored: true,
        }
    }

    /// Mark the field as multi-valued.
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Set the indexed flag.
    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Set the stored flag.
    pub fn with_stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }

    /// Whether the backend can sort or group on this field.
    pub fn is_sortable(&self) -> bool {
        self.indexed && !self.multi_valued
    }
}
