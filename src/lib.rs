//! # solrq
//!
//! A typed query-construction layer for schema-described full-text search
//! backends.
//!
//! ## Features
//!
//! - Values coerced and escaped against declared field types
//! - Immutable boolean query trees with flattening and negation rewriting
//! - Validated option families (facet, highlight, more-like-this, sort,
//!   grouping, pagination, field limiting)
//! - Deterministic, sorted request parameter encoding
//!
//! Nothing here performs I/O. [`Search::params`] produces the parameter
//! list a transport sends.

pub mod data;
pub mod error;
pub mod options;
pub mod params;
pub mod query;
pub mod schema;
pub mod search;
mod util;

// Re-exports for the public API
pub use data::{RawString, Value, WildcardString};
pub use error::{Result, SolrqError};
pub use options::{OptionFamily, Settings};
pub use params::{ParamMap, ParamValue, Params};
pub use query::{Criteria, Lookup, QueryNode, TermMode};
pub use schema::field::{FieldDescriptor, FieldType};
pub use schema::{FieldRegistry, Schema, SchemaBuilder};
pub use search::Search;
pub use search::mlt::{MltSearch, MltSource};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
