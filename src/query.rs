//! Query expressions.
//!
//! Values are coerced and escaped by the [`codec`], combined into an
//! immutable [`node::QueryNode`] tree, and rendered by [`render`] once the
//! tree has been normalized. [`criteria::Criteria`] is the builder-facing
//! way to describe leaves.

pub mod codec;
pub mod criteria;
pub mod node;
pub mod render;

pub use criteria::{Criteria, Lookup};
pub use node::{QueryNode, TermMode};
pub use render::MATCH_ALL;
