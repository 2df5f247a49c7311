//! Builder-side description of query clauses.
//!
//! A [`Criteria`] collects bare values, per-field comparisons, raw fragments
//! and ready-made sub-expressions. Building it against a registry yields the
//! conjunction of all of them.
//!
//! ```
//! use solrq::query::criteria::{Criteria, Lookup};
//!
//! let criteria = Criteria::new()
//!     .value("hello")
//!     .field("int_field", 3)
//!     .lookup("int_field", Lookup::Gt(10.into()));
//! assert!(!criteria.is_empty());
//! ```

use crate::data::Value;
use crate::error::Result;
use crate::query::node::{QueryNode, TermMode};
use crate::schema::FieldRegistry;

/// Comparison applied to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Field equals the value. A list value matches every element.
    Eq(Value),
    /// `{* TO v}`
    Lt(Value),
    /// `{v TO *}`
    Gt(Value),
    /// `[* TO v]`
    Lte(Value),
    /// `[v TO *]`
    Gte(Value),
    /// `[lo TO hi]`
    Range(Value, Value),
    /// `{lo TO hi}`
    RangeExclusive(Value, Value),
    /// `[* TO *]`: the field has any value.
    Any,
}

impl Lookup {
    fn build(
        &self,
        registry: &dyn FieldRegistry,
        field: &str,
        mode: TermMode,
    ) -> Result<QueryNode> {
        let range = |lo: Option<&Value>, hi: Option<&Value>, inclusive: bool| {
            QueryNode::range(registry, field, lo.cloned(), hi.cloned(), inclusive, inclusive)
        };
        match self {
            Lookup::Eq(value) => QueryNode::leaf(registry, Some(field), value.clone(), mode),
            Lookup::Lt(value) => range(None, Some(value), false),
            Lookup::Gt(value) => range(Some(value), None, false),
            Lookup::Lte(value) => range(None, Some(value), true),
            Lookup::Gte(value) => range(Some(value), None, true),
            Lookup::Range(lo, hi) => range(Some(lo), Some(hi), true),
            Lookup::RangeExclusive(lo, hi) => range(Some(lo), Some(hi), false),
            Lookup::Any => range(None, None, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Value(Value),
    Field(String, Lookup),
    Raw(Option<String>, String),
    Node(QueryNode),
}

/// An ordered set of clauses, ANDed together when built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    clauses: Vec<Clause>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a value against the default search field.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Value(value.into()));
        self
    }

    /// Match a value against a field.
    pub fn field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.lookup(name, Lookup::Eq(value.into()))
    }

    /// Apply a comparison to a field.
    pub fn lookup(mut self, name: impl Into<String>, lookup: Lookup) -> Self {
        self.clauses.push(Clause::Field(name.into(), lookup));
        self
    }

    pub fn lt(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.lookup(name, Lookup::Lt(value.into()))
    }

    pub fn gt(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.lookup(name, Lookup::Gt(value.into()))
    }

    pub fn lte(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.lookup(name, Lookup::Lte(value.into()))
    }

    pub fn gte(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.lookup(name, Lookup::Gte(value.into()))
    }

    pub fn range(
        self,
        name: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Self {
        self.lookup(name, Lookup::Range(lower.into(), upper.into()))
    }

    pub fn range_exclusive(
        self,
        name: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Self {
        self.lookup(name, Lookup::RangeExclusive(lower.into(), upper.into()))
    }

    pub fn any(self, name: impl Into<String>) -> Self {
        self.lookup(name, Lookup::Any)
    }

    /// Add an unescaped query fragment.
    pub fn raw(mut self, literal: impl Into<String>) -> Self {
        self.clauses.push(Clause::Raw(None, literal.into()));
        self
    }

    /// Add an unescaped query fragment qualified by a field.
    pub fn raw_field(mut self, name: impl Into<String>, literal: impl Into<String>) -> Self {
        self.clauses.push(Clause::Raw(Some(name.into()), literal.into()));
        self
    }

    /// Add a prebuilt sub-expression.
    pub fn node(mut self, node: QueryNode) -> Self {
        self.clauses.push(Clause::Node(node));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Build the conjunction of all clauses.
    ///
    /// Fails on the first clause naming an unknown field or holding a value
    /// the field's type rejects.
    pub fn build(&self, registry: &dyn FieldRegistry, mode: TermMode) -> Result<QueryNode> {
        let mut nodes = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            let node = match clause {
                Clause::Value(value) => QueryNode::leaf(registry, None, value.clone(), mode)?,
                Clause::Field(name, lookup) => lookup.build(registry, name, mode)?,
                Clause::Raw(name, literal) => {
                    QueryNode::raw(registry, name.as_deref(), literal.clone())?
                }
                Clause::Node(node) => {
                    node.validate()?;
                    node.clone()
                }
            };
            nodes.push(node);
        }
        Ok(QueryNode::all(nodes))
    }
}

impl From<QueryNode> for Criteria {
    fn from(node: QueryNode) -> Self {
        Criteria::new().node(node)
    }
}

impl From<&QueryNode> for Criteria {
    fn from(node: &QueryNode) -> Self {
        Criteria::new().node(node.clone())
    }
}

impl From<&str> for Criteria {
    fn from(value: &str) -> Self {
        Criteria::new().value(value)
    }
}

impl From<String> for Criteria {
    fn from(value: String) -> Self {
        Criteria::new().value(value)
    }
}
