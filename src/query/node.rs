//! Boolean query expression tree.
//!
//! Nodes are immutable: every combinator returns a new tree and leaves its
//! operands untouched. Leaves hold their literal already encoded by the
//! codec, so type and range errors surface when a leaf is constructed.

use std::cmp::Ordering;
use std::fmt;

use crate::data::Value;
use crate::error::{Result, SolrqError};
use crate::query::codec::{self, Literal};
use crate::query::render;
use crate::schema::FieldRegistry;
use crate::schema::field::{FieldDescriptor, FieldType};

/// How bare textual values become leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermMode {
    /// Textual values become [`QueryNode::Term`] leaves.
    #[default]
    Term,
    /// Textual values become [`QueryNode::Phrase`] leaves. Non-textual
    /// values are always terms.
    Phrase,
}

/// One node of a boolean query expression.
///
/// Equality compares boost factors bit for bit, so every node equals itself.
#[derive(Debug, Clone)]
pub enum QueryNode {
    /// Identity element, absorbed by `And` and `Or`.
    Empty,
    /// A single indexed term. `field == None` targets the default search field.
    Term { field: Option<String>, text: String },
    /// A phrase. Whitespace inside is escaped rather than quoted.
    Phrase { field: Option<String>, text: String },
    /// A bounded or half-open range. A missing bound renders as `*`.
    Range {
        field: String,
        lower: Option<String>,
        upper: Option<String>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    },
    /// An unescaped literal fragment.
    Raw { field: Option<String>, literal: String },
    And(Vec<QueryNode>),
    Or(Vec<QueryNode>),
    Not(Box<QueryNode>),
    Boost(Box<QueryNode>, f64),
}

impl QueryNode {
    /// Build a term leaf. A list value builds one term per element, ANDed.
    pub fn term(
        registry: &dyn FieldRegistry,
        field: Option<&str>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        Self::leaf(registry, field, value.into(), TermMode::Term)
    }

    /// Build a phrase leaf. A list value builds one phrase per element, ANDed.
    pub fn phrase(
        registry: &dyn FieldRegistry,
        field: Option<&str>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        Self::leaf(registry, field, value.into(), TermMode::Phrase)
    }

    /// Build a leaf in the given mode.
    pub fn leaf(
        registry: &dyn FieldRegistry,
        field: Option<&str>,
        value: Value,
        mode: TermMode,
    ) -> Result<Self> {
        let descriptor = resolve(registry, field)?;
        if let Value::List(values) = value {
            let mut leaves = Vec::with_capacity(values.len());
            for value in values {
                leaves.push(Self::single_leaf(descriptor, field, &value, mode)?);
            }
            return Ok(QueryNode::all(leaves));
        }
        Self::single_leaf(descriptor, field, &value, mode)
    }

    fn single_leaf(
        descriptor: Option<&FieldDescriptor>,
        field: Option<&str>,
        value: &Value,
        mode: TermMode,
    ) -> Result<Self> {
        if matches!(value, Value::List(_)) {
            return Err(SolrqError::type_error("nested lists are not supported"));
        }
        let literal = codec::coerce(descriptor, value)?;
        let field = field.map(str::to_string);
        let text = literal.to_term();
        if mode == TermMode::Phrase && literal.is_textual() {
            Ok(QueryNode::Phrase { field, text })
        } else {
            Ok(QueryNode::Term { field, text })
        }
    }

    /// Build a range leaf.
    ///
    /// `None` (or a null value) leaves that side open. Reversed bounds are
    /// swapped together with their inclusivity flags.
    pub fn range(
        registry: &dyn FieldRegistry,
        field: &str,
        lower: Option<Value>,
        upper: Option<Value>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Result<Self> {
        let descriptor = registry.lookup(field)?;
        if descriptor.field_type == FieldType::Boolean {
            return Err(SolrqError::type_error(format!(
                "boolean field '{}' does not support ranges",
                field
            )));
        }
        let bound = |value: Option<Value>| -> Result<Option<Literal>> {
            match value {
                None | Some(Value::Null) => Ok(None),
                Some(value) => codec::coerce(Some(descriptor), &value).map(Some),
            }
        };
        let mut lower = (bound(lower)?, lower_inclusive);
        let mut upper = (bound(upper)?, upper_inclusive);
        if let (Some(lo), Some(hi)) = (&lower.0, &upper.0)
            && lo.compare(hi) == Some(Ordering::Greater)
        {
            std::mem::swap(&mut lower, &mut upper);
        }
        Ok(QueryNode::Range {
            field: field.to_string(),
            lower: lower.0.map(|l| l.to_range_bound()),
            upper: upper.0.map(|l| l.to_range_bound()),
            lower_inclusive: lower.1,
            upper_inclusive: upper.1,
        })
    }

    /// Build an unescaped literal leaf. A named field must exist.
    pub fn raw(
        registry: &dyn FieldRegistry,
        field: Option<&str>,
        literal: impl Into<String>,
    ) -> Result<Self> {
        if let Some(name) = field {
            registry.lookup(name)?;
        }
        Ok(QueryNode::Raw {
            field: field.map(str::to_string),
            literal: literal.into(),
        })
    }

    /// Conjunction of all nodes, flattened.
    pub fn all(nodes: impl IntoIterator<Item = QueryNode>) -> Self {
        combine(Junction::And, nodes)
    }

    /// Disjunction of all nodes, flattened.
    pub fn any(nodes: impl IntoIterator<Item = QueryNode>) -> Self {
        combine(Junction::Or, nodes)
    }

    /// `self AND other`.
    pub fn and_with(&self, other: &QueryNode) -> Self {
        QueryNode::all([self.clone(), other.clone()])
    }

    /// `self OR other`.
    pub fn or_with(&self, other: &QueryNode) -> Self {
        QueryNode::any([self.clone(), other.clone()])
    }

    /// `NOT self`. Double negation cancels when the tree is normalized.
    pub fn negate(&self) -> Self {
        match self {
            QueryNode::Empty => QueryNode::Empty,
            other => QueryNode::Not(Box::new(other.clone())),
        }
    }

    /// `self^factor`. The factor must be finite.
    pub fn boosted_by(&self, factor: f64) -> Result<Self> {
        check_factor(factor)?;
        Ok(match self {
            QueryNode::Empty => QueryNode::Empty,
            other => QueryNode::Boost(Box::new(other.clone()), factor),
        })
    }

    /// Reject trees holding a non-finite boost factor, such as ones built
    /// directly from the `Boost` variant.
    pub fn validate(&self) -> Result<()> {
        match self {
            QueryNode::And(children) | QueryNode::Or(children) => {
                children.iter().try_for_each(QueryNode::validate)
            }
            QueryNode::Not(child) => child.validate(),
            QueryNode::Boost(child, factor) => {
                check_factor(*factor)?;
                child.validate()
            }
            _ => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryNode::Empty)
    }

    /// Whether this node is a leaf (term, phrase, range or raw literal).
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            QueryNode::Term { .. }
                | QueryNode::Phrase { .. }
                | QueryNode::Range { .. }
                | QueryNode::Raw { .. }
        )
    }

    /// Canonical form: nested junctions flattened, `Empty` absorbed,
    /// single-child junctions collapsed and double negations cancelled,
    /// applied bottom-up until nothing changes.
    pub fn normalize(&self) -> Self {
        let mut current = self.simplify();
        loop {
            let next = current.simplify();
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn simplify(&self) -> Self {
        match self {
            QueryNode::And(children) => {
                combine(Junction::And, children.iter().map(QueryNode::simplify))
            }
            QueryNode::Or(children) => {
                combine(Junction::Or, children.iter().map(QueryNode::simplify))
            }
            QueryNode::Not(child) => match child.simplify() {
                QueryNode::Empty => QueryNode::Empty,
                QueryNode::Not(inner) => *inner,
                other => QueryNode::Not(Box::new(other)),
            },
            QueryNode::Boost(child, factor) => match child.simplify() {
                QueryNode::Empty => QueryNode::Empty,
                other => QueryNode::Boost(Box::new(other), *factor),
            },
            leaf => leaf.clone(),
        }
    }

    /// Normalize and render in the backend's query syntax.
    ///
    /// `Empty` renders as the empty string.
    pub fn render(&self) -> String {
        render::render(&self.normalize())
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl PartialEq for QueryNode {
    fn eq(&self, other: &Self) -> bool {
        use QueryNode::*;
        match (self, other) {
            (Empty, Empty) => true,
            (Term { field: f1, text: t1 }, Term { field: f2, text: t2 })
            | (Phrase { field: f1, text: t1 }, Phrase { field: f2, text: t2 }) => {
                f1 == f2 && t1 == t2
            }
            (
                Range {
                    field: f1,
                    lower: l1,
                    upper: u1,
                    lower_inclusive: li1,
                    upper_inclusive: ui1,
                },
                Range {
                    field: f2,
                    lower: l2,
                    upper: u2,
                    lower_inclusive: li2,
                    upper_inclusive: ui2,
                },
            ) => f1 == f2 && l1 == l2 && u1 == u2 && li1 == li2 && ui1 == ui2,
            (Raw { field: f1, literal: l1 }, Raw { field: f2, literal: l2 }) => {
                f1 == f2 && l1 == l2
            }
            (And(a), And(b)) | (Or(a), Or(b)) => a == b,
            (Not(a), Not(b)) => a == b,
            (Boost(a, x), Boost(b, y)) => x.to_bits() == y.to_bits() && a == b,
            _ => false,
        }
    }
}

fn check_factor(factor: f64) -> Result<()> {
    if !factor.is_finite() {
        return Err(SolrqError::invalid_argument(format!(
            "boost factor must be finite, got {}",
            factor
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    And,
    Or,
}

/// Splice same-kind children, drop `Empty` and duplicate leaves, collapse
/// zero or one remaining children.
fn combine(junction: Junction, nodes: impl IntoIterator<Item = QueryNode>) -> QueryNode {
    fn push(flat: &mut Vec<QueryNode>, node: QueryNode) {
        if node.is_leaf() && flat.contains(&node) {
            return;
        }
        flat.push(node);
    }

    let mut flat: Vec<QueryNode> = Vec::new();
    for node in nodes {
        match (junction, node) {
            (_, QueryNode::Empty) => {}
            (Junction::And, QueryNode::And(children)) | (Junction::Or, QueryNode::Or(children)) => {
                for child in children {
                    if !child.is_empty() {
                        push(&mut flat, child);
                    }
                }
            }
            (_, other) => push(&mut flat, other),
        }
    }
    match flat.len() {
        0 => QueryNode::Empty,
        1 => flat.pop().unwrap_or(QueryNode::Empty),
        _ => match junction {
            Junction::And => QueryNode::And(flat),
            Junction::Or => QueryNode::Or(flat),
        },
    }
}

fn resolve<'a>(
    registry: &'a dyn FieldRegistry,
    field: Option<&str>,
) -> Result<Option<&'a FieldDescriptor>> {
    match field {
        Some(name) => registry.lookup(name).map(Some),
        None => Ok(registry.default_field()),
    }
}
