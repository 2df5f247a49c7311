//! Rendering of normalized query trees into the backend's query syntax.
//!
//! Children of a conjunction are put in canonical order: term leaves sorted
//! by their rendered text, then phrase leaves sorted, then range leaves
//! sorted, then raw leaves and composite children in construction order.
//! Children of a disjunction keep construction order except that
//! field-qualified terms and phrases move ahead of everything else.
//!
//! A negation renders as `NOT x` at the top level and inside a conjunction.
//! Anywhere else a bare `NOT` is not a valid clause on its own, so it is
//! rewritten to `(*:* AND NOT x)`.

use crate::query::node::QueryNode;
use crate::util::number::format_float;

/// Literal matching every document.
pub const MATCH_ALL: &str = "*:*";

/// Position of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Top,
    And,
    Or,
    Not,
    Boost,
}

/// Render an already normalized tree.
pub fn render(node: &QueryNode) -> String {
    render_node(node, Parent::Top)
}

fn render_node(node: &QueryNode, parent: Parent) -> String {
    match node {
        QueryNode::Empty => String::new(),
        QueryNode::Term { field, text } | QueryNode::Phrase { field, text } => {
            qualify(field.as_deref(), text)
        }
        QueryNode::Raw { field, literal } => qualify(field.as_deref(), literal),
        QueryNode::Range {
            field,
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        } => format!(
            "{}:{}{} TO {}{}",
            field,
            if *lower_inclusive { '[' } else { '{' },
            lower.as_deref().unwrap_or("*"),
            upper.as_deref().unwrap_or("*"),
            if *upper_inclusive { ']' } else { '}' },
        ),
        QueryNode::And(children) => {
            let parts: Vec<String> = order_conjunction(children)
                .into_iter()
                .map(|child| match child {
                    QueryNode::Or(_) => parenthesize(&render_node(child, Parent::And)),
                    _ => render_node(child, Parent::And),
                })
                .collect();
            parts.join(" AND ")
        }
        QueryNode::Or(children) => {
            let parts: Vec<String> = order_disjunction(children)
                .into_iter()
                .map(|child| match child {
                    QueryNode::And(_) => parenthesize(&render_node(child, Parent::Or)),
                    _ => render_node(child, Parent::Or),
                })
                .collect();
            parts.join(" OR ")
        }
        QueryNode::Not(child) => {
            let inner = render_operand(child, Parent::Not);
            match parent {
                Parent::Top | Parent::And => format!("NOT {}", inner),
                _ => format!("({} AND NOT {})", MATCH_ALL, inner),
            }
        }
        QueryNode::Boost(child, factor) => {
            format!(
                "{}^{}",
                render_operand(child, Parent::Boost),
                format_float(*factor)
            )
        }
    }
}

/// Render the single operand of a `Not` or `Boost`, parenthesizing junctions.
fn render_operand(child: &QueryNode, parent: Parent) -> String {
    match child {
        QueryNode::And(_) | QueryNode::Or(_) => parenthesize(&render_node(child, parent)),
        _ => render_node(child, parent),
    }
}

fn qualify(field: Option<&str>, text: &str) -> String {
    match field {
        Some(name) => format!("{}:{}", name, text),
        None => text.to_string(),
    }
}

fn parenthesize(s: &str) -> String {
    format!("({})", s)
}

/// Sort tier of a conjunction child; sorted tiers order by rendered text.
fn conjunction_tier(node: &QueryNode) -> (u8, bool) {
    match node {
        QueryNode::Term { .. } => (0, true),
        QueryNode::Phrase { .. } => (1, true),
        QueryNode::Range { .. } => (2, true),
        QueryNode::Raw { .. } => (3, false),
        _ => (4, false),
    }
}

fn order_conjunction(children: &[QueryNode]) -> Vec<&QueryNode> {
    let mut keyed: Vec<(u8, Option<String>, &QueryNode)> = children
        .iter()
        .map(|child| {
            let (tier, sorted) = conjunction_tier(child);
            let key = sorted.then(|| render_node(child, Parent::And));
            (tier, key, child)
        })
        .collect();
    // Stable: unsorted tiers keep construction order (their key is None).
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, _, child)| child).collect()
}

fn order_disjunction(children: &[QueryNode]) -> Vec<&QueryNode> {
    let (qualified, rest): (Vec<&QueryNode>, Vec<&QueryNode>) =
        children.iter().partition(|child| {
            matches!(
                child,
                QueryNode::Term { field: Some(_), .. } | QueryNode::Phrase { field: Some(_), .. }
            )
        });
    qualified.into_iter().chain(rest).collect()
}
