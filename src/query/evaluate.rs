//! Filter Evaluation - Pure Predicate over Annotation Records
//!
//! Walks a parsed query tree against one annotation record. Tag and
//! collection membership live in external stores, so lookups are supplied
//! by the caller; the evaluator itself keeps no state between calls and
//! has no side effects.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::parser::{BoolOp, QueryNode};
use super::token::FilterKind;

// =============================================================================
// Types
// =============================================================================

/// The record a query is evaluated against: the annotation's display text
/// plus an optional secondary label (e.g. the source file name without
/// extension), both supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryTarget {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_label: Option<String>,
}

/// Membership lookup supplied by the surrounding system
pub type MembershipFn<'a> = &'a dyn Fn(&QueryTarget) -> HashSet<String>;

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluate a query tree against one annotation record.
///
/// A `None` tree matches everything.
pub fn evaluate(
    ast: Option<&QueryNode>,
    target: &QueryTarget,
    tags_of: MembershipFn<'_>,
    collections_of: MembershipFn<'_>,
) -> bool {
    match ast {
        None => true,
        Some(node) => evaluate_node(node, target, tags_of, collections_of),
    }
}

fn evaluate_node(
    node: &QueryNode,
    target: &QueryTarget,
    tags_of: MembershipFn,
    collections_of: MembershipFn,
) -> bool {
    match node {
        QueryNode::Filter {
            kind,
            value,
            exclude,
        } => {
            let member = match kind {
                FilterKind::Tag => tags_of(target).contains(value),
                FilterKind::Collection => collections_of(target).contains(value),
            };
            if *exclude {
                !member
            } else {
                member
            }
        }
        QueryNode::Text { value } => text_matches(target, value),
        QueryNode::Op { op, left, right } => {
            let l = evaluate_node(left, target, tags_of, collections_of);
            match op {
                BoolOp::And => l && evaluate_node(right, target, tags_of, collections_of),
                BoolOp::Or => l || evaluate_node(right, target, tags_of, collections_of),
            }
        }
    }
}

/// Case-insensitive substring match against the display text or the
/// secondary label
fn text_matches(target: &QueryTarget, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if target.text.to_lowercase().contains(&needle) {
        return true;
    }
    target
        .secondary_label
        .as_deref()
        .map_or(false, |label| label.to_lowercase().contains(&needle))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::parse_query;

    fn target(text: &str) -> QueryTarget {
        QueryTarget {
            id: "a1".to_string(),
            text: text.to_string(),
            secondary_label: Some("daily-notes".to_string()),
        }
    }

    fn sets(tags: &[&str], collections: &[&str]) -> (HashSet<String>, HashSet<String>) {
        (
            tags.iter().map(|s| s.to_string()).collect(),
            collections.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn eval(query: &str, target: &QueryTarget, tags: &[&str], collections: &[&str]) -> bool {
        let ast = parse_query(query);
        let (tag_set, coll_set) = sets(tags, collections);
        evaluate(
            ast.as_ref(),
            target,
            &|_: &QueryTarget| tag_set.clone(),
            &|_: &QueryTarget| coll_set.clone(),
        )
    }

    #[test]
    fn test_none_tree_matches_everything() {
        assert!(eval("", &target("anything"), &[], &[]));
    }

    #[test]
    fn test_tag_filter() {
        let t = target("note");
        assert!(eval("#a", &t, &["a"], &[]));
        assert!(!eval("#a", &t, &["b"], &[]));
    }

    #[test]
    fn test_exclusion_filter() {
        let t = target("note");
        assert!(!eval("-#a", &t, &["a"], &[]));
        assert!(eval("-#a", &t, &["b"], &[]));
    }

    #[test]
    fn test_collection_filter() {
        let t = target("note");
        assert!(eval("@inbox", &t, &[], &["inbox"]));
        assert!(!eval("@inbox", &t, &[], &[]));
    }

    #[test]
    fn test_text_matches_display_text() {
        let t = target("An Important Finding");
        assert!(eval("important", &t, &[], &[]));
        assert!(!eval("absent", &t, &[], &[]));
    }

    #[test]
    fn test_text_matches_secondary_label() {
        // secondary_label is "daily-notes"
        let t = target("unrelated");
        assert!(eval("daily", &t, &[], &[]));
    }

    #[test]
    fn test_implicit_and_matches_like_explicit() {
        let t = target("note");
        for query in ["#a #b", "#a AND #b"] {
            assert!(eval(query, &t, &["a", "b"], &[]), "query: {}", query);
            assert!(!eval(query, &t, &["a"], &[]), "query: {}", query);
        }
    }

    #[test]
    fn test_boolean_algebra_all_combinations() {
        // (#a OR #b) AND @c over all 8 combinations of {has a, has b, has c}
        let t = target("note");
        for has_a in [false, true] {
            for has_b in [false, true] {
                for has_c in [false, true] {
                    let mut tags: Vec<&str> = Vec::new();
                    if has_a {
                        tags.push("a");
                    }
                    if has_b {
                        tags.push("b");
                    }
                    let collections: Vec<&str> = if has_c { vec!["c"] } else { vec![] };

                    let expected = (has_a || has_b) && has_c;
                    assert_eq!(
                        eval("(#a OR #b) AND @c", &t, &tags, &collections),
                        expected,
                        "a={} b={} c={}",
                        has_a,
                        has_b,
                        has_c
                    );
                }
            }
        }
    }

    #[test]
    fn test_unparseable_query_matches_everything() {
        let t = target("note");
        assert!(eval("((((#a", &t, &[], &[]));
    }
}
