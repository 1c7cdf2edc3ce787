//! Structural invariant checks.
//!
//! Non-throwing: every violation found is reported. Intended for tests, load
//! diagnostics and the CLI, not for the reducer hot path.

use crate::element::ROOT_DEPTH;
use crate::node::{HierarchicalNode, HierarchicalStructure};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate element id: {id}")]
    DuplicateId { id: String },

    #[error("Element {id} has depth {actual}, expected {expected}")]
    DepthMismatch { id: String, expected: u32, actual: u32 },

    #[error("Element {id} reports {actual} children, has {expected}")]
    ChildCountMismatch { id: String, expected: u32, actual: u32 },

    #[error("Child {id} of {parent_id} has order {actual}, expected {expected}")]
    OrderMismatch {
        id: String,
        parent_id: String,
        expected: u32,
        actual: u32,
    },
}

/// Check id uniqueness, depth consistency, child counts and sibling order
pub fn validate(structure: &HierarchicalStructure) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    check_node(&structure.root, ROOT_DEPTH, &mut seen, &mut errors);
    errors
}

fn check_node<'a>(
    node: &'a HierarchicalNode,
    expected_depth: u32,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let data = &node.data;

    if !seen.insert(data.id.as_str()) {
        errors.push(ValidationError::DuplicateId { id: data.id.clone() });
    }

    if data.depth != expected_depth {
        errors.push(ValidationError::DepthMismatch {
            id: data.id.clone(),
            expected: expected_depth,
            actual: data.depth,
        });
    }

    let actual_children = node.children.len() as u32;
    if data.child_count != actual_children {
        errors.push(ValidationError::ChildCountMismatch {
            id: data.id.clone(),
            expected: actual_children,
            actual: data.child_count,
        });
    }

    for (index, child) in node.children.iter().enumerate() {
        if child.data.order != index as u32 {
            errors.push(ValidationError::OrderMismatch {
                id: child.data.id.clone(),
                parent_id: data.id.clone(),
                expected: index as u32,
                actual: child.data.order,
            });
        }
        check_node(child, expected_depth + 1, seen, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn valid_doc() -> HierarchicalStructure {
        let root = HierarchicalNode::with_children(
            Element::new("1", vec!["root".into()]),
            vec![
                HierarchicalNode::new(Element::new("2", vec!["a".into()])),
                HierarchicalNode::new(Element::new("3", vec!["b".into()])),
            ],
        );
        let mut doc = HierarchicalStructure::new(root);
        doc.normalize();
        doc
    }

    #[test]
    fn test_valid_document_has_no_errors() {
        assert!(validate(&valid_doc()).is_empty());
    }

    #[test]
    fn test_detects_duplicate_ids() {
        let mut doc = valid_doc();
        doc.root.children[1].data.id = "2".to_string();

        let errors = validate(&doc);
        assert_eq!(errors, vec![ValidationError::DuplicateId { id: "2".into() }]);
    }

    #[test]
    fn test_detects_depth_and_count_mismatch() {
        let mut doc = valid_doc();
        doc.root.children[0].data.depth = 4;
        doc.root.data.child_count = 7;

        let errors = validate(&doc);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::ChildCountMismatch {
            id: "1".into(),
            expected: 2,
            actual: 7,
        }));
        assert!(errors.contains(&ValidationError::DepthMismatch {
            id: "2".into(),
            expected: 1,
            actual: 4,
        }));
    }

    #[test]
    fn test_detects_order_gap() {
        let mut doc = valid_doc();
        doc.root.children[1].data.order = 3;

        let errors = validate(&doc);
        assert!(matches!(errors[0], ValidationError::OrderMismatch { expected: 1, actual: 3, .. }));
    }
}
