//! # Host Collaborators
//!
//! Seams the [`Editor`](crate::Editor) calls out through: a layout engine
//! that turns the flat projection into positions, and a text clipboard that
//! outlives one editor instance.

use crate::action::GeometryUpdate;
use crate::config::LayoutConfig;
use mindmap_tree::{flat_to_hierarchical, Direction, FlatMap, HierarchicalNode};

/// Computes element positions after structural changes
pub trait LayoutAdjuster {
    fn adjust(&self, elements: &FlatMap, config: &LayoutConfig) -> Vec<GeometryUpdate>;
}

/// Text storage for clipboard captures
pub trait ClipboardStore {
    fn get(&self) -> Option<String>;
    fn set(&mut self, text: String);
}

/// Clipboard store held in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboardStore {
    text: Option<String>,
}

impl MemoryClipboardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardStore for MemoryClipboardStore {
    fn get(&self) -> Option<String> {
        self.text.clone()
    }

    fn set(&mut self, text: String) {
        self.text = Some(text);
    }
}

/// Horizontal tree layout around the canvas centre.
///
/// Right-side branches grow rightwards, `left` branches mirror them. Each
/// child block is vertically centred on its parent. Hidden elements take no
/// space and keep their last position.
#[derive(Debug, Clone)]
pub struct TidyLayout {
    pub column_gap: f64,
    pub row_gap: f64,
}

impl Default for TidyLayout {
    fn default() -> Self {
        Self {
            column_gap: 48.0,
            row_gap: 16.0,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Side {
    Left,
    Right,
}

impl TidyLayout {
    /// Vertical space taken by a node and its visible descendants
    fn span(&self, node: &HierarchicalNode) -> f64 {
        let children = self.stack_height(node.children.iter().filter(|c| c.data.visible));
        node.data.height.max(children)
    }

    fn stack_height<'a>(&self, nodes: impl Iterator<Item = &'a HierarchicalNode>) -> f64 {
        let (total, count) = nodes.fold((0.0, 0usize), |(sum, n), c| (sum + self.span(c), n + 1));
        if count == 0 {
            0.0
        } else {
            total + self.row_gap * (count - 1) as f64
        }
    }

    fn place_children(
        &self,
        children: &[&HierarchicalNode],
        side: Side,
        parent_edge: f64,
        center_y: f64,
        out: &mut Vec<GeometryUpdate>,
    ) {
        let mut cursor = center_y - self.stack_height(children.iter().copied()) / 2.0;

        for child in children {
            let span = self.span(child);
            let mid = cursor + span / 2.0;
            let x = match side {
                Side::Right => parent_edge + self.column_gap,
                Side::Left => parent_edge - self.column_gap - child.data.width,
            };
            let y = mid - child.data.height / 2.0;
            out.push(GeometryUpdate {
                id: child.data.id.clone(),
                x: Some(x),
                y: Some(y),
                ..GeometryUpdate::default()
            });

            let edge = match side {
                Side::Right => x + child.data.width,
                Side::Left => x,
            };
            let grandchildren: Vec<&HierarchicalNode> =
                child.children.iter().filter(|c| c.data.visible).collect();
            self.place_children(&grandchildren, side, edge, mid, out);

            cursor += span + self.row_gap;
        }
    }
}

impl LayoutAdjuster for TidyLayout {
    fn adjust(&self, elements: &FlatMap, config: &LayoutConfig) -> Vec<GeometryUpdate> {
        let Some(tree) = flat_to_hierarchical(elements) else {
            return Vec::new();
        };
        let root = &tree.root;
        let zoom = if config.zoom_ratio > 0.0 { config.zoom_ratio } else { 1.0 };
        let center_x = config.canvas_width / 2.0 / zoom;
        let center_y = config.canvas_height / 2.0 / zoom;

        let root_x = center_x - root.data.width / 2.0;
        let mut out = vec![GeometryUpdate {
            id: root.data.id.clone(),
            x: Some(root_x),
            y: Some(center_y - root.data.height / 2.0),
            ..GeometryUpdate::default()
        }];

        let (left, right): (Vec<&HierarchicalNode>, Vec<&HierarchicalNode>) = root
            .children
            .iter()
            .filter(|c| c.data.visible)
            .partition(|c| c.data.direction == Direction::Left);

        self.place_children(&right, Side::Right, root_x + root.data.width, center_y, &mut out);
        self.place_children(&left, Side::Left, root_x, center_y, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_tree::{hierarchical_to_flat, Element, HierarchicalStructure};

    fn sized(id: &str, direction: Direction) -> Element {
        let mut element = Element::new(id, vec![id.to_string()]).with_direction(direction);
        element.width = 100.0;
        element.height = 40.0;
        element
    }

    fn sample() -> FlatMap {
        let mut tree = HierarchicalStructure::new(HierarchicalNode::with_children(
            sized("1", Direction::None),
            vec![
                HierarchicalNode::new(sized("2", Direction::Right)),
                HierarchicalNode::new(sized("3", Direction::Right)),
                HierarchicalNode::new(sized("4", Direction::Left)),
            ],
        ));
        tree.normalize();
        hierarchical_to_flat(&tree)
    }

    fn find<'a>(updates: &'a [GeometryUpdate], id: &str) -> &'a GeometryUpdate {
        updates.iter().find(|u| u.id == id).unwrap()
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryClipboardStore::new();
        assert!(store.get().is_none());
        store.set("captured".to_string());
        assert_eq!(store.get().as_deref(), Some("captured"));
    }

    #[test]
    fn test_tidy_layout_sides() {
        let config = LayoutConfig::default();
        let updates = TidyLayout::default().adjust(&sample(), &config);
        assert_eq!(updates.len(), 4);

        let root = find(&updates, "1");
        assert_eq!(root.x, Some(config.canvas_width / 2.0 - 50.0));

        let right = find(&updates, "2");
        let left = find(&updates, "4");
        assert!(right.x.unwrap() > root.x.unwrap());
        assert!(left.x.unwrap() < root.x.unwrap());
    }

    #[test]
    fn test_tidy_layout_stacks_siblings() {
        let updates = TidyLayout::default().adjust(&sample(), &LayoutConfig::default());
        let first = find(&updates, "2").y.unwrap();
        let second = find(&updates, "3").y.unwrap();
        assert_eq!(second - first, 40.0 + 16.0);
    }

    #[test]
    fn test_layout_of_unrooted_map_is_empty() {
        let updates = TidyLayout::default().adjust(&FlatMap::new(), &LayoutConfig::default());
        assert!(updates.is_empty());
    }
}
