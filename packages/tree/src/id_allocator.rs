use crate::node::HierarchicalStructure;
use std::collections::HashSet;

/// Sequential id allocator scoped to one document.
///
/// Ids are decimal counters starting above the largest numeric id already in
/// the tree, or above a caller-supplied floor when ids issued earlier must not
/// come back. Any non-numeric id that happens to collide is skipped, so every
/// allocated id is unique against the tree and against earlier allocations.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    taken: HashSet<String>,
    count: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            taken: HashSet::new(),
            count: 0,
        }
    }

    /// Allocator that avoids every id in `structure`
    pub fn for_structure(structure: &HierarchicalStructure) -> Self {
        let mut allocator = Self::new();
        for id in structure.ids() {
            allocator.reserve(id);
        }
        allocator
    }

    /// Mark `id` as used
    pub fn reserve(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.count = self.count.max(n);
        }
        self.taken.insert(id.to_string());
    }

    /// Never hand out a numeric id at or below `floor`
    pub fn starting_after(mut self, floor: u64) -> Self {
        self.count = self.count.max(floor);
        self
    }

    /// Highest numeric id reserved or issued so far
    pub fn high_water(&self) -> u64 {
        self.count
    }

    /// Generate next unused id
    pub fn new_id(&mut self) -> String {
        loop {
            self.count += 1;
            let candidate = self.count.to_string();
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::node::HierarchicalNode;

    #[test]
    fn test_sequential_ids() {
        let mut ids = IdAllocator::new();

        assert_eq!(ids.new_id(), "1");
        assert_eq!(ids.new_id(), "2");
        assert_eq!(ids.new_id(), "3");
    }

    #[test]
    fn test_starts_above_existing_ids() {
        let root = HierarchicalNode::with_children(
            Element::new("7", vec![]),
            vec![HierarchicalNode::new(Element::new("note-a", vec![]))],
        );
        let doc = HierarchicalStructure::new(root);

        let mut ids = IdAllocator::for_structure(&doc);
        assert_eq!(ids.new_id(), "8");
    }

    #[test]
    fn test_floor_survives_removed_ids() {
        let doc = HierarchicalStructure::new(HierarchicalNode::new(Element::new("1", vec![])));

        let mut ids = IdAllocator::for_structure(&doc).starting_after(5);
        assert_eq!(ids.new_id(), "6");
        assert_eq!(ids.high_water(), 6);

        let ids = IdAllocator::for_structure(&doc).starting_after(0);
        assert_eq!(ids.high_water(), 1);
    }

    #[test]
    fn test_skips_reserved_ids() {
        let mut ids = IdAllocator::new();
        ids.reserve("2");
        ids.reserve("0");
        // "2" pushes the counter; nothing below it is handed out again
        assert_eq!(ids.new_id(), "3");
    }
}
