use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mindmap_tree::{
    flat_to_hierarchical, hierarchical_to_flat, Element, HierarchicalNode, HierarchicalStructure,
};

fn build_tree(width: usize, depth: u32) -> HierarchicalStructure {
    fn build(id: &mut u64, width: usize, depth: u32) -> HierarchicalNode {
        *id += 1;
        let data = Element::new(id.to_string(), vec![format!("node {}", id)]);
        let children = if depth == 0 {
            Vec::new()
        } else {
            (0..width).map(|_| build(id, width, depth - 1)).collect()
        };
        HierarchicalNode::with_children(data, children)
    }

    let mut id = 0;
    let mut doc = HierarchicalStructure::new(build(&mut id, width, depth));
    doc.normalize();
    doc
}

fn project_to_flat(c: &mut Criterion) {
    let doc = build_tree(6, 4);

    c.bench_function("hierarchical_to_flat_1555", |b| {
        b.iter(|| hierarchical_to_flat(black_box(&doc)))
    });
}

fn rebuild_from_flat(c: &mut Criterion) {
    let flat = hierarchical_to_flat(&build_tree(6, 4));

    c.bench_function("flat_to_hierarchical_1555", |b| {
        b.iter(|| flat_to_hierarchical(black_box(&flat)))
    });
}

fn find_deep_node(c: &mut Criterion) {
    let doc = build_tree(6, 4);
    let last = doc.ids().last().map(|s| s.to_string()).unwrap_or_default();

    c.bench_function("find_parent_node_last", |b| {
        b.iter(|| doc.find_parent_node(black_box(&last)).is_some())
    });
}

criterion_group!(benches, project_to_flat, rebuild_from_flat, find_deep_node);
criterion_main!(benches);
