//! Structural validators shared by the unit and property tests.
//!
//! Each validator walks the whole tree and asserts every invariant the
//! engines are supposed to maintain, so a single call after a mutation
//! catches corrupted links, stale sizes and broken balance metadata.

use rand::RngCore;

use crate::{
    avl::AvlTree,
    compare::Comparator,
    node::NodeId,
    raw::RawTree,
    treap::Treap,
};

/// Asserts every shared structural invariant plus the AVL height discipline.
#[track_caller]
pub(crate) fn validate_avl<T, C>(t: &AvlTree<T, C>)
where
    C: Comparator<T>,
{
    validate_raw(t.raw());
    check_heights(t.raw(), t.raw().root);
}

/// Asserts every shared structural invariant plus the priority heap order.
#[track_caller]
pub(crate) fn validate_treap<T, C, R>(t: &Treap<T, C, R>)
where
    C: Comparator<T>,
    R: RngCore,
{
    validate_raw(t.raw());
    check_heap(t.raw(), t.raw().root);
}

/// Search order, subtree sizes and parent back-links.
fn validate_raw<T, C>(raw: &RawTree<T, C>)
where
    C: Comparator<T>,
{
    let total = check_node(raw, raw.root, None, None, None);
    assert_eq!(raw.len(), total, "root size disagrees with tree contents");
}

fn check_node<T, C>(
    raw: &RawTree<T, C>,
    id: Option<NodeId>,
    parent: Option<NodeId>,
    lo: Option<&T>,
    hi: Option<&T>,
) -> usize
where
    C: Comparator<T>,
{
    let Some(id) = id else { return 0 };
    let n = raw.node(id);

    assert_eq!(n.parent, parent, "stale parent link");

    let v = &n.value;
    if let Some(lo) = lo {
        assert!(raw.compare(lo, v).is_lt(), "search order violated");
    }
    if let Some(hi) = hi {
        assert!(raw.compare(v, hi).is_lt(), "search order violated");
    }

    let left = check_node(raw, n.left, Some(id), lo, Some(v));
    let right = check_node(raw, n.right, Some(id), Some(v), hi);

    let size = left + raw.count_at(id) + right;
    assert_eq!(n.size, size, "stale subtree size");
    size
}

fn check_heights<T, C>(raw: &RawTree<T, C>, id: Option<NodeId>) -> u64 {
    let Some(id) = id else { return 0 };
    let n = raw.node(id);

    let left = check_heights(raw, n.left);
    let right = check_heights(raw, n.right);
    assert!(
        (right as i64 - left as i64).abs() <= 1,
        "balance factor out of range"
    );

    let h = 1 + left.max(right);
    assert_eq!(n.aux, h, "stale stored height");
    h
}

fn check_heap<T, C>(raw: &RawTree<T, C>, id: Option<NodeId>) {
    let Some(id) = id else { return };
    let n = raw.node(id);

    for child in [n.left, n.right].into_iter().flatten() {
        assert!(
            raw.node(child).aux >= n.aux,
            "priority heap order violated"
        );
        check_heap(raw, Some(child));
    }
}

/// The number of nodes on the longest root-to-leaf path.
pub(crate) fn depth<T, C>(raw: &RawTree<T, C>) -> usize {
    fn depth_at<T, C>(raw: &RawTree<T, C>, id: Option<NodeId>) -> usize {
        let Some(id) = id else { return 0 };
        let n = raw.node(id);
        1 + depth_at(raw, n.left).max(depth_at(raw, n.right))
    }
    depth_at(raw, raw.root)
}

/// The elements in pre-order: equal sequences imply identical tree shapes
/// (given equal contents).
pub(crate) fn preorder_shape<T, C>(raw: &RawTree<T, C>) -> Vec<T>
where
    T: Clone,
{
    fn collect<T: Clone, C>(raw: &RawTree<T, C>, id: Option<NodeId>, out: &mut Vec<T>) {
        let Some(id) = id else { return };
        let n = raw.node(id);
        out.push(n.value.clone());
        collect(raw, n.left, out);
        collect(raw, n.right, out);
    }

    let mut out = Vec::new();
    collect(raw, raw.root, &mut out);
    out
}
