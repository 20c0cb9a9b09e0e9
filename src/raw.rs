//! The storage and query core shared by both balancing engines.
//!
//! [`RawTree`] owns the node arena, the root link and the comparator, and
//! implements everything that does not depend on the balancing discipline:
//! rotations, size bookkeeping, parent-link maintenance, and every read-only
//! query. The engines layer insert/delete on top and keep their balance
//! metadata in [`Node::aux`].

use std::cmp::Ordering;

use crate::{
    arena::{AllocStrategy, Arena},
    compare::Comparator,
    node::{Node, NodeId},
    traverse::{always, Guards, Order},
};

#[derive(Debug, Clone)]
pub(crate) struct RawTree<T, C> {
    arena: Arena<Node<T>>,
    pub(crate) root: Option<NodeId>,
    cmp: C,

    /// When set, an element contributes this many units to subtree sizes
    /// instead of 1. Resolved once at construction.
    multiplicity: Option<fn(&T) -> usize>,
}

impl<T, C> RawTree<T, C> {
    pub(crate) fn new(
        cmp: C,
        allocator: AllocStrategy,
        multiplicity: Option<fn(&T) -> usize>,
    ) -> Self {
        Self {
            arena: Arena::new(allocator),
            root: None,
            cmp,
            multiplicity,
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        self.arena.get(id)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.arena.get_mut(id)
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &T {
        &self.arena.get(id).value
    }

    /// Subtree size of an optional link; an absent child contributes 0.
    #[inline]
    pub(crate) fn size_of(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.node(id).size)
    }

    /// The number of units the element at `id` contributes to subtree sizes.
    #[inline]
    pub(crate) fn count_at(&self, id: NodeId) -> usize {
        match self.multiplicity {
            Some(count) => count(self.value(id)),
            None => 1,
        }
    }

    pub(crate) fn new_node(&mut self, value: T, aux: u64) -> NodeId {
        let count = self.multiplicity.map_or(1, |count| count(&value));
        self.arena.alloc(Node::new(value, aux, count))
    }

    /// Unlinks nothing; removes the node record from the arena and returns it.
    pub(crate) fn take_node(&mut self, id: NodeId) -> Node<T> {
        self.arena.take(id)
    }

    pub(crate) fn clear(&mut self) {
        self.root = None;
        self.arena.release();
    }

    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    /// Recomputes this node's subtree size and re-establishes its children's
    /// parent back-links. Called on every node along a mutated path, bottom
    /// up.
    pub(crate) fn push_up(&mut self, id: NodeId) {
        let n = self.node(id);
        let (left, right) = (n.left, n.right);

        let size = self.count_at(id) + self.size_of(left) + self.size_of(right);
        self.node_mut(id).size = size;

        if let Some(l) = left {
            self.node_mut(l).parent = Some(id);
        }
        if let Some(r) = right {
            self.node_mut(r).parent = Some(id);
        }
    }

    /// Left rotate the subtree rooted at `x` around the pivot `P`, returning
    /// the new subtree root.
    ///
    /// ```text
    ///      x
    ///     / \                               P
    ///    1   P         Rotate Left        /   \
    ///       / \      --------------->    x     y
    ///      2   y                        / \   / \
    ///         / \                      1   2 3   4
    ///        3   4
    /// ```
    ///
    /// The grandparent's child link (if any) is re-pointed at `P`; when `x`
    /// was the tree root, the caller must store the returned id as the new
    /// root. Subtree sizes and parent links of the two rotated nodes are
    /// recomputed; balance metadata is the caller's concern.
    ///
    /// # Panics
    ///
    /// Panics if `x` has no right child (cannot be rotated).
    pub(crate) fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let p = self.node(x).right.expect("rotate_left: no pivot child");
        self.replace_child(self.node(x).parent, x, p);

        let pivot_left = self.node(p).left;
        self.node_mut(x).right = pivot_left;
        self.node_mut(p).left = Some(x);

        self.push_up(x);
        self.push_up(p);
        p
    }

    /// Right rotate the subtree rooted at `y` around the pivot `P`, returning
    /// the new subtree root.
    ///
    /// ```text
    ///          y
    ///         / \                           P
    ///        P   4     Rotate Right       /   \
    ///       / \      --------------->    x     y
    ///      x   3                        / \   / \
    ///     / \                          1   2 3   4
    ///    1   2
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `y` has no left child (cannot be rotated).
    pub(crate) fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let p = self.node(y).left.expect("rotate_right: no pivot child");
        self.replace_child(self.node(y).parent, y, p);

        let pivot_right = self.node(p).right;
        self.node_mut(y).left = pivot_right;
        self.node_mut(p).right = Some(y);

        self.push_up(y);
        self.push_up(p);
        p
    }

    /// Re-points `parent`'s child link from `old` to `new` and sets `new`'s
    /// parent back-link. A `None` parent means `old` was the tree root; the
    /// caller is then responsible for storing the new root.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        if let Some(p) = parent {
            let n = self.node_mut(p);
            if n.left == Some(old) {
                n.left = Some(new);
            } else if n.right == Some(old) {
                n.right = Some(new);
            }
        }
        self.node_mut(new).parent = parent;
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.node(id).left {
            id = l;
        }
        id
    }

    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.node(id).right {
            id = r;
        }
        id
    }

    pub(crate) fn min_node(&self) -> Option<NodeId> {
        self.root.map(|id| self.leftmost(id))
    }

    pub(crate) fn max_node(&self) -> Option<NodeId> {
        self.root.map(|id| self.rightmost(id))
    }
}

impl<T, C> RawTree<T, C>
where
    C: Comparator<T>,
{
    #[inline]
    pub(crate) fn compare(&self, a: &T, b: &T) -> Ordering {
        self.cmp.compare(a, b)
    }

    /// Compares the element stored at `id` against `probe`.
    #[inline]
    pub(crate) fn cmp_node(&self, id: NodeId, probe: &T) -> Ordering {
        self.cmp.compare(self.value(id), probe)
    }

    /// Locates the node holding an element equal to `probe`.
    ///
    /// Expressed as a guarded walk whose branch predicates admit exactly one
    /// branch per node, so the traversal degenerates to a root-to-node path.
    pub(crate) fn find_node(&self, probe: &T) -> Option<NodeId> {
        let mut hit = None;
        let guards = Guards {
            enter_left: &|v: &T| self.compare(v, probe).is_gt(),
            enter_cur: &|v: &T| self.compare(v, probe).is_eq(),
            enter_right: &|v: &T| self.compare(v, probe).is_lt(),
        };
        self.walk(self.root, Order::Pre, &guards, &mut |id| {
            hit = Some(id);
            false
        });
        hit
    }

    /// The greatest element strictly less than `probe`.
    pub(crate) fn prev_node(&self, probe: &T) -> Option<NodeId> {
        let mut hit = None;
        let guards = Guards {
            enter_left: &|v: &T| self.compare(v, probe).is_ge(),
            enter_cur: &|v: &T| self.compare(v, probe).is_lt(),
            enter_right: &|v: &T| self.compare(v, probe).is_lt(),
        };
        self.walk(self.root, Order::ReversePost, &guards, &mut |id| {
            hit = Some(id);
            false
        });
        hit
    }

    /// The least element strictly greater than `probe`.
    pub(crate) fn next_node(&self, probe: &T) -> Option<NodeId> {
        let mut hit = None;
        let guards = Guards {
            enter_left: &|v: &T| self.compare(v, probe).is_gt(),
            enter_cur: &|v: &T| self.compare(v, probe).is_gt(),
            enter_right: &|v: &T| self.compare(v, probe).is_le(),
        };
        self.walk(self.root, Order::Post, &guards, &mut |id| {
            hit = Some(id);
            false
        });
        hit
    }

    /// The least element greater than or equal to `probe`.
    pub(crate) fn find_or_next_node(&self, probe: &T) -> Option<NodeId> {
        let mut hit = None;
        let guards = Guards {
            enter_left: &|v: &T| self.compare(v, probe).is_gt(),
            enter_cur: &|v: &T| self.compare(v, probe).is_ge(),
            enter_right: &|v: &T| self.compare(v, probe).is_lt(),
        };
        self.walk(self.root, Order::Post, &guards, &mut |id| {
            hit = Some(id);
            false
        });
        hit
    }

    /// The greatest element less than or equal to `probe`.
    pub(crate) fn find_or_prev_node(&self, probe: &T) -> Option<NodeId> {
        let mut hit = None;
        let guards = Guards {
            enter_left: &|v: &T| self.compare(v, probe).is_gt(),
            enter_cur: &|v: &T| self.compare(v, probe).is_le(),
            enter_right: &|v: &T| self.compare(v, probe).is_lt(),
        };
        self.walk(self.root, Order::ReversePost, &guards, &mut |id| {
            hit = Some(id);
            false
        });
        hit
    }

    /// 1-indexed rank of `probe`: one more than the number of units strictly
    /// less than it. An absent element reports the rank it would be inserted
    /// at.
    pub(crate) fn rank(&self, probe: &T) -> usize {
        self.rank_at(self.root, probe)
    }

    fn rank_at(&self, root: Option<NodeId>, probe: &T) -> usize {
        let Some(root) = root else { return 1 };
        let left = self.node(root).left;
        match self.cmp_node(root, probe) {
            Ordering::Equal => self.size_of(left) + 1,
            Ordering::Less => {
                self.size_of(left)
                    + self.count_at(root)
                    + self.rank_at(self.node(root).right, probe)
            }
            Ordering::Greater => self.rank_at(left, probe),
        }
    }

    /// Inverse of [`RawTree::rank()`]: the node whose span of units covers
    /// position `rank`, or `None` when `rank` is outside `[1, len]`.
    pub(crate) fn rank_nth_node(&self, rank: usize) -> Option<NodeId> {
        self.rank_nth_at(self.root, rank)
    }

    fn rank_nth_at(&self, root: Option<NodeId>, rank: usize) -> Option<NodeId> {
        let root = root?;
        let left = self.size_of(self.node(root).left);
        let count = self.count_at(root);

        if rank <= left {
            self.rank_nth_at(self.node(root).left, rank)
        } else if rank <= left + count {
            Some(root)
        } else {
            self.rank_nth_at(self.node(root).right, rank - left - count)
        }
    }

    /// In-order visit of every element; stops when `f` returns false.
    pub(crate) fn range<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let guards = Guards {
            enter_left: &always,
            enter_cur: &always,
            enter_right: &always,
        };
        self.walk(self.root, Order::In, &guards, &mut |id| f(self.value(id)));
    }

    /// Reverse in-order visit of every element; stops when `f` returns false.
    pub(crate) fn range_rev<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let guards = Guards {
            enter_left: &always,
            enter_cur: &always,
            enter_right: &always,
        };
        self.walk(self.root, Order::ReverseIn, &guards, &mut |id| {
            f(self.value(id))
        });
    }

    /// In-order visit of every element `>= start`.
    pub(crate) fn range_from<F>(&self, start: &T, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let guards = Guards {
            enter_left: &|v: &T| self.compare(v, start).is_gt(),
            enter_cur: &|v: &T| self.compare(v, start).is_ge(),
            enter_right: &always,
        };
        self.walk(self.root, Order::In, &guards, &mut |id| f(self.value(id)));
    }

    /// In-order visit of every element in the half-open interval
    /// `[start, end)`. An inverted interval visits nothing.
    pub(crate) fn range_from_to<F>(&self, start: &T, end: &T, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let guards = Guards {
            enter_left: &|v: &T| self.compare(v, start).is_gt(),
            enter_cur: &|v: &T| {
                self.compare(v, start).is_ge() && self.compare(v, end).is_lt()
            },
            enter_right: &|v: &T| self.compare(v, end).is_lt(),
        };
        self.walk(self.root, Order::In, &guards, &mut |id| f(self.value(id)));
    }

    /// In-order visit of every element `< end`.
    pub(crate) fn range_to<F>(&self, end: &T, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let guards = Guards {
            enter_left: &always,
            enter_cur: &|v: &T| self.compare(v, end).is_lt(),
            enter_right: &|v: &T| self.compare(v, end).is_lt(),
        };
        self.walk(self.root, Order::In, &guards, &mut |id| f(self.value(id)));
    }
}
