//! A [treap] balancing engine.
//!
//! Each node draws an immutable random priority at insertion, stored in the
//! node's `aux` word, and the tree maintains the min-heap order "parent
//! priority is not greater than child priority" alongside the search order.
//! The shape is then that of a random BST, giving expected logarithmic depth
//! without tracking balance metadata.
//!
//! Insertion is iterative: the new element is attached as a leaf and rotated
//! up the parent chain while it out-prioritises its parent. Removal rotates
//! the doomed node downward, always lifting the child with the smaller
//! priority so the heap order is preserved.
//!
//! [treap]: https://en.wikipedia.org/wiki/Treap

use std::cmp::Ordering;

use rand::{rngs::SmallRng, RngCore, SeedableRng};

use crate::{
    compare::{Comparator, Natural},
    node::NodeId,
    raw::RawTree,
    tree::{OrderedTree, Options},
    Cursor, Iter,
};

/// An ordered collection balanced by randomised priorities.
///
/// See [`OrderedTree`] for the operations shared with [`AvlTree`], and the
/// crate documentation for a usage example.
///
/// [`AvlTree`]: crate::AvlTree
#[derive(Debug, Clone)]
pub struct Treap<T, C = Natural, R = SmallRng> {
    raw: RawTree<T, C>,
    rng: R,
}

impl<T> Treap<T>
where
    T: Ord,
{
    /// A tree over the natural order of `T` with default [`Options`] and an
    /// entropy-seeded priority source.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T> Default for Treap<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Treap<T, C>
where
    C: Comparator<T>,
{
    /// A tree ordered by `cmp` with default [`Options`] and an
    /// entropy-seeded priority source.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_options(cmp, Options::default())
    }

    /// # Panics
    ///
    /// Panics if `options` carries a zero block size.
    pub fn with_options(cmp: C, options: Options<T>) -> Self {
        Self::with_rng(cmp, options, SmallRng::from_entropy())
    }
}

impl<T, C, R> Treap<T, C, R>
where
    C: Comparator<T>,
    R: RngCore,
{
    /// A tree drawing priorities from the given source. Two trees built with
    /// equal sources and the same operation sequence take identical shapes.
    pub fn with_rng(cmp: C, options: Options<T>, rng: R) -> Self {
        Self {
            raw: RawTree::new(cmp, options.allocator, options.multiplicity),
            rng,
        }
    }

    /// A cursor over the least element, or a detached cursor when empty.
    pub fn cursor_min(&self) -> Cursor<'_, T, C> {
        Cursor::new(&self.raw, self.raw.min_node())
    }

    /// A cursor over the greatest element, or a detached cursor when empty.
    pub fn cursor_max(&self) -> Cursor<'_, T, C> {
        Cursor::new(&self.raw, self.raw.max_node())
    }

    /// A cursor over the element equal to `probe`, detached when absent.
    pub fn cursor_at(&self, probe: &T) -> Cursor<'_, T, C> {
        Cursor::new(&self.raw, self.raw.find_node(probe))
    }

    /// A cursor over the element of 1-indexed rank `rank`, detached when out
    /// of range.
    pub fn cursor_nth(&self, rank: usize) -> Cursor<'_, T, C> {
        Cursor::new(&self.raw, self.raw.rank_nth_node(rank))
    }

    /// Iterates over all elements in comparator order.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::new(self.cursor_min())
    }

    /// Inserts `value`, or hands it to `on_existing` together with the stored
    /// equal element.
    fn insert_with<F>(&mut self, value: T, on_existing: F)
    where
        F: FnOnce(T, &mut T),
    {
        let Some(root) = self.raw.root else {
            let aux = self.rng.next_u64();
            let id = self.raw.new_node(value, aux);
            self.raw.root = Some(id);
            return;
        };

        let mut cur = root;
        loop {
            match self.raw.cmp_node(cur, &value) {
                Ordering::Equal => {
                    on_existing(value, &mut self.raw.node_mut(cur).value);

                    // The hook may have changed the element's multiplicity.
                    self.refresh_to_root(cur);
                    return;
                }
                Ordering::Greater => match self.raw.node(cur).left {
                    Some(l) => cur = l,
                    None => {
                        let id = self.attach_leaf(cur, value);
                        self.raw.node_mut(cur).left = Some(id);
                        self.heapify_up(id);
                        self.refresh_to_root(id);
                        return;
                    }
                },
                Ordering::Less => match self.raw.node(cur).right {
                    Some(r) => cur = r,
                    None => {
                        let id = self.attach_leaf(cur, value);
                        self.raw.node_mut(cur).right = Some(id);
                        self.heapify_up(id);
                        self.refresh_to_root(id);
                        return;
                    }
                },
            }
        }
    }

    fn attach_leaf(&mut self, parent: NodeId, value: T) -> NodeId {
        let aux = self.rng.next_u64();
        let id = self.raw.new_node(value, aux);
        self.raw.node_mut(id).parent = Some(parent);
        id
    }

    /// Rotates `id` up the parent chain while it out-prioritises its parent.
    fn heapify_up(&mut self, id: NodeId) {
        while let Some(parent) = self.raw.node(id).parent {
            if self.raw.node(id).aux >= self.raw.node(parent).aux {
                break;
            }
            if self.raw.node(parent).left == Some(id) {
                self.raw.rotate_right(parent);
            } else {
                self.raw.rotate_left(parent);
            }
        }
    }

    /// Recomputes subtree sizes from `id` up to the top of the tree and
    /// re-anchors the root there.
    fn refresh_to_root(&mut self, id: NodeId) {
        self.raw.push_up(id);

        let mut cur = id;
        while let Some(p) = self.raw.node(cur).parent {
            self.raw.push_up(p);
            cur = p;
        }
        self.raw.root = Some(cur);
    }

    /// Removes from the subtree under `root` the element equal to `probe`,
    /// subject to `keep_check`, returning the new subtree root. Mirrors the
    /// AVL engine's removal but preserves the heap order instead of balance
    /// factors.
    fn remove_at<F>(
        &mut self,
        root: Option<NodeId>,
        probe: &T,
        keep_check: &mut Option<F>,
        removed: &mut Option<T>,
    ) -> Option<NodeId>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let root = root?;

        match self.raw.cmp_node(root, probe) {
            Ordering::Greater => {
                let left = self.raw.node(root).left;
                let child = self.remove_at(left, probe, keep_check, removed);
                self.raw.node_mut(root).left = child;
            }
            Ordering::Less => {
                let right = self.raw.node(root).right;
                let child = self.remove_at(right, probe, keep_check, removed);
                self.raw.node_mut(root).right = child;
            }
            Ordering::Equal => {
                if let Some(check) = keep_check.take() {
                    if !check(&mut self.raw.node_mut(root).value) {
                        self.raw.push_up(root);
                        return Some(root);
                    }
                }

                let n = self.raw.node(root);
                let (left, right) = (n.left, n.right);
                return match (left, right) {
                    (None, None) => {
                        *removed = Some(self.raw.take_node(root).value);
                        None
                    }
                    (Some(child), None) | (None, Some(child)) => {
                        *removed = Some(self.raw.take_node(root).value);
                        Some(child)
                    }
                    (Some(l), Some(r)) => {
                        // Lift the child with the smaller priority above the
                        // doomed node, then chase the node down.
                        let top = if self.raw.node(l).aux < self.raw.node(r).aux {
                            let top = self.raw.rotate_right(root);
                            let sub = self.raw.node(top).right;
                            let child = self.remove_at(sub, probe, keep_check, removed);
                            self.raw.node_mut(top).right = child;
                            top
                        } else {
                            let top = self.raw.rotate_left(root);
                            let sub = self.raw.node(top).left;
                            let child = self.remove_at(sub, probe, keep_check, removed);
                            self.raw.node_mut(top).left = child;
                            top
                        };
                        self.raw.push_up(top);
                        Some(top)
                    }
                };
            }
        }

        self.raw.push_up(root);
        Some(root)
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &RawTree<T, C> {
        &self.raw
    }
}

impl<T, C, R> OrderedTree<T> for Treap<T, C, R>
where
    C: Comparator<T>,
    R: RngCore,
{
    fn clear(&mut self) {
        self.raw.clear();
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    fn insert(&mut self, value: T) -> Option<T> {
        let mut old = None;
        self.insert_with(value, |new, slot| {
            old = Some(std::mem::replace(slot, new));
        });
        old
    }

    fn insert_or_visit<F>(&mut self, value: T, visit: F)
    where
        F: FnOnce(&mut T),
    {
        self.insert_with(value, |_new, slot| visit(slot));
    }

    fn remove(&mut self, probe: &T) -> Option<T> {
        let mut removed = None;
        let root = self.remove_at(self.raw.root, probe, &mut None::<fn(&mut T) -> bool>, &mut removed);

        self.raw.root = root;
        if let Some(root) = root {
            self.raw.node_mut(root).parent = None;
        }
        removed
    }

    fn remove_if<F>(&mut self, probe: &T, check: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut check = Some(check);
        let mut removed = None;
        let root = self.remove_at(self.raw.root, probe, &mut check, &mut removed);

        self.raw.root = root;
        if let Some(root) = root {
            self.raw.node_mut(root).parent = None;
        }

        removed.is_some()
    }

    fn find(&self, probe: &T) -> Option<&T> {
        self.raw.find_node(probe).map(|id| self.raw.value(id))
    }

    fn min(&self) -> Option<&T> {
        self.raw.min_node().map(|id| self.raw.value(id))
    }

    fn max(&self) -> Option<&T> {
        self.raw.max_node().map(|id| self.raw.value(id))
    }

    fn prev(&self, probe: &T) -> Option<&T> {
        self.raw.prev_node(probe).map(|id| self.raw.value(id))
    }

    fn next(&self, probe: &T) -> Option<&T> {
        self.raw.next_node(probe).map(|id| self.raw.value(id))
    }

    fn find_or_next(&self, probe: &T) -> Option<&T> {
        self.raw.find_or_next_node(probe).map(|id| self.raw.value(id))
    }

    fn find_or_prev(&self, probe: &T) -> Option<&T> {
        self.raw.find_or_prev_node(probe).map(|id| self.raw.value(id))
    }

    fn rank(&self, probe: &T) -> usize {
        self.raw.rank(probe)
    }

    fn rank_nth(&self, rank: usize) -> Option<&T> {
        self.raw.rank_nth_node(rank).map(|id| self.raw.value(id))
    }

    fn range<F>(&self, f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.raw.range(f);
    }

    fn range_rev<F>(&self, f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.raw.range_rev(f);
    }

    fn range_from<F>(&self, start: &T, f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.raw.range_from(start, f);
    }

    fn range_from_to<F>(&self, start: &T, end: &T, f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.raw.range_from_to(start, end, f);
    }

    fn range_to<F>(&self, end: &T, f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.raw.range_to(end, f);
    }
}
