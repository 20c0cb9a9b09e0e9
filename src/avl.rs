//! An [AVL tree] balancing engine.
//!
//! Balance metadata is the subtree height, stored in the node's `aux` word;
//! a leaf has height 1. Rebalancing is deterministic: after every structural
//! change the balance factor of each node on the mutated path is restored to
//! `[-1, 1]`, bounding the height at `1.44 * log2(n + 2)`.
//!
//! [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree

use std::cmp::Ordering;

use crate::{
    compare::{Comparator, Natural},
    node::NodeId,
    raw::RawTree,
    tree::{OrderedTree, Options},
    Cursor, Iter,
};

/// An ordered collection balanced by the AVL discipline.
///
/// See [`OrderedTree`] for the operations shared with [`Treap`], and the
/// crate documentation for a usage example.
///
/// [`Treap`]: crate::Treap
#[derive(Debug, Clone)]
pub struct AvlTree<T, C = Natural> {
    raw: RawTree<T, C>,
}

impl<T> AvlTree<T>
where
    T: Ord,
{
    /// A tree over the natural order of `T` with default [`Options`].
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T> Default for AvlTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Comparator<T>,
{
    /// A tree ordered by `cmp` with default [`Options`].
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_options(cmp, Options::default())
    }

    /// # Panics
    ///
    /// Panics if `options` carries a zero block size.
    pub fn with_options(cmp: C, options: Options<T>) -> Self {
        Self {
            raw: RawTree::new(cmp, options.allocator, options.multiplicity),
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
    /// equal element. Every public insert variant funnels through here.
    fn insert_with<F>(&mut self, value: T, on_existing: F)
    where
        F: FnOnce(T, &mut T),
    {
        let mut incoming = Some(value);
        let mut on_existing = Some(on_existing);
        let root = self.insert_at(self.raw.root, &mut incoming, &mut on_existing);

        self.raw.root = Some(root);
        self.raw.node_mut(root).parent = None;
    }

    /// Inserts into the subtree under `root`, returning its new root. The
    /// caller owns reattaching the returned subtree to its parent.
    fn insert_at<F>(
        &mut self,
        root: Option<NodeId>,
        incoming: &mut Option<T>,
        on_existing: &mut Option<F>,
    ) -> NodeId
    where
        F: FnOnce(T, &mut T),
    {
        let Some(root) = root else {
            let value = incoming.take().expect("insert value already consumed");
            return self.raw.new_node(value, 1);
        };

        let probe = incoming.as_ref().expect("insert value already consumed");
        match self.raw.cmp_node(root, probe) {
            Ordering::Equal => {
                let value = incoming.take().expect("insert value already consumed");
                let hook = on_existing.take().expect("collision hook already consumed");
                hook(value, &mut self.raw.node_mut(root).value);

                // The hook may have changed the element's multiplicity.
                self.push_up_h(root);
                root
            }
            Ordering::Greater => {
                let left = self.raw.node(root).left;
                let child = self.insert_at(left, incoming, on_existing);
                self.raw.node_mut(root).left = Some(child);
                self.push_up_h(root);
                self.fix_balance(root)
            }
            Ordering::Less => {
                let right = self.raw.node(root).right;
                let child = self.insert_at(right, incoming, on_existing);
                self.raw.node_mut(root).right = Some(child);
                self.push_up_h(root);
                self.fix_balance(root)
            }
        }
    }

    /// Removes from the subtree under `root` the element equal to `probe`,
    /// subject to `keep_check`, returning the new subtree root.
    ///
    /// A present `keep_check` is consulted once on the matched element;
    /// returning false retains the node. An absent check removes
    /// unconditionally.
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
                        // Retained; the check may have changed the element's
                        // multiplicity.
                        self.push_up_h(root);
                        return Some(self.fix_balance(root));
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
                    (Some(_), Some(_)) => {
                        // Rotate the node toward the lighter side and chase
                        // it down; the height toward it shrinks every step.
                        let top = if self.height(left) > self.height(right) {
                            let top = self.rotate_right_h(root);
                            let sub = self.raw.node(top).right;
                            let child = self.remove_at(sub, probe, keep_check, removed);
                            self.raw.node_mut(top).right = child;
                            top
                        } else {
                            let top = self.rotate_left_h(root);
                            let sub = self.raw.node(top).left;
                            let child = self.remove_at(sub, probe, keep_check, removed);
                            self.raw.node_mut(top).left = child;
                            top
                        };
                        self.push_up_h(top);
                        Some(self.fix_balance(top))
                    }
                };
            }
        }

        self.push_up_h(root);
        Some(self.fix_balance(root))
    }

    /// Restores the balance factor of `id` to `[-1, 1]`, returning the
    /// subtree's new root.
    fn fix_balance(&mut self, id: NodeId) -> NodeId {
        let f = self.factor(Some(id));
        if f > 1 {
            let right = self.raw.node(id).right;
            if self.factor(right) >= 0 {
                self.rotate_left_h(id)
            } else {
                let r = right.expect("right-heavy node has a right child");
                self.rotate_right_h(r);
                self.rotate_left_h(id)
            }
        } else if f < -1 {
            let left = self.raw.node(id).left;
            if self.factor(left) <= 0 {
                self.rotate_right_h(id)
            } else {
                let l = left.expect("left-heavy node has a left child");
                self.rotate_left_h(l);
                self.rotate_right_h(id)
            }
        } else {
            id
        }
    }

    /// `height(right) - height(left)`; an absent node has factor 0.
    fn factor(&self, id: Option<NodeId>) -> i64 {
        id.map_or(0, |id| {
            let n = self.raw.node(id);
            self.height(n.right) as i64 - self.height(n.left) as i64
        })
    }

    fn height(&self, id: Option<NodeId>) -> u64 {
        id.map_or(0, |id| self.raw.node(id).aux)
    }

    /// Size and parent-link maintenance plus the height recomputation the AVL
    /// discipline layers on top.
    fn push_up_h(&mut self, id: NodeId) {
        self.raw.push_up(id);

        let n = self.raw.node(id);
        let h = 1 + self.height(n.left).max(self.height(n.right));
        self.raw.node_mut(id).aux = h;
    }

    fn rotate_left_h(&mut self, id: NodeId) -> NodeId {
        let top = self.raw.rotate_left(id);
        self.push_up_h(id);
        self.push_up_h(top);
        top
    }

    fn rotate_right_h(&mut self, id: NodeId) -> NodeId {
        let top = self.raw.rotate_right(id);
        self.push_up_h(id);
        self.push_up_h(top);
        top
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &RawTree<T, C> {
        &self.raw
    }
}

impl<T, C> OrderedTree<T> for AvlTree<T, C>
where
    C: Comparator<T>,
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
