//! Stable read positions within a tree.
//!
//! A [`Cursor`] names an element rather than a path to it, so stepping to a
//! neighbour is O(1) amortised: the successor is either down the right
//! subtree or up the parent chain, and every edge of the tree is crossed at
//! most twice by a full scan. [`Iter`] wraps a cursor in the standard
//! [`Iterator`] contract.

use crate::{node::NodeId, raw::RawTree};

/// A read-only position in a tree, valid for as long as the tree is borrowed.
///
/// A cursor is either attached to an element or detached. Detached is
/// terminal: stepping a detached cursor is a no-op, and stepping past either
/// end detaches. The borrow rules prevent the tree from being mutated while
/// any cursor into it exists, so an attached cursor cannot dangle.
pub struct Cursor<'a, T, C> {
    raw: &'a RawTree<T, C>,
    node: Option<NodeId>,
}

impl<T, C> std::fmt::Debug for Cursor<'_, T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("attached", &self.node.is_some())
            .finish()
    }
}

impl<'a, T, C> Clone for Cursor<'a, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, C> Copy for Cursor<'a, T, C> {}

impl<'a, T, C> Cursor<'a, T, C> {
    pub(crate) fn new(raw: &'a RawTree<T, C>, node: Option<NodeId>) -> Self {
        Self { raw, node }
    }

    /// The element under the cursor, or `None` when detached.
    pub fn get(&self) -> Option<&'a T> {
        let raw = self.raw;
        self.node.map(|id| raw.value(id))
    }

    /// Steps to the in-order successor, detaching past the greatest element.
    pub fn move_next(&mut self) {
        let raw = self.raw;
        let Some(mut cur) = self.node else { return };

        if let Some(r) = raw.node(cur).right {
            self.node = Some(raw.leftmost(r));
            return;
        }

        // No right subtree: climb while arriving from a right child. The
        // first ancestor reached from its left child is the successor.
        loop {
            match raw.node(cur).parent {
                Some(p) if raw.node(p).right == Some(cur) => cur = p,
                other => {
                    self.node = other;
                    return;
                }
            }
        }
    }

    /// Steps to the in-order predecessor, detaching past the least element.
    pub fn move_prev(&mut self) {
        let raw = self.raw;
        let Some(mut cur) = self.node else { return };

        if let Some(l) = raw.node(cur).left {
            self.node = Some(raw.rightmost(l));
            return;
        }

        loop {
            match raw.node(cur).parent {
                Some(p) if raw.node(p).left == Some(cur) => cur = p,
                other => {
                    self.node = other;
                    return;
                }
            }
        }
    }
}

/// A forward in-order iterator built on [`Cursor`].
pub struct Iter<'a, T, C> {
    cursor: Cursor<'a, T, C>,
}

impl<T, C> std::fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter").field("cursor", &self.cursor).finish()
    }
}

impl<'a, T, C> Iter<'a, T, C> {
    pub(crate) fn new(cursor: Cursor<'a, T, C>) -> Self {
        Self { cursor }
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let v = self.cursor.get()?;
        self.cursor.move_next();
        Some(v)
    }
}
