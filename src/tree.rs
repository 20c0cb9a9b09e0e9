//! The operation contract both balancing engines fulfil.

use crate::arena::AllocStrategy;

/// Construction knobs shared by both engines.
///
/// ```
/// use ordstat::{AllocStrategy, AvlTree, Natural, Options, OrderedTree};
///
/// let opts = Options {
///     allocator: AllocStrategy::Direct,
///     ..Options::default()
/// };
/// let mut t = AvlTree::with_options(Natural, opts);
/// t.insert(42_u32);
/// # assert_eq!(t.len(), 1);
/// ```
pub struct Options<T> {
    /// How node storage is acquired and reclaimed.
    pub allocator: AllocStrategy,

    /// When set, an element counts for this many units in [`len`], [`rank`]
    /// and [`rank_nth`] instead of 1. The hook is read again after every
    /// insert or remove visitor runs, so a visitor mutating the multiplicity
    /// (a counted multiset) is reflected immediately.
    ///
    /// Must never return a different value for an element the tree holds
    /// unless a visitor passed by the caller changed it.
    ///
    /// [`len`]: OrderedTree::len
    /// [`rank`]: OrderedTree::rank
    /// [`rank_nth`]: OrderedTree::rank_nth
    pub multiplicity: Option<fn(&T) -> usize>,
}

// Manual impls: the derived forms would demand the bounds of `T`, which only
// appears behind a fn pointer here.
impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            allocator: AllocStrategy::default(),
            multiplicity: None,
        }
    }
}

impl<T> Clone for Options<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Options<T> {}

impl<T> std::fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("allocator", &self.allocator)
            .field("multiplicity", &self.multiplicity.map(|_| ..))
            .finish()
    }
}

/// An ordered collection of distinct elements with order-statistic queries.
///
/// Implemented by [`AvlTree`] and [`Treap`]; the two are observably
/// interchangeable, differing only in balancing cost profile. Elements are
/// distinct under the tree's comparator: inserting an element equal to a
/// stored one resolves against the stored element instead of adding a node.
///
/// All `probe` parameters need only carry enough of the element for the
/// comparator to order it.
///
/// [`AvlTree`]: crate::AvlTree
/// [`Treap`]: crate::Treap
pub trait OrderedTree<T> {
    /// Removes every element. With a block allocator this releases all node
    /// storage in one step.
    fn clear(&mut self);

    /// The number of units stored: the element count, or the sum of
    /// multiplicities when a [multiplicity hook] is configured.
    ///
    /// [multiplicity hook]: Options::multiplicity
    fn len(&self) -> usize;

    /// Whether the tree holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `value`, returning the displaced equal element if one was
    /// stored.
    fn insert(&mut self, value: T) -> Option<T>;

    /// Inserts `value`, or drops it and calls `visit` on the stored equal
    /// element instead.
    fn insert_or_visit<F>(&mut self, value: T, visit: F)
    where
        F: FnOnce(&mut T);

    /// Inserts `value` only if no equal element is stored. Returns whether
    /// the insert happened.
    fn insert_or_ignore(&mut self, value: T) -> bool {
        let mut clashed = false;
        self.insert_or_visit(value, |_| clashed = true);
        !clashed
    }

    /// Removes and returns the element equal to `probe`.
    fn remove(&mut self, probe: &T) -> Option<T>;

    /// Calls `check` on the element equal to `probe` and removes it when the
    /// check returns true. Returns whether the removal happened; a refused
    /// removal and an absent probe both report false.
    ///
    /// The check mutating the element must not change its position under the
    /// comparator.
    fn remove_if<F>(&mut self, probe: &T, check: F) -> bool
    where
        F: FnOnce(&mut T) -> bool;

    /// The stored element equal to `probe`.
    fn find(&self, probe: &T) -> Option<&T>;

    /// Whether an element equal to `probe` is stored.
    fn contains(&self, probe: &T) -> bool {
        self.find(probe).is_some()
    }

    /// The least element.
    fn min(&self) -> Option<&T>;

    /// The greatest element.
    fn max(&self) -> Option<&T>;

    /// The greatest element strictly less than `probe`, which need not be
    /// stored itself.
    fn prev(&self, probe: &T) -> Option<&T>;

    /// The least element strictly greater than `probe`, which need not be
    /// stored itself.
    fn next(&self, probe: &T) -> Option<&T>;

    /// The least element greater than or equal to `probe`.
    fn find_or_next(&self, probe: &T) -> Option<&T>;

    /// The greatest element less than or equal to `probe`.
    fn find_or_prev(&self, probe: &T) -> Option<&T>;

    /// The 1-indexed rank of `probe`: one more than the number of units
    /// ordered strictly before it. An absent probe reports the rank it would
    /// occupy if inserted, up to `len() + 1`.
    fn rank(&self, probe: &T) -> usize;

    /// The element covering position `rank` in the unit ordering, inverse to
    /// [`rank`]. `None` when `rank` is outside `[1, len]`.
    ///
    /// [`rank`]: OrderedTree::rank
    fn rank_nth(&self, rank: usize) -> Option<&T>;

    /// Visits every element in ascending comparator order until `f` returns
    /// false.
    fn range<F>(&self, f: F)
    where
        F: FnMut(&T) -> bool;

    /// Visits every element in descending comparator order until `f` returns
    /// false.
    fn range_rev<F>(&self, f: F)
    where
        F: FnMut(&T) -> bool;

    /// Visits every element `>= start` in ascending order until `f` returns
    /// false.
    fn range_from<F>(&self, start: &T, f: F)
    where
        F: FnMut(&T) -> bool;

    /// Visits every element in the half-open interval `[start, end)` in
    /// ascending order until `f` returns false. An inverted interval visits
    /// nothing.
    fn range_from_to<F>(&self, start: &T, end: &T, f: F)
    where
        F: FnMut(&T) -> bool;

    /// Visits every element `< end` in ascending order until `f` returns
    /// false.
    fn range_to<F>(&self, end: &T, f: F)
    where
        F: FnMut(&T) -> bool;
}
