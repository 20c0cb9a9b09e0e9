//! The total-order contract all tree operations compare elements through, and
//! the adapters for building one.
//!
//! Trees never touch `PartialEq`/`PartialOrd` on the element type directly;
//! every key comparison is routed through a [`Comparator`]. This is what lets
//! one element type be ordered ascending, descending, or by an extracted key
//! without wrapping it in a newtype.

use std::cmp::Ordering;

/// A total order over `T`.
///
/// Implementations must be consistent (antisymmetric and transitive): for all
/// `a`, `b`, `c`, `compare(a, b)` is the inverse of `compare(b, a)`, and
/// `compare(a, b) == compare(b, c) == Less` implies `compare(a, c) == Less`.
/// An inconsistent comparator does not cause memory unsafety, but the tree's
/// ordering guarantees no longer hold.
pub trait Comparator<T> {
    /// Orders `a` relative to `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Any three-way comparison closure is a [`Comparator`].
impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The ascending natural order of `T: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Flips the order of the wrapped comparator.
///
/// `Reverse::new(Natural)` is the descending natural order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse<C>(C);

impl<C> Reverse<C> {
    /// Wraps `inner`, reversing its order.
    pub fn new(inner: C) -> Self {
        Self(inner)
    }
}

impl<T, C> Comparator<T> for Reverse<C>
where
    C: Comparator<T>,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Adapts a boolean less-than predicate into the three-way contract by
/// evaluating it in both directions: neither direction holding means equal.
#[derive(Debug, Clone, Copy)]
pub struct Less<F>(F);

impl<F> Less<F> {
    /// Wraps a strict less-than predicate.
    pub fn new(less: F) -> Self {
        Self(less)
    }
}

impl<T, F> Comparator<T> for Less<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        if (self.0)(a, b) {
            Ordering::Less
        } else if (self.0)(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Compares elements by a key extracted from them.
///
/// To order elements whose key may be absent, extract an `Option<K>`:
/// `Option`'s derived ordering places absent keys before present ones and
/// compares two absent keys as equal, in both comparison directions.
#[derive(Debug, Clone, Copy)]
pub struct ByKey<F>(F);

impl<F> ByKey<F> {
    /// Wraps a key extraction function.
    pub fn new(key: F) -> Self {
        Self(key)
    }
}

impl<T, K, F> Comparator<T> for ByKey<F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}
