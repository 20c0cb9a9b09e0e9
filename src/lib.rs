//! Ordered in-memory collections over arbitrary total orders, with
//! order-statistic queries and a choice of balancing engine.
//!
//! The collections keep distinct elements sorted under a pluggable
//! [`Comparator`] and augment every node with its subtree size, answering
//! rank queries and their inverse in O(log n) alongside the usual point
//! lookups, neighbour queries and bounded range scans.
//!
//! Two engines implement the same [`OrderedTree`] contract and are
//! observably interchangeable:
//!
//! * [`AvlTree`]: deterministic height-balanced rotations, worst-case
//!   O(log n) everywhere.
//! * [`Treap`]: randomised heap priorities, expected O(log n) with cheaper
//!   rebalancing per write.
//!
//! # Example
//!
//! ```
//! use ordstat::{AvlTree, OrderedTree};
//!
//! let mut t = AvlTree::new();
//! for v in [5, 3, 8, 1, 4, 7, 9] {
//!     t.insert(v);
//! }
//!
//! // Point and neighbour queries.
//! assert_eq!(t.find(&4), Some(&4));
//! assert_eq!(t.prev(&5), Some(&4));
//! assert_eq!(t.next(&5), Some(&7));
//!
//! // Order statistics: 5 is the 4th smallest element, and vice versa.
//! assert_eq!(t.rank(&5), 4);
//! assert_eq!(t.rank_nth(4), Some(&5));
//!
//! // Bounded in-order scans.
//! let mut in_range = Vec::new();
//! t.range_from_to(&3, &8, |v| {
//!     in_range.push(*v);
//!     true
//! });
//! assert_eq!(in_range, [3, 4, 5, 7]);
//! ```
//!
//! Elements need not be `Ord`: any [`Comparator`] defines the order, and the
//! [`ByKey`], [`Less`] and [`Reverse`] adapters build common ones.
//! Construction [`Options`] select the node allocation policy and an
//! optional per-element multiplicity for counted-multiset semantics.
//!
//! Read positions are available as parent-linked [`Cursor`]s, stepping to
//! either neighbour in O(1) amortised without re-descending from the root.

#![deny(rustdoc::broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::todo,
    clippy::dbg_macro
)]

mod arena;
mod avl;
mod compare;
mod cursor;
mod node;
mod raw;
mod traverse;
mod treap;
mod tree;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod test_utils;

pub use arena::AllocStrategy;
pub use avl::AvlTree;
pub use compare::{ByKey, Comparator, Less, Natural, Reverse};
pub use cursor::{Cursor, Iter};
pub use treap::Treap;
pub use tree::{Options, OrderedTree};
