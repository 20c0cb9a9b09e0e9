//! Guarded tree traversal.
//!
//! Every query in this crate is one traversal: a visit order over
//! (left subtree, current node, right subtree) plus three branch guards
//! evaluated against the current node's element. A guard returning false
//! prunes that branch without stopping the walk; the visit callback returning
//! false stops the entire walk. Point lookups, neighbour queries and range
//! scans all fall out of this one primitive with different guard choices.

use crate::{node::NodeId, raw::RawTree};

/// The order the three branches of a node are processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Order {
    In,
    ReverseIn,
    Pre,
    Post,
    ReversePost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Left,
    Cur,
    Right,
}

impl Order {
    const fn steps(self) -> [Step; 3] {
        match self {
            Order::In => [Step::Left, Step::Cur, Step::Right],
            Order::ReverseIn => [Step::Right, Step::Cur, Step::Left],
            Order::Pre => [Step::Cur, Step::Left, Step::Right],
            Order::Post => [Step::Left, Step::Right, Step::Cur],
            Order::ReversePost => [Step::Right, Step::Left, Step::Cur],
        }
    }
}

/// Branch admission predicates, each applied to the current node's element.
pub(crate) struct Guards<'a, T> {
    pub(crate) enter_left: &'a dyn Fn(&T) -> bool,
    pub(crate) enter_cur: &'a dyn Fn(&T) -> bool,
    pub(crate) enter_right: &'a dyn Fn(&T) -> bool,
}

/// The no-pruning guard.
pub(crate) fn always<T>(_: &T) -> bool {
    true
}

impl<T, C> RawTree<T, C> {
    /// Walks the subtree under `root`, visiting admitted nodes in `order`.
    ///
    /// Returns false iff `visit` stopped the walk.
    pub(crate) fn walk(
        &self,
        root: Option<NodeId>,
        order: Order,
        guards: &Guards<'_, T>,
        visit: &mut dyn FnMut(NodeId) -> bool,
    ) -> bool {
        let Some(id) = root else { return true };

        for step in order.steps() {
            let keep_going = match step {
                Step::Left => {
                    !(guards.enter_left)(self.value(id))
                        || self.walk(self.node(id).left, order, guards, visit)
                }
                Step::Cur => !(guards.enter_cur)(self.value(id)) || visit(id),
                Step::Right => {
                    !(guards.enter_right)(self.value(id))
                        || self.walk(self.node(id).right, order, guards, visit)
                }
            };
            if !keep_going {
                return false;
            }
        }

        true
    }
}
