use std::num::NonZeroU32;

/// An index into the node arena.
///
/// Node links are indices rather than owned pointers: child/parent references
/// form cycles, and indices sidestep the aliasing that owning links would
/// create. The non-zero representation gives `Option<NodeId>` the same size
/// as `NodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct NodeId(NonZeroU32);

impl NodeId {
    /// The maximum addressable slot index.
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "node arena is at maximum capacity");

        // Correctness: `index + 1` is non-zero and cannot overflow a u32
        // after the bound check above.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZeroU32::new((index + 1) as u32).expect("index + 1 is non-zero"))
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// Non-owning back-reference used for upward navigation only.
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,

    /// Number of elements in the subtree rooted at this node, counting
    /// multiplicities when the tree was configured with a multiplicity hook.
    pub(crate) size: usize,

    /// Balance metadata.
    ///
    /// The AVL engine stores the subtree height here (a leaf has height 1);
    /// the treap stores the node's immutable random priority.
    pub(crate) aux: u64,

    pub(crate) value: T,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T, aux: u64, count: usize) -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            size: count,
            aux,
            value,
        }
    }
}
