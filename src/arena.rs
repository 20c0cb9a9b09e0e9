use crate::node::NodeId;

/// The default block size used when no allocator override is supplied.
pub(crate) const DEFAULT_BLOCK_SIZE: usize = 64;

/// How the node arena acquires and reclaims slot storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocStrategy {
    /// One slot per allocation; slots freed by node removal are recycled
    /// through a free list, so long-lived trees with churn do not grow.
    Direct,

    /// Slot storage is reserved `block_size` slots at a time, trading
    /// per-node allocation overhead for locality during bulk construction
    /// and O(block-count) bulk release on clear.
    ///
    /// Slots freed by node removal are abandoned until the next bulk
    /// release; this policy does not recycle individual slots.
    Block {
        /// Number of slots reserved per block. Must be non-zero.
        block_size: usize,
    },
}

impl Default for AllocStrategy {
    fn default() -> Self {
        Self::Block {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// Slot storage for tree nodes.
///
/// All node links are [`NodeId`] indices into this arena. The arena owns the
/// slots; the tree layered on top owns the arena.
#[derive(Debug, Clone)]
pub(crate) struct Arena<V> {
    slots: Vec<Option<V>>,

    /// Recyclable slots. Populated only under [`AllocStrategy::Direct`].
    free: Vec<NodeId>,

    strategy: AllocStrategy,
}

impl<V> Arena<V> {
    /// # Panics
    ///
    /// Panics if `strategy` is [`AllocStrategy::Block`] with a zero block
    /// size — a configuration error, caught at construction.
    pub(crate) fn new(strategy: AllocStrategy) -> Self {
        let slots = match strategy {
            AllocStrategy::Direct => Vec::new(),
            AllocStrategy::Block { block_size } => {
                assert!(block_size > 0, "block size must be greater than zero");
                Vec::with_capacity(block_size)
            }
        };

        Self {
            slots,
            free: Vec::new(),
            strategy,
        }
    }

    pub(crate) fn alloc(&mut self, value: V) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(value);
            return id;
        }

        if let AllocStrategy::Block { block_size } = self.strategy {
            // The current block is exhausted; reserve a fresh one.
            if self.slots.len() == self.slots.capacity() {
                self.slots.reserve_exact(block_size);
            }
        }

        self.slots.push(Some(value));
        NodeId::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &V {
        self.slots[id.index()].as_ref().expect("stale node id")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut V {
        self.slots[id.index()].as_mut().expect("stale node id")
    }

    /// Removes the value in slot `id`, returning it.
    ///
    /// Under [`AllocStrategy::Direct`] the slot becomes recyclable; under
    /// [`AllocStrategy::Block`] it is abandoned until [`Arena::release()`].
    pub(crate) fn take(&mut self, id: NodeId) -> V {
        let v = self.slots[id.index()].take().expect("stale node id");
        if matches!(self.strategy, AllocStrategy::Direct) {
            self.free.push(id);
        }
        v
    }

    /// Discards all slots and their backing storage in one step.
    pub(crate) fn release(&mut self) {
        self.free.clear();
        self.slots = match self.strategy {
            AllocStrategy::Direct => Vec::new(),
            AllocStrategy::Block { block_size } => Vec::with_capacity(block_size),
        };
    }

    /// Total slots handed out and not yet bulk-released, including abandoned
    /// ones. Exposed for allocation-policy assertions in tests.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
