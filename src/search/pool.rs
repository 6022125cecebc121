use super::node::{Node, NodeId};

pub(crate) trait NodeStore<S> {
    fn node(&self, id: NodeId) -> &Node<S>;
    fn node_mut(&mut self, id: NodeId) -> &mut Node<S>;
    fn release(&mut self, id: NodeId);
}

pub(crate) fn first_parent<S>(store: &impl NodeStore<S>, id: NodeId) -> Option<NodeId> {
    let mut current = id;
    store.node(current).parent?;
    loop {
        let parent = store.node(current).parent?;
        if store.node(parent).parent.is_none() {
            return Some(current);
        }
        current = parent;
    }
}

pub(crate) fn ancestor_at<S>(
    store: &impl NodeStore<S>,
    id: NodeId,
    generations: usize,
) -> NodeId {
    let mut current = id;
    for _ in 0..generations {
        current = store
            .node(current)
            .parent
            .expect("lineage walk past the root");
    }
    current
}

pub(crate) struct NodePool<S> {
    lane: u32,
    slots: Vec<Node<S>>,
    cursor: usize,
    free: Vec<u32>,
}

impl<S: Default> NodePool<S> {
    #[must_use]
    pub(crate) const fn new(lane: u32) -> Self {
        Self {
            lane,
            slots: Vec::new(),
            cursor: 0,
            free: Vec::new(),
        }
    }

    pub(crate) fn allocate(&mut self, parent: Option<NodeId>) -> NodeId {
        let slot = if let Some(slot) = self.free.pop() {
            slot
        } else if self.cursor < self.slots.len() {
            let slot = self.cursor as u32;
            self.cursor += 1;
            slot
        } else {
            self.slots.push(Node {
                parent: None,
                child: None,
                sibling: None,
                total_value: 0,
                pruned: false,
                state: S::default(),
            });
            self.cursor += 1;
            (self.slots.len() - 1) as u32
        };
        let node = &mut self.slots[slot as usize];
        node.parent = parent;
        node.child = None;
        node.sibling = None;
        node.total_value = 0;
        node.pruned = false;
        NodeId {
            lane: self.lane,
            slot,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.cursor = 0;
        self.free.clear();
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.cursor - self.free.len()
    }

    #[must_use]
    pub(crate) fn remaining(&self) -> usize {
        self.free.len() + (self.slots.len() - self.cursor)
    }

    #[must_use]
    pub(crate) fn is_at_limit(&self, limit: usize) -> bool {
        self.len() >= limit
    }
}

impl<S> NodeStore<S> for NodePool<S> {
    fn node(&self, id: NodeId) -> &Node<S> {
        debug_assert_eq!(id.lane, self.lane, "node id from another lane");
        &self.slots[id.slot as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<S> {
        debug_assert_eq!(id.lane, self.lane, "node id from another lane");
        &mut self.slots[id.slot as usize]
    }

    fn release(&mut self, id: NodeId) {
        debug_assert_eq!(id.lane, self.lane, "node id from another lane");
        let node = &mut self.slots[id.slot as usize];
        debug_assert!(!node.pruned, "slot released twice");
        node.pruned = true;
        self.free.push(id.slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_reuses_released_slots() {
        let mut pool: NodePool<u64> = NodePool::new(0);
        let a = pool.allocate(None);
        let b = pool.allocate(Some(a));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.remaining(), 0);

        pool.release(b);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.remaining(), 1);
        assert!(pool.node(b).pruned);

        let c = pool.allocate(Some(a));
        assert_eq!(c.slot, b.slot);
        assert!(!pool.node(c).pruned);
        assert_eq!(pool.node(c).parent, Some(a));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn reset_keeps_storage_hot() {
        let mut pool: NodePool<u64> = NodePool::new(0);
        for _ in 0..8 {
            pool.allocate(None);
        }
        assert_eq!(pool.len(), 8);

        pool.reset();
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.remaining(), 8);

        let first = pool.allocate(None);
        assert_eq!(first.slot, 0);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.remaining(), 7);
    }

    #[test]
    fn limit_accounts_live_nodes_only() {
        let mut pool: NodePool<u64> = NodePool::new(0);
        let a = pool.allocate(None);
        let b = pool.allocate(Some(a));
        assert!(pool.is_at_limit(2));
        pool.release(b);
        assert!(!pool.is_at_limit(2));
    }

    #[test]
    fn lineage_walk_is_depth_counted() {
        let mut pool: NodePool<u64> = NodePool::new(0);
        let root = pool.allocate(None);
        let d1 = pool.allocate(Some(root));
        let d2 = pool.allocate(Some(d1));
        let d3 = pool.allocate(Some(d2));

        assert_eq!(ancestor_at(&pool, d3, 0), d3);
        assert_eq!(ancestor_at(&pool, d3, 2), d1);
        assert_eq!(first_parent(&pool, d3), Some(d1));
        assert_eq!(first_parent(&pool, d1), Some(d1));
        assert_eq!(first_parent(&pool, root), None);
    }
}
