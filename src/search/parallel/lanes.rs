use crate::search::node::{Node, NodeId};
use crate::search::pool::{NodePool, NodeStore};

pub(crate) struct NodeLanes<S> {
    lanes: Vec<NodePool<S>>,
}

impl<S: Default> NodeLanes<S> {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { lanes: Vec::new() }
    }

    #[must_use]
    pub(crate) fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    #[must_use]
    pub(crate) fn total(&self) -> usize {
        self.lanes.iter().map(NodePool::len).sum()
    }

    #[must_use]
    pub(crate) fn is_at_limit(&self, limit: usize) -> bool {
        self.total() >= limit
    }

    #[must_use]
    pub(crate) fn free_counts(&self) -> Vec<usize> {
        self.lanes.iter().map(NodePool::remaining).collect()
    }

    pub(crate) fn allocate(&mut self, lane: usize, parent: NodeId) -> NodeId {
        let id = self.lanes[lane].allocate(Some(parent));
        let head = self.node(parent).child;
        self.node_mut(id).sibling = head;
        self.node_mut(parent).child = Some(id);
        id
    }

    pub(crate) fn allocate_root(&mut self) -> NodeId {
        self.lanes[0].allocate(None)
    }

    pub(crate) fn unlink_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).child == Some(child) {
            self.node_mut(parent).child = self.node(child).sibling;
            return;
        }
        let mut link = self.node(parent).child;
        while let Some(current) = link {
            let next = self.node(current).sibling;
            if next == Some(child) {
                self.node_mut(current).sibling = self.node(child).sibling;
                return;
            }
            link = next;
        }
        debug_assert!(false, "child not linked under parent");
    }

    pub(crate) fn release_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let mut child = self.node(current).child;
            while let Some(next) = child {
                child = self.node(next).sibling;
                stack.push(next);
            }
            self.release(current);
        }
    }

    pub(crate) fn reset(&mut self, lane_count: usize, root: Option<NodeId>) {
        match root {
            Some(root) => self.release_subtree(root),
            None => self.lanes.clear(),
        }
        self.lanes.truncate(lane_count);
        while self.lanes.len() < lane_count {
            self.lanes.push(NodePool::new(self.lanes.len() as u32));
        }
    }
}

impl<S> NodeStore<S> for NodeLanes<S> {
    fn node(&self, id: NodeId) -> &Node<S> {
        self.lanes[id.lane as usize].node(id)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<S> {
        self.lanes[id.lane as usize].node_mut(id)
    }

    fn release(&mut self, id: NodeId) {
        self.lanes[id.lane as usize].release(id);
    }
}
