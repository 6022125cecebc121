use std::collections::HashMap;

use smallvec::SmallVec;

use super::heap::{Compare, PriorityQueue};
use super::node::NodeId;
use super::pool::NodeStore;

#[derive(Clone, Copy)]
pub(crate) struct NodeValue {
    pub(crate) node: NodeId,
    pub(crate) value: f64,
}

pub(crate) struct NodeValueCompare;

impl Compare<NodeValue> for NodeValueCompare {
    fn less(left: &NodeValue, right: &NodeValue) -> bool {
        left.value < right.value
    }
}

pub(crate) type NodeValueQueue = PriorityQueue<NodeValue, NodeValueCompare>;

#[derive(Default)]
pub(crate) struct DepthBucket {
    pub(crate) unsearched: NodeValueQueue,
    pub(crate) searched: Vec<NodeId>,
    pub(crate) table: HashMap<u64, SmallVec<[NodeId; 2]>>,
}

impl DepthBucket {
    pub(crate) fn push(&mut self, node: NodeId, value: f64) {
        self.unsearched.push(NodeValue { node, value });
    }

    pub(crate) fn pop_unsearched<S>(&mut self, store: &impl NodeStore<S>) -> Option<NodeId> {
        while let Some(entry) = self.unsearched.pop() {
            if store.node(entry.node).pruned {
                continue;
            }
            self.searched.push(entry.node);
            return Some(entry.node);
        }
        None
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.unsearched.len() + self.searched.len()
    }

    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.unsearched.is_empty() && self.searched.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.unsearched.clear();
        self.searched.clear();
        self.table.clear();
    }

    pub(crate) fn make_root<S>(&mut self, store: &mut impl NodeStore<S>) {
        debug_assert_eq!(self.len(), 1, "make_root expects a single survivor");
        let id = self.searched.first().copied().or_else(|| {
            self.unsearched.top().map(|entry| entry.node)
        });
        let id = id.expect("make_root on an empty depth");
        store.node_mut(id).parent = None;
    }

    pub(crate) fn cleanup<S>(&mut self, store: &mut impl NodeStore<S>) {
        if self.is_empty() && self.table.is_empty() {
            return;
        }
        let mut data = self.unsearched.export_container();
        data.retain(|entry| keep_live(entry.node, store));
        self.unsearched.import_container(data);
        self.searched.retain(|&id| keep_live(id, store));
        self.purge_table(store);
    }

    pub(crate) fn filter<S>(&mut self, survivor: NodeId, store: &mut impl NodeStore<S>) {
        if self.is_empty() {
            return;
        }
        let mut data = self.unsearched.export_container();
        data.retain(|entry| keep_survivor(entry.node, survivor, store));
        self.unsearched.import_container(data);
        self.searched
            .retain(|&id| keep_survivor(id, survivor, store));
        self.purge_table(store);
    }

    fn purge_table<S>(&mut self, store: &impl NodeStore<S>) {
        self.table.retain(|_, bucket| {
            bucket.retain(|id| !store.node(*id).pruned);
            !bucket.is_empty()
        });
    }
}

fn keep_live<S>(id: NodeId, store: &mut impl NodeStore<S>) -> bool {
    let node = store.node(id);
    if node.pruned {
        return false;
    }
    match node.parent {
        Some(parent) if store.node(parent).pruned => {
            store.release(id);
            false
        }
        _ => true,
    }
}

fn keep_survivor<S>(id: NodeId, survivor: NodeId, store: &mut impl NodeStore<S>) -> bool {
    if id == survivor {
        return true;
    }
    if !store.node(id).pruned {
        store.release(id);
    }
    false
}
