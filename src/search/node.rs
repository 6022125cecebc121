#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) lane: u32,
    pub(crate) slot: u32,
}

impl NodeId {
    #[must_use]
    pub const fn lane(self) -> usize {
        self.lane as usize
    }
}

pub(crate) struct Node<S> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    pub(crate) sibling: Option<NodeId>,
    pub(crate) total_value: u32,
    pub(crate) pruned: bool,
    pub(crate) state: S,
}
