use crate::search::node::NodeId;

pub struct DepthTasks {
    pub nodes: Vec<NodeId>,
    pub depth: usize,
}

pub struct WorkerTasks {
    pub tasks: Vec<DepthTasks>,
    pub worker: usize,
}
