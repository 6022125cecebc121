pub mod config;
pub mod search;

pub use config::TreeConfig;
pub use search::{
    Compare, DepthTasks, NodeId, ParallelTree, PriorityQueue, SearchError, SearchState,
    SearchTree, Task, TreeStats, WorkerTasks,
};
