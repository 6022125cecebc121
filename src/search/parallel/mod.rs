mod batch;
mod lanes;
mod tree;

pub use batch::{DepthTasks, WorkerTasks};
pub use tree::ParallelTree;
