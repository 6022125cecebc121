mod depth;
mod error;
mod heap;
mod node;
pub mod parallel;
mod pool;
mod state;
mod stats;
mod tree;

pub use error::SearchError;
pub use heap::{Compare, PriorityQueue};
pub use node::NodeId;
pub use parallel::{DepthTasks, ParallelTree, WorkerTasks};
pub use state::SearchState;
pub use stats::TreeStats;
pub use tree::{SearchTree, Task};
