use crate::config::TreeConfig;

use super::super::depth::DepthBucket;
use super::super::node::NodeId;
use super::super::pool::{NodeStore, first_parent};
use super::super::state::SearchState;
use super::super::stats::TreeStats;
use super::batch::{DepthTasks, WorkerTasks};
use super::lanes::NodeLanes;

/// Batched search tree with per-lane node pools.
///
/// The tree itself is single-threaded: the driver pulls batches with
/// [`get_task_batches`](Self::get_task_batches), fans them out to workers,
/// and re-enters serially to submit each child. Lanes partition allocator
/// ownership so a driver that pre-allocates child slots per worker never
/// mixes writers.
pub struct ParallelTree<S: SearchState> {
    lanes: NodeLanes<S>,
    depths: Vec<DepthBucket>,
    config: TreeConfig,
    root: Option<NodeId>,
    stats: TreeStats,
}

impl<S: SearchState> ParallelTree<S> {
    #[must_use]
    pub fn new(config: TreeConfig) -> Self {
        Self {
            lanes: NodeLanes::new(),
            depths: Vec::new(),
            config,
            root: None,
            stats: TreeStats::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub const fn config_mut(&mut self) -> &mut TreeConfig {
        &mut self.config
    }

    pub fn reset(&mut self, root_state: &S, lane_count: usize) {
        assert!(lane_count > 0, "lane_count must be positive");
        self.lanes.reset(lane_count, self.root.take());
        for depth in &mut self.depths {
            depth.clear();
        }
        self.depths
            .resize_with(self.config.depth + 1, DepthBucket::default);
        self.stats = TreeStats::default();
        let root = self.lanes.allocate_root();
        self.lanes.node_mut(root).state = root_state.clone();
        self.root = Some(root);
        self.depths[0]
            .table
            .entry(root_state.hash())
            .or_default()
            .push(root);
        self.depths[0].push(root, 0.0);
    }

    pub fn get_task_batches(&mut self) -> Vec<WorkerTasks> {
        let worker_count = self.lanes.lane_count();
        if worker_count == 0 || self.depths.len() < 2 {
            return Vec::new();
        }
        let mut workers: Vec<WorkerTasks> = (0..worker_count)
            .map(|worker| WorkerTasks {
                tasks: Vec::new(),
                worker,
            })
            .collect();
        let free_counts = self.lanes.free_counts();
        let mut task_counts = vec![0usize; worker_count];

        let mut current_worker = 0;
        let mut most_free = 0;
        for (worker, &free) in free_counts.iter().enumerate() {
            if worker == 0 || free > most_free {
                most_free = free;
                current_worker = worker;
            }
        }

        let issuable = self.depths.len() - 1;
        let mut current_depth = 0;
        while current_depth < issuable {
            if self.depths[current_depth].unsearched.is_empty() {
                current_depth += 1;
                continue;
            }
            let mut added_this_depth = 0;
            while added_this_depth < self.config.depth_task_size {
                let Some(node) = self.depths[current_depth].pop_unsearched(&self.lanes) else {
                    break;
                };
                let worker = &mut workers[current_worker];
                let needs_batch = worker
                    .tasks
                    .last()
                    .map_or(true, |batch| batch.depth != current_depth);
                if needs_batch {
                    worker.tasks.push(DepthTasks {
                        nodes: Vec::new(),
                        depth: current_depth,
                    });
                }
                if let Some(batch) = worker.tasks.last_mut() {
                    batch.nodes.push(node);
                }
                added_this_depth += 1;
                task_counts[current_worker] += 1;
            }
            current_depth += 1;

            if task_counts[current_worker] >= self.config.depth_task_size {
                let mut best_score = i64::MIN;
                for worker in 0..worker_count {
                    let score = free_counts[worker] as i64 - task_counts[worker] as i64;
                    if score > best_score {
                        best_score = score;
                        current_worker = worker;
                    }
                }
            }
        }

        workers.retain(|worker| !worker.tasks.is_empty());
        workers
    }

    pub fn allocate_child(&mut self, lane: usize, parent: NodeId) -> NodeId {
        debug_assert!(!self.lanes.node(parent).pruned, "parent already pruned");
        self.lanes.allocate(lane, parent)
    }

    #[must_use]
    pub fn state(&self, id: NodeId) -> &S {
        &self.lanes.node(id).state
    }

    pub fn state_mut(&mut self, id: NodeId) -> &mut S {
        &mut self.lanes.node_mut(id).state
    }

    pub fn report_child(&mut self, child: NodeId, value: f64, depth: usize) -> bool {
        debug_assert!(
            depth > 0 && depth < self.depths.len(),
            "child depth out of range"
        );
        let hash = self.lanes.node(child).state.hash();
        if let Some(bucket) = self.depths[depth].table.get(&hash) {
            for &existing in bucket {
                let node = self.lanes.node(existing);
                if !node.pruned && node.state.collides(&self.lanes.node(child).state) {
                    self.stats.collisions += 1;
                    let parent = self
                        .lanes
                        .node(child)
                        .parent
                        .expect("reported child without a parent");
                    self.lanes.unlink_child(parent, child);
                    self.lanes.release(child);
                    return false;
                }
            }
        }
        self.depths[depth].table.entry(hash).or_default().push(child);
        self.depths[depth].push(child, value);
        self.stats.searched += 1;
        true
    }

    pub fn finalize(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        if self.depths.is_empty() {
            return;
        }
        let last = self.depths.len() - 1;
        if self.depths[last].unsearched.is_empty() {
            return;
        }

        let mut top_leaves = Vec::with_capacity(self.config.award_width);
        while top_leaves.len() < self.config.award_width {
            let Some(entry) = self.depths[last].unsearched.pop() else {
                break;
            };
            if self.lanes.node(entry.node).pruned {
                continue;
            }
            top_leaves.push(entry);
        }
        let mut award = top_leaves.len() as u32;
        for entry in &top_leaves {
            self.award(entry.node, award);
            award -= 1;
        }
        for entry in top_leaves {
            self.depths[last].unsearched.push(entry);
        }

        let mut cursor = root;
        loop {
            let Some(child) = self.lanes.node(cursor).child else {
                return;
            };
            if self.lanes.node(child).sibling.is_none() {
                cursor = child;
            } else {
                break;
            }
        }

        let mut frontier = Vec::new();
        let mut child = self.lanes.node(cursor).child;
        while let Some(id) = child {
            child = self.lanes.node(id).sibling;
            frontier.push(id);
        }
        let target = if self.config.prune_width > frontier.len() {
            1
        } else {
            self.config.prune_width
        };
        frontier.sort_by_key(|&id| std::cmp::Reverse(self.lanes.node(id).total_value));
        for &loser in &frontier[target..] {
            self.lanes.release_subtree(loser);
        }
        frontier.truncate(target);

        self.lanes.node_mut(cursor).child = None;
        for &survivor in &frontier {
            let head = self.lanes.node(cursor).child;
            self.lanes.node_mut(survivor).sibling = head;
            self.lanes.node_mut(cursor).child = Some(survivor);
        }

        self.cleanup_all_depths();
    }

    pub fn advance_root(&mut self) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let Some(first_child) = self.lanes.node(root).child else {
            return false;
        };

        let mut best = first_child;
        let mut sibling = self.lanes.node(first_child).sibling;
        while let Some(id) = sibling {
            sibling = self.lanes.node(id).sibling;
            if self.lanes.node(id).total_value > self.lanes.node(best).total_value {
                best = id;
            }
        }

        let mut child = self.lanes.node(root).child;
        while let Some(id) = child {
            child = self.lanes.node(id).sibling;
            if id != best {
                self.lanes.release_subtree(id);
            }
        }
        self.lanes.node_mut(root).child = None;
        self.lanes.release(root);
        self.lanes.node_mut(best).parent = None;
        self.lanes.node_mut(best).sibling = None;
        self.root = Some(best);

        self.depths.rotate_left(1);
        if let Some(bucket) = self.depths.last_mut() {
            bucket.clear();
        }
        self.cleanup_all_depths();
        true
    }

    #[must_use]
    pub fn is_search_complete(&self) -> bool {
        if self.lanes.is_at_limit(self.config.node_limit) {
            return false;
        }
        let issuable = self.depths.len().saturating_sub(1);
        self.depths[..issuable]
            .iter()
            .all(|depth| depth.unsearched.is_empty())
    }

    #[must_use]
    pub fn is_releasable(&self) -> bool {
        match self.depths.last() {
            Some(last) if last.unsearched.is_empty() => self.is_search_complete(),
            Some(_) => true,
            None => false,
        }
    }

    #[must_use]
    pub fn best_next_move(&self) -> Option<&S> {
        let best_leaf = self.best_leaf()?;
        let first = first_parent(&self.lanes, best_leaf)?;
        Some(&self.lanes.node(first).state)
    }

    #[must_use]
    pub fn root_state(&self) -> Option<&S> {
        self.root.map(|root| &self.lanes.node(root).state)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.lanes.total()
    }

    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lanes.lane_count()
    }

    #[must_use]
    pub const fn searched_count(&self) -> u64 {
        self.stats.searched
    }

    #[must_use]
    pub const fn collision_count(&self) -> u64 {
        self.stats.collisions
    }

    #[must_use]
    pub const fn stats(&self) -> TreeStats {
        self.stats
    }

    #[must_use]
    pub fn depth_len(&self, depth: usize) -> usize {
        self.depths.get(depth).map_or(0, DepthBucket::len)
    }

    fn award(&mut self, id: NodeId, value: u32) {
        let mut current = id;
        while let Some(parent) = self.lanes.node(current).parent {
            let node = self.lanes.node_mut(current);
            node.total_value = node.total_value.saturating_add(value);
            current = parent;
        }
    }

    fn best_leaf(&self) -> Option<NodeId> {
        self.depths
            .iter()
            .rev()
            .find(|depth| !depth.unsearched.is_empty())
            .and_then(|depth| depth.unsearched.top().map(|entry| entry.node))
    }

    fn cleanup_all_depths(&mut self) {
        for depth in &mut self.depths {
            depth.cleanup(&mut self.lanes);
        }
    }
}
