use crate::config::TreeConfig;

use super::depth::DepthBucket;
use super::error::SearchError;
use super::node::NodeId;
use super::pool::{NodePool, NodeStore, ancestor_at, first_parent};
use super::state::SearchState;
use super::stats::TreeStats;

pub struct Task<S> {
    pub state: S,
    pub depth: usize,
}

#[derive(Default)]
struct TaskCursor {
    parent: Option<NodeId>,
    allocated: Option<NodeId>,
    depth: usize,
}

/// Single-threaded depth-stratified search tree.
///
/// The driver loop pulls parent states with [`get_task`](Self::get_task),
/// writes each successor into a slot from [`new_child`](Self::new_child),
/// scores it with [`report_child`](Self::report_child), and advances the
/// round-robin depth cursor once per task round.
pub struct SearchTree<S: SearchState> {
    pool: NodePool<S>,
    depths: Vec<DepthBucket>,
    cursor: TaskCursor,
    config: TreeConfig,
    stats: TreeStats,
}

impl<S: SearchState> SearchTree<S> {
    #[must_use]
    pub fn new(config: TreeConfig) -> Self {
        Self {
            pool: NodePool::new(0),
            depths: Vec::new(),
            cursor: TaskCursor::default(),
            config,
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

    pub fn prepare_root(&mut self, current_state: &S) {
        self.stats = TreeStats::default();
        if let Some(abandoned) = self.cursor.allocated.take() {
            self.pool.release(abandoned);
        }
        if self.depths.len() != self.config.depth + 1 {
            self.reset(current_state);
            return;
        }
        let Some(root) = self.root_id() else {
            self.reset(current_state);
            return;
        };
        let Some(best_leaf) = self.best_leaf() else {
            self.reset(current_state);
            return;
        };
        let Some(survivor) = first_parent(&self.pool, best_leaf) else {
            self.reset(current_state);
            return;
        };
        if !self.pool.node(survivor).state.collides(current_state) {
            self.reset(current_state);
            return;
        }
        self.pool.release(root);
        self.depths.rotate_left(1);
        if let Some(last) = self.depths.last_mut() {
            last.clear();
        }
        self.depths[0].filter(survivor, &mut self.pool);
        self.depths[0].make_root(&mut self.pool);
        for index in 1..self.depths.len() - 1 {
            self.depths[index].cleanup(&mut self.pool);
        }
        self.cursor = TaskCursor::default();
    }

    pub fn get_task(&mut self) -> Result<Option<Task<S>>, SearchError> {
        if self.depths.len() < 2 {
            return Ok(None);
        }
        if self.pool.is_at_limit(self.config.node_limit) && !self.prune()? {
            return Ok(None);
        }
        if let Some(abandoned) = self.cursor.allocated.take() {
            self.pool.release(abandoned);
        }
        let issuable = self.depths.len() - 1;
        loop {
            let saved = self.cursor.depth;
            let mut checked = 0;
            while checked != issuable && self.depths[self.cursor.depth].unsearched.is_empty() {
                checked += 1;
                self.advance_cursor();
            }
            if checked == issuable {
                self.cursor.depth = saved;
                return Ok(None);
            }
            if let Some(parent) = self.depths[self.cursor.depth].pop_unsearched(&self.pool) {
                self.cursor.parent = Some(parent);
                let state = self.pool.node(parent).state.clone();
                return Ok(Some(Task {
                    state,
                    depth: self.cursor.depth,
                }));
            }
        }
    }

    pub fn advance_cursor(&mut self) {
        self.cursor.depth += 1;
        if self.cursor.depth >= self.depths.len().saturating_sub(1) {
            self.cursor.depth = 0;
        }
    }

    pub fn new_child(&mut self) -> &mut S {
        let parent = self.cursor.parent.expect("new_child without an active task");
        if let Some(abandoned) = self.cursor.allocated.take() {
            self.pool.release(abandoned);
        }
        let child = self.pool.allocate(Some(parent));
        self.cursor.allocated = Some(child);
        &mut self.pool.node_mut(child).state
    }

    pub fn report_child(&mut self, value: f64) -> bool {
        let child = self
            .cursor
            .allocated
            .take()
            .expect("report_child without an allocated child");
        let depth = self.cursor.depth + 1;
        debug_assert!(depth < self.depths.len(), "child depth out of range");
        let hash = self.pool.node(child).state.hash();
        if let Some(bucket) = self.depths[depth].table.get(&hash) {
            for &existing in bucket {
                let node = self.pool.node(existing);
                if !node.pruned && node.state.collides(&self.pool.node(child).state) {
                    self.stats.collisions += 1;
                    self.pool.release(child);
                    return false;
                }
            }
        }
        self.depths[depth].table.entry(hash).or_default().push(child);
        self.depths[depth].push(child, value);
        self.stats.searched += 1;
        true
    }

    #[must_use]
    pub fn best_next_move(&self) -> Option<&S> {
        let best_leaf = self.best_leaf()?;
        let first = first_parent(&self.pool, best_leaf)?;
        Some(&self.pool.node(first).state)
    }

    #[must_use]
    pub fn root_state(&self) -> Option<&S> {
        let first = self.depths.first()?;
        let id = first
            .searched
            .first()
            .copied()
            .or_else(|| first.unsearched.top().map(|entry| entry.node))?;
        Some(&self.pool.node(id).state)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.pool.len()
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
    pub fn depth_count(&self) -> usize {
        self.depths.len()
    }

    #[must_use]
    pub fn depth_len(&self, depth: usize) -> usize {
        self.depths.get(depth).map_or(0, DepthBucket::len)
    }

    fn reset(&mut self, current_state: &S) {
        self.pool.reset();
        for depth in &mut self.depths {
            depth.clear();
        }
        self.depths
            .resize_with(self.config.depth + 1, DepthBucket::default);
        let root = self.pool.allocate(None);
        self.pool.node_mut(root).state = current_state.clone();
        self.depths[0]
            .table
            .entry(current_state.hash())
            .or_default()
            .push(root);
        self.depths[0].push(root, 0.0);
        self.cursor = TaskCursor::default();
    }

    fn prune(&mut self) -> Result<bool, SearchError> {
        let Some(last) = self.last_active_depth() else {
            return Err(SearchError::LimitUnderflow {
                node_limit: self.config.node_limit,
            });
        };
        let Some(first) = self.first_active_depth() else {
            return Ok(false);
        };
        if first == last {
            return Ok(false);
        }
        if self.config.prune_depth_limit > 0 && first > self.config.prune_depth_limit {
            return Ok(false);
        }
        let Some(best_leaf) = self.depths[last].unsearched.top().map(|entry| entry.node) else {
            return Ok(false);
        };
        let survivor = ancestor_at(&self.pool, best_leaf, last - first);
        self.depths[first].filter(survivor, &mut self.pool);
        for index in first..=last {
            self.depths[index].cleanup(&mut self.pool);
        }
        Ok(true)
    }

    fn root_id(&self) -> Option<NodeId> {
        self.depths.first()?.searched.first().copied()
    }

    fn best_leaf(&self) -> Option<NodeId> {
        let index = self.last_active_depth()?;
        self.depths[index].unsearched.top().map(|entry| entry.node)
    }

    fn first_active_depth(&self) -> Option<usize> {
        (0..self.depths.len()).find(|&index| self.depths[index].len() > 1)
    }

    fn last_active_depth(&self) -> Option<usize> {
        (0..self.depths.len()).rev().find(|&index| !self.depths[index].is_empty())
    }
}
