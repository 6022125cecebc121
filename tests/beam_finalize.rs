use beamtree::{NodeId, ParallelTree, SearchState, TreeConfig};

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
struct Cell(i64);

impl SearchState for Cell {
    fn hash(&self) -> u64 {
        self.0 as u64
    }

    fn collides(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

fn submit(tree: &mut ParallelTree<Cell>, parent: NodeId, state: i64, value: f64, depth: usize) {
    let child = tree.allocate_child(0, parent);
    *tree.state_mut(child) = Cell(state);
    assert!(tree.report_child(child, value, depth));
}

fn single_root_task(tree: &mut ParallelTree<Cell>) -> NodeId {
    let batches = tree.get_task_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].worker, 0);
    assert_eq!(batches[0].tasks.len(), 1);
    assert_eq!(batches[0].tasks[0].depth, 0);
    assert_eq!(batches[0].tasks[0].nodes.len(), 1);
    batches[0].tasks[0].nodes[0]
}

fn three_branch_tree() -> (ParallelTree<Cell>, [NodeId; 3]) {
    let mut tree = ParallelTree::new(TreeConfig {
        depth: 2,
        award_width: 4,
        prune_width: 2,
        ..TreeConfig::default()
    });
    tree.reset(&Cell(0), 1);
    let root = single_root_task(&mut tree);

    for branch in 1..=3 {
        submit(&mut tree, root, branch, branch as f64, 1);
    }

    let batches = tree.get_task_batches();
    assert_eq!(batches.len(), 1);
    let mut branches = [root; 3];
    for batch in &batches[0].tasks {
        assert_eq!(batch.depth, 1);
        for &parent in &batch.nodes {
            let index = tree.state(parent).0 as usize - 1;
            branches[index] = parent;
        }
    }

    let leaves: [(usize, f64); 5] = [(0, 10.0), (0, 7.0), (1, 9.0), (1, 6.0), (2, 8.0)];
    for (branch, value) in leaves {
        let parent = branches[branch];
        let state = tree.state(parent).0 * 100 + value as i64;
        submit(&mut tree, parent, state, value, 2);
    }
    assert_eq!(tree.node_count(), 9);
    (tree, branches)
}

#[test]
fn finalize_awards_and_prunes_worst_branch() {
    let (mut tree, _) = three_branch_tree();
    assert!(tree.is_releasable());

    tree.finalize();
    assert_eq!(tree.node_count(), 7);
    assert_eq!(tree.best_next_move(), Some(&Cell(1)));

    assert!(tree.advance_root());
    assert_eq!(tree.root_state(), Some(&Cell(1)));
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.depth_len(0), 1);
    assert_eq!(tree.depth_len(1), 2);
    assert_eq!(tree.depth_len(2), 0);
}

#[test]
fn advance_without_expansion_returns_false() {
    let mut tree = ParallelTree::new(TreeConfig {
        depth: 2,
        ..TreeConfig::default()
    });
    tree.reset(&Cell(0), 1);
    assert!(!tree.advance_root());
    assert!(tree.best_next_move().is_none());
}

#[test]
fn releasability_tracks_deepest_frontier() {
    let mut tree = ParallelTree::new(TreeConfig {
        depth: 2,
        ..TreeConfig::default()
    });
    tree.reset(&Cell(0), 1);
    assert!(!tree.is_releasable());
    assert!(!tree.is_search_complete());

    let root = single_root_task(&mut tree);
    submit(&mut tree, root, 1, 1.0, 1);
    assert!(!tree.is_releasable());

    let batches = tree.get_task_batches();
    let parent = batches[0].tasks[0].nodes[0];
    submit(&mut tree, parent, 2, 2.0, 2);
    assert!(tree.is_releasable());
    assert!(tree.is_search_complete());
}

#[test]
fn duplicate_report_releases_and_counts() {
    let mut tree = ParallelTree::new(TreeConfig {
        depth: 2,
        ..TreeConfig::default()
    });
    tree.reset(&Cell(0), 1);
    let root = single_root_task(&mut tree);

    submit(&mut tree, root, 5, 1.0, 1);
    let duplicate = tree.allocate_child(0, root);
    *tree.state_mut(duplicate) = Cell(5);
    assert!(!tree.report_child(duplicate, 2.0, 1));

    assert_eq!(tree.collision_count(), 1);
    assert_eq!(tree.node_count(), 2);
    assert_eq!(tree.depth_len(1), 1);

    assert!(tree.advance_root());
    assert_eq!(tree.root_state(), Some(&Cell(5)));
}

#[test]
fn awards_bias_toward_frequent_contributors() {
    let mut tree = ParallelTree::new(TreeConfig {
        depth: 2,
        award_width: 4,
        prune_width: 1,
        ..TreeConfig::default()
    });
    tree.reset(&Cell(0), 1);
    let root = single_root_task(&mut tree);
    submit(&mut tree, root, 1, 1.0, 1);
    submit(&mut tree, root, 2, 2.0, 1);

    let batches = tree.get_task_batches();
    let mut branches = [root; 2];
    for batch in &batches[0].tasks {
        for &parent in &batch.nodes {
            branches[tree.state(parent).0 as usize - 1] = parent;
        }
    }

    submit(&mut tree, branches[1], 210, 10.0, 2);
    submit(&mut tree, branches[0], 105, 5.0, 2);
    submit(&mut tree, branches[0], 104, 4.0, 2);
    submit(&mut tree, branches[0], 103, 3.0, 2);

    tree.finalize();
    assert_eq!(tree.node_count(), 5);
    assert!(tree.advance_root());
    assert_eq!(tree.root_state(), Some(&Cell(1)));
    assert_eq!(tree.node_count(), 4);
    assert_eq!(tree.depth_len(1), 3);
}
