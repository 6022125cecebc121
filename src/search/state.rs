/// Contract the engine requires from a user-defined search state.
///
/// `hash` and `collides` drive per-depth transposition deduplication: two
/// states at the same depth are treated as one search context when their
/// hashes land in the same bucket and `collides` returns true. The `Default`
/// bound lets the node pool build fresh slots the caller overwrites in place.
pub trait SearchState: Clone + Default {
    fn hash(&self) -> u64;
    fn collides(&self, other: &Self) -> bool;
}
