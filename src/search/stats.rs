use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TreeStats {
    pub searched: u64,
    pub collisions: u64,
}
