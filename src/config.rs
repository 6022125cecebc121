use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub depth: usize,
    pub depth_task_size: usize,
    pub node_limit: usize,
    pub prune_depth_limit: usize,
    pub prune_width: usize,
    pub award_width: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: 7,
            depth_task_size: 16,
            node_limit: 100_000,
            prune_depth_limit: 0,
            prune_width: 1,
            award_width: 25,
        }
    }
}

impl TreeConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
