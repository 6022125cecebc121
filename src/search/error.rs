use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    LimitUnderflow { node_limit: usize },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitUnderflow { node_limit } => {
                write!(f, "node limit {node_limit} is too low for the state fan-out")
            }
        }
    }
}

impl Error for SearchError {}
