//! Depth-limited alpha-beta search with memoization

pub mod config;
pub mod engine;
pub mod memo;

pub use config::{DEFAULT_DEPTH, DEPTH_CAP, MemoScope, SearchConfig, escalates};
pub use engine::{BestMove, Searcher};
pub use memo::MemoCache;
