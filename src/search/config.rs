//! Search configuration and the depth escalation policy

use serde::{Deserialize, Serialize};

use crate::board::Mark;

/// Search depth at the start of a game
pub const DEFAULT_DEPTH: usize = 7;

/// Hard ceiling on the search depth
pub const DEPTH_CAP: usize = 14;

/// How transposition cache entries are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemoScope {
    /// Key by board configuration, side to move, remaining depth and the
    /// designated sub-board.
    #[default]
    BoardSideDepth,
    /// Key by board configuration alone. Historical behavior: a cached value
    /// computed under a different depth limit or for the other side can be
    /// returned verbatim.
    BoardOnly,
}

/// Per-game search parameters, owned by the sequencer and passed by
/// reference into every search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// The mark the agent plays (the maximizing side)
    pub agent_mark: Mark,
    /// Current depth limit
    pub max_depth: usize,
    /// Transposition cache keying
    pub memo_scope: MemoScope,
}

impl SearchConfig {
    /// Create a config with the starting depth limit
    pub fn new(agent_mark: Mark) -> Self {
        SearchConfig {
            agent_mark,
            max_depth: DEFAULT_DEPTH,
            memo_scope: MemoScope::default(),
        }
    }

    /// Set the transposition cache keying
    pub fn with_memo_scope(mut self, scope: MemoScope) -> Self {
        self.memo_scope = scope;
        self
    }

    /// Set the starting depth limit. Callers that need bounded latency cap
    /// the depth here; escalation still applies on top of it.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Apply the per-round depth escalation policy after `step_count`
    /// completed rounds.
    pub fn escalate(&mut self, step_count: u32) {
        if escalates(step_count, self.max_depth) {
            self.max_depth += 1;
        }
    }
}

/// Whether the depth limit grows after `step_count` completed rounds.
///
/// Early game: one extra ply every third round. Late game (round 17 on):
/// every other round, until the cap.
pub fn escalates(step_count: u32, max_depth: usize) -> bool {
    (step_count % 3 == 0 && step_count < 16)
        || (step_count % 2 == 0 && step_count >= 17 && max_depth < DEPTH_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_trajectory_over_a_long_game() {
        let mut config = SearchConfig::new(Mark::X);
        let mut trajectory = Vec::new();
        for step in 1..=24 {
            config.escalate(step);
            trajectory.push((step, config.max_depth));
        }

        // escalates at rounds 3, 6, 9, 12, 15, then even rounds from 18
        let expected: Vec<usize> = vec![
            7, 7, 8, 8, 8, 9, 9, 9, 10, 10, 10, 11, 11, 11, 12, 12, 12, 13, 13, 14, 14, 14, 14, 14,
        ];
        let depths: Vec<usize> = trajectory.iter().map(|&(_, d)| d).collect();
        assert_eq!(depths, expected);
    }

    #[test]
    fn depth_never_exceeds_cap() {
        let mut config = SearchConfig::new(Mark::O);
        for step in 1..=200 {
            config.escalate(step);
        }
        assert_eq!(config.max_depth, DEPTH_CAP);
    }

    #[test]
    fn odd_late_rounds_do_not_escalate() {
        assert!(!escalates(17, 10));
        assert!(escalates(18, 10));
        assert!(!escalates(19, 10));
        assert!(!escalates(18, DEPTH_CAP));
    }
}
