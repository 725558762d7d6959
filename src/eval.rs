//! Heuristic evaluation of sub-board configurations
//!
//! Scores are always from the agent's perspective: positive favors the
//! agent's mark, negative favors the opponent. A sub-board is scored by
//! summing, over the 8 winning lines, a tiered value (10000/100/10 for
//! three/two/one unopposed marks) multiplied by the line's positional
//! weight.

use std::collections::HashMap;

use crate::board::{
    BOARD_COUNT, Cell, GameBoard, Mark, encode_cells,
    lines::{WINNING_LINES, line_weight},
};

/// Number of distinct 3x3 sub-board configurations (3^9)
const CONFIGURATION_COUNT: usize = 19_683;

/// Precomputed scores for every reachable sub-board configuration.
///
/// Seeded once per game (the scores depend on which mark the agent plays)
/// and read-only thereafter, except that lookups of unseeded keys fall back
/// to direct computation and populate the table, so the table and the
/// on-the-fly computation never disagree.
#[derive(Debug, Clone)]
pub struct HeuristicTable {
    agent: Mark,
    scores: HashMap<String, i32>,
}

impl HeuristicTable {
    /// Create an empty table scoring from `agent`'s perspective
    pub fn new(agent: Mark) -> Self {
        HeuristicTable {
            agent,
            scores: HashMap::new(),
        }
    }

    /// Create a table with all 3^9 configurations precomputed
    pub fn seeded(agent: Mark) -> Self {
        let mut table = Self::new(agent);
        table.seed();
        table
    }

    /// Precompute scores for every sub-board configuration
    pub fn seed(&mut self) {
        self.scores.reserve(CONFIGURATION_COUNT);
        for code in 0..CONFIGURATION_COUNT {
            let cells = cells_from_code(code);
            let score = compute_score(&cells, self.agent);
            self.scores.insert(encode_cells(&cells), score);
        }
    }

    /// The mark the table scores for
    pub fn agent(&self) -> Mark {
        self.agent
    }

    /// Number of cached configurations
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score one sub-board, computing and caching any unseeded configuration
    pub fn score_sub(&mut self, cells: &[Cell; 9]) -> i32 {
        let key = encode_cells(cells);
        if let Some(&score) = self.scores.get(&key) {
            return score;
        }
        let score = compute_score(cells, self.agent);
        self.scores.insert(key, score);
        score
    }

    /// Full-board heuristic: the sum of the nine sub-board scores
    pub fn score_board(&mut self, board: &GameBoard) -> i32 {
        (0..BOARD_COUNT).map(|b| self.score_sub(board.sub_board(b))).sum()
    }
}

/// Compute a sub-board score directly from its cells
pub fn compute_score(cells: &[Cell; 9], agent: Mark) -> i32 {
    WINNING_LINES
        .iter()
        .map(|line| line_score(cells, line, agent) * line_weight(line))
        .sum()
}

/// Tiered value of one line: unopposed three/two/one in a line score
/// 10000/100/10, positive for the agent and negative for the opponent;
/// any line holding both marks scores zero.
pub fn line_score(cells: &[Cell; 9], line: &[usize; 3], agent: Mark) -> i32 {
    let own_cell = agent.to_cell();
    let mut own = 0;
    let mut theirs = 0;
    for &idx in line {
        match cells[idx] {
            Cell::Empty => {}
            c if c == own_cell => own += 1,
            _ => theirs += 1,
        }
    }
    match (own, theirs) {
        (3, 0) => 10_000,
        (2, 0) => 100,
        (1, 0) => 10,
        (0, 3) => -10_000,
        (0, 2) => -100,
        (0, 1) => -10,
        _ => 0,
    }
}

/// Decode a configuration index (base-3 digits) into cells
fn cells_from_code(mut code: usize) -> [Cell; 9] {
    let mut cells = [Cell::Empty; 9];
    for cell in &mut cells {
        *cell = match code % 3 {
            0 => Cell::Empty,
            1 => Cell::X,
            _ => Cell::O,
        };
        code /= 3;
    }
    cells
}
