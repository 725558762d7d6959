//! Alpha-beta search over the linked boards

use crate::{
    board::{GameBoard, Mark},
    eval::HeuristicTable,
};

use super::{config::SearchConfig, memo::MemoCache};

/// A chosen position together with the score the search assigned it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMove {
    pub position: usize,
    pub score: i32,
}

/// One search invocation over borrowed game state.
///
/// The searcher mutates the board in place while exploring hypothetical
/// moves and restores it before returning: every `apply_move` is paired
/// with an `undo_move`. Candidates are always visited in ascending position
/// order, so results are deterministic for a given board and config.
pub struct Searcher<'a> {
    board: &'a mut GameBoard,
    table: &'a mut HeuristicTable,
    memo: &'a mut MemoCache,
    config: &'a SearchConfig,
}

impl<'a> Searcher<'a> {
    pub fn new(
        board: &'a mut GameBoard,
        table: &'a mut HeuristicTable,
        memo: &'a mut MemoCache,
        config: &'a SearchConfig,
    ) -> Self {
        Searcher {
            board,
            table,
            memo,
            config,
        }
    }

    /// Pick the best reply inside the designated sub-board.
    ///
    /// Returns `None` when the sub-board has no empty cell; this is distinct
    /// from any chosen position and callers must handle it explicitly. On
    /// ties the first (lowest) position is kept.
    pub fn best_move(&mut self, sub_board: usize) -> Option<BestMove> {
        let mark = self.config.agent_mark;
        let mut best: Option<BestMove> = None;

        for pos in self.board.legal_moves(sub_board) {
            self.board
                .apply_move(sub_board, pos, mark)
                .expect("legal move generation should not fail");
            let score = self.search(1, mark.opponent(), i32::MIN, i32::MAX, pos);
            self.board.undo_move(sub_board, pos);

            if best.is_none_or(|b| score > b.score) {
                best = Some(BestMove {
                    position: pos,
                    score,
                });
            }
        }

        best
    }

    /// Depth-limited alpha-beta over the linked boards.
    ///
    /// Total for any well-formed board: an empty candidate set is a
    /// stalemate-like leaf worth 0 (not cached); reaching the depth limit,
    /// or the side to move already holding a completed line, evaluates the
    /// full board heuristically.
    fn search(
        &mut self,
        depth: usize,
        side: Mark,
        mut alpha: i32,
        mut beta: i32,
        sub_board: usize,
    ) -> i32 {
        let depth_remaining = self.config.max_depth.saturating_sub(depth);
        let key = MemoCache::key(
            self.config.memo_scope,
            self.board,
            side,
            depth_remaining,
            sub_board,
        );
        if let Some(value) = self.memo.get(&key) {
            return value;
        }

        let candidates = self.board.legal_moves(sub_board);
        if candidates.is_empty() {
            return 0;
        }

        if depth == self.config.max_depth || self.board.has_won(side) {
            let value = self.table.score_board(self.board);
            self.memo.insert(key, value);
            return value;
        }

        let maximizing = side == self.config.agent_mark;
        let mut value = if maximizing { i32::MIN } else { i32::MAX };

        for pos in candidates {
            self.board
                .apply_move(sub_board, pos, side)
                .expect("legal move generation should not fail");
            let score = self.search(depth + 1, side.opponent(), alpha, beta, pos);
            self.board.undo_move(sub_board, pos);

            if maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
            } else {
                value = value.min(score);
                beta = beta.min(value);
            }
            if alpha >= beta {
                break;
            }
        }

        self.memo.insert(key, value);
        value
    }
}
