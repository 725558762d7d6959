//! Board state representation and basic operations
//!
//! Nine 3x3 sub-boards are linked by the rule that the position played inside
//! one sub-board selects the sub-board the opponent must play in next. All
//! indices here are zero-based; the wire protocol's 1-9 encoding is converted
//! at the protocol boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::has_line;
use crate::{Error, Result};

/// Number of linked sub-boards (and cells per sub-board)
pub const BOARD_COUNT: usize = 9;

/// A cell on one 3x3 sub-board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player's mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the opposing mark
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Convert mark to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }

    /// Parse a mark from its wire form (`x` or `o`, either case)
    pub fn parse(s: &str) -> Result<Mark> {
        match s {
            "x" | "X" => Ok(Mark::X),
            "o" | "O" => Ok(Mark::O),
            _ => Err(Error::InvalidMark {
                mark: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "x"),
            Mark::O => write!(f, "o"),
        }
    }
}

/// Encode one sub-board's cells as a 9-character key string
pub fn encode_cells(cells: &[Cell; 9]) -> String {
    cells.iter().map(|&c| c.to_char()).collect()
}

/// The nine linked sub-boards
///
/// Cells move only from `Empty` to a mark (`apply_move`) and back to `Empty`
/// during search backtracking (`undo_move`). The sequencer owns the board;
/// the search borrows it mutably for one call and restores it before
/// returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameBoard {
    boards: [[Cell; 9]; 9],
}

impl GameBoard {
    /// Create a board with all 81 cells empty
    pub fn new() -> Self {
        GameBoard {
            boards: [[Cell::Empty; 9]; 9],
        }
    }

    /// Get cell at (`board`, `pos`), both 0-8
    pub fn get(&self, board: usize, pos: usize) -> Cell {
        self.boards[board][pos]
    }

    /// Check if a cell is empty
    pub fn is_empty(&self, board: usize, pos: usize) -> bool {
        self.boards[board][pos] == Cell::Empty
    }

    /// All cells of one sub-board
    pub fn sub_board(&self, board: usize) -> &[Cell; 9] {
        &self.boards[board]
    }

    /// Empty positions of one sub-board, in ascending order.
    ///
    /// An empty result means the sub-board is full; that is a valid outcome,
    /// not a failure.
    pub fn legal_moves(&self, board: usize) -> Vec<usize> {
        self.boards[board]
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place `mark` on an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OccupiedCell`] when the cell already holds a mark.
    pub fn apply_move(&mut self, board: usize, pos: usize, mark: Mark) -> Result<()> {
        debug_assert!(board < BOARD_COUNT && pos < BOARD_COUNT);
        if self.boards[board][pos] != Cell::Empty {
            return Err(Error::OccupiedCell {
                board,
                position: pos,
            });
        }
        self.boards[board][pos] = mark.to_cell();
        Ok(())
    }

    /// Restore a cell to empty; callers pair every `apply_move` with an
    /// `undo_move` unless the move is being permanently committed.
    pub fn undo_move(&mut self, board: usize, pos: usize) {
        debug_assert!(self.boards[board][pos] != Cell::Empty);
        self.boards[board][pos] = Cell::Empty;
    }

    /// Check whether `mark` has completed a line on any sub-board.
    ///
    /// This is a local-win query on the sub-boards, not a terminal test of
    /// the full linked game; the search uses it to stop expanding once the
    /// side to move already holds a completed line.
    pub fn has_won(&self, mark: Mark) -> bool {
        self.boards.iter().any(|cells| has_line(cells, mark))
    }

    /// Encode the whole board as an 81-character key string
    pub fn encode(&self) -> String {
        let mut key = String::with_capacity(81);
        for cells in &self.boards {
            for &cell in cells {
                key.push(cell.to_char());
            }
        }
        key
    }
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for band in 0..3 {
            for row in 0..3 {
                for board in (band * 3)..(band * 3 + 3) {
                    for pos in (row * 3)..(row * 3 + 3) {
                        write!(f, " {}", self.boards[board][pos].to_char())?;
                    }
                    if board % 3 < 2 {
                        write!(f, " |")?;
                    }
                }
                writeln!(f)?;
            }
            if band < 2 {
                writeln!(f, " ------+-------+------")?;
            }
        }
        Ok(())
    }
}
