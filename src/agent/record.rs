//! Game history and record export

use std::{fs::File, io::BufWriter, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, board::Mark};

/// One committed move by either side. Indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ply {
    pub board: usize,
    pub position: usize,
    pub mark: Mark,
}

/// Terminal outcome reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// A complete game with history.
///
/// The ply list doubles as the move history: the sub-board each subsequent
/// move must land in is the `position` of the last committed ply. It grows
/// by one entry per committed ply and never shrinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub agent_mark: Mark,
    pub plies: Vec<Ply>,
    pub outcome: Option<Outcome>,
    pub reason: Option<String>,
}

impl GameRecord {
    /// Start an empty record for a game played as `agent_mark`
    pub fn new(agent_mark: Mark) -> Self {
        GameRecord {
            agent_mark,
            plies: Vec::new(),
            outcome: None,
            reason: None,
        }
    }

    /// Append a committed ply
    pub fn push(&mut self, board: usize, position: usize, mark: Mark) {
        self.plies.push(Ply {
            board,
            position,
            mark,
        });
    }

    /// The position of the last committed ply, which selects the sub-board
    /// the next move must land in.
    pub fn last_position(&self) -> Option<usize> {
        self.plies.last().map(|ply| ply.position)
    }

    /// Record the terminal outcome
    pub fn conclude(&mut self, outcome: Outcome, reason: String) {
        self.outcome = Some(outcome);
        self.reason = Some(reason);
    }

    /// Write the record as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create record file {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
