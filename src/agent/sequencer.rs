//! Move protocol state machine
//!
//! The sequencer receives committed opponent moves, asks the search for the
//! best reply within the sub-board the meta-linking rule designates, commits
//! that reply, and yields it to the transport.

use log::{debug, info};

use crate::{
    Error, Result,
    board::{BOARD_COUNT, GameBoard, Mark},
    eval::HeuristicTable,
    protocol::Command,
    search::{DEFAULT_DEPTH, MemoCache, MemoScope, SearchConfig, Searcher},
};

use super::record::{GameRecord, Outcome};

/// Where the sequencer is in the game protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing initialized yet
    Uninitialized,
    /// `init` seen; waiting for `start`
    AwaitingStart,
    /// `start` seen; waiting for the opening exchange
    /// (`second_move` or `third_move`)
    AwaitingOpening,
    /// Generic ply loop
    InPlay,
    /// Terminal outcome recorded; no further moves are produced
    Concluded(Outcome),
}

/// What a handled command yields back to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// A chosen position (zero-based) to send back
    Position(usize),
    /// Command handled, nothing to send
    Silent,
    /// `end` received, close the channel
    Terminate,
}

/// Per-game state, created by `start` and dropped on the next `start`
struct GameState {
    board: GameBoard,
    table: HeuristicTable,
    config: SearchConfig,
    record: GameRecord,
    step_count: u32,
}

impl GameState {
    fn new(mark: Mark, memo_scope: MemoScope, initial_depth: usize) -> Self {
        GameState {
            board: GameBoard::new(),
            table: HeuristicTable::seeded(mark),
            config: SearchConfig::new(mark)
                .with_memo_scope(memo_scope)
                .with_max_depth(initial_depth),
            record: GameRecord::new(mark),
            step_count: 0,
        }
    }

    fn agent_mark(&self) -> Mark {
        self.config.agent_mark
    }

    /// Permanently place a mark and append it to the history
    fn commit(&mut self, board: usize, position: usize, mark: Mark) -> Result<()> {
        self.board.apply_move(board, position, mark)?;
        self.record.push(board, position, mark);
        Ok(())
    }
}

/// The move-sequencing state machine.
///
/// Owns the board, the heuristic table and the search configuration; the
/// transposition cache lives outside the per-game state so it persists for
/// the process lifetime.
pub struct Agent {
    memo: MemoCache,
    memo_scope: MemoScope,
    initial_depth: usize,
    game: Option<GameState>,
    phase: Phase,
}

impl Agent {
    pub fn new() -> Self {
        Self::with_memo_scope(MemoScope::default())
    }

    /// Create an agent with an explicit transposition cache keying
    pub fn with_memo_scope(memo_scope: MemoScope) -> Self {
        Self::with_options(memo_scope, DEFAULT_DEPTH)
    }

    /// Create an agent with an explicit cache keying and starting depth
    /// limit. Search latency is bounded only by the depth limit, so callers
    /// that need faster moves cap it here.
    pub fn with_options(memo_scope: MemoScope, initial_depth: usize) -> Self {
        Agent {
            memo: MemoCache::new(),
            memo_scope,
            initial_depth,
            game: None,
            phase: Phase::Uninitialized,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The finished (or in-progress) game record, if a game was started
    pub fn record(&self) -> Option<&GameRecord> {
        self.game.as_ref().map(|game| &game.record)
    }

    /// The current board, if a game was started
    pub fn board(&self) -> Option<&GameBoard> {
        self.game.as_ref().map(|game| &game.board)
    }

    /// The current depth limit, if a game was started
    pub fn search_depth(&self) -> Option<usize> {
        self.game.as_ref().map(|game| game.config.max_depth)
    }

    /// Dispatch one parsed command
    pub fn handle(&mut self, command: Command) -> Result<Reply> {
        match command {
            Command::Init => {
                self.init();
                Ok(Reply::Silent)
            }
            Command::Start { mark } => {
                self.start(mark);
                Ok(Reply::Silent)
            }
            Command::SecondMove { board, position } => {
                self.second_move(board, position).map(Reply::Position)
            }
            Command::ThirdMove {
                board,
                own,
                position,
            } => self.third_move(board, own, position).map(Reply::Position),
            Command::NextMove { position } => self.next_move(position).map(Reply::Position),
            Command::LastMove { position } => {
                self.last_move(position)?;
                Ok(Reply::Silent)
            }
            Command::Win { reason } => {
                self.conclude(Outcome::Win, reason);
                Ok(Reply::Silent)
            }
            Command::Loss { reason } => {
                self.conclude(Outcome::Loss, reason);
                Ok(Reply::Silent)
            }
            Command::Draw { reason } => {
                self.conclude(Outcome::Draw, reason);
                Ok(Reply::Silent)
            }
            Command::End => Ok(Reply::Terminate),
        }
    }

    /// Prepare caches before a game. The transposition cache is created
    /// fresh here and then persists across `start` calls.
    pub fn init(&mut self) {
        self.memo = MemoCache::new();
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::AwaitingStart;
        }
    }

    /// Begin a new game playing `mark`: fresh board, seeded heuristic
    /// table, starting search depth. The transposition cache is kept.
    pub fn start(&mut self, mark: Mark) {
        info!("starting game as {mark}");
        self.game = Some(GameState::new(mark, self.memo_scope, self.initial_depth));
        self.phase = Phase::AwaitingOpening;
    }

    /// Opponent opened at (`board`, `position`); reply in sub-board
    /// `position`.
    pub fn second_move(&mut self, board: usize, position: usize) -> Result<usize> {
        self.expect_phase(Phase::AwaitingOpening, "second_move")?;
        let game = self.game.as_mut().ok_or(Error::GameNotStarted)?;

        let opponent = game.agent_mark().opponent();
        game.commit(board, position, opponent)?;

        let (reply_board, reply) = choose_reply(game, &mut self.memo, position)?;
        game.commit(reply_board, reply, game.agent_mark())?;
        debug!("board after opening:\n{}", game.board);

        self.phase = Phase::InPlay;
        Ok(reply)
    }

    /// Replay our own opening at (`board`, `own`), commit the opponent at
    /// (`own`, `position`), then reply in sub-board `position`.
    pub fn third_move(&mut self, board: usize, own: usize, position: usize) -> Result<usize> {
        self.expect_phase(Phase::AwaitingOpening, "third_move")?;
        let game = self.game.as_mut().ok_or(Error::GameNotStarted)?;

        let mark = game.agent_mark();
        game.commit(board, own, mark)?;
        game.commit(own, position, mark.opponent())?;
        game.step_count += 1;

        let (reply_board, reply) = choose_reply(game, &mut self.memo, position)?;
        game.commit(reply_board, reply, mark)?;
        debug!("board after opening:\n{}", game.board);

        self.phase = Phase::InPlay;
        Ok(reply)
    }

    /// Commit the opponent's move at the sub-board implied by the last
    /// committed ply, then reply in sub-board `position`. One call per
    /// round; the depth limit escalates here.
    pub fn next_move(&mut self, position: usize) -> Result<usize> {
        self.expect_phase(Phase::InPlay, "next_move")?;
        let game = self.game.as_mut().ok_or(Error::GameNotStarted)?;

        let target = game
            .record
            .last_position()
            .ok_or(Error::OutOfSequence {
                command: "next_move",
            })?;
        game.commit(target, position, game.agent_mark().opponent())?;

        game.step_count += 1;
        game.config.escalate(game.step_count);
        debug!(
            "round {}: searching at depth {}",
            game.step_count, game.config.max_depth
        );

        let (reply_board, reply) = choose_reply(game, &mut self.memo, position)?;
        game.commit(reply_board, reply, game.agent_mark())?;
        Ok(reply)
    }

    /// Commit the opponent's final move; no reply is produced.
    pub fn last_move(&mut self, position: usize) -> Result<()> {
        self.expect_phase(Phase::InPlay, "last_move")?;
        let game = self.game.as_mut().ok_or(Error::GameNotStarted)?;

        let target = game
            .record
            .last_position()
            .ok_or(Error::OutOfSequence {
                command: "last_move",
            })?;
        game.commit(target, position, game.agent_mark().opponent())?;
        Ok(())
    }

    /// Record the terminal outcome; no further moves are produced.
    pub fn conclude(&mut self, outcome: Outcome, reason: String) {
        info!("game concluded: {outcome:?} ({reason})");
        if let Some(game) = self.game.as_mut() {
            game.record.conclude(outcome, reason);
            debug!("final board:\n{}", game.board);
        }
        self.phase = Phase::Concluded(outcome);
    }

    fn expect_phase(&self, expected: Phase, command: &'static str) -> Result<()> {
        if self.game.is_none() {
            return Err(Error::GameNotStarted);
        }
        if self.phase != expected {
            return Err(Error::OutOfSequence { command });
        }
        Ok(())
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

/// Search the designated sub-board for the best reply; when it is full,
/// fall back to the best reply across all other sub-boards (ascending
/// board order, strict comparison, so ties resolve to the lowest board and
/// position).
fn choose_reply(
    game: &mut GameState,
    memo: &mut MemoCache,
    designated: usize,
) -> Result<(usize, usize)> {
    let mut searcher = Searcher::new(&mut game.board, &mut game.table, memo, &game.config);

    if let Some(best) = searcher.best_move(designated) {
        return Ok((designated, best.position));
    }

    debug!("sub-board {designated} is full, searching all boards");
    let mut overall: Option<(usize, usize, i32)> = None;
    for board in 0..BOARD_COUNT {
        if board == designated {
            continue;
        }
        if let Some(best) = searcher.best_move(board) {
            if overall.is_none_or(|(_, _, score)| best.score > score) {
                overall = Some((board, best.position, best.score));
            }
        }
    }

    overall
        .map(|(board, position, _)| (board, position))
        .ok_or(Error::NoLegalMoves)
}
