//! End-to-end protocol sequencing: parsed commands driving the sequencer.

use anyhow::Result;
use nineboard::{
    Agent, Cell, Error, GameRecord, Mark, Outcome, Phase, Reply, protocol,
    search::MemoScope,
};

/// An agent with a shallow search so the tests stay fast; the depth limit
/// only bounds latency, not protocol behavior.
fn test_agent() -> Agent {
    Agent::with_options(MemoScope::default(), 3)
}

fn drive(agent: &mut Agent, line: &str) -> Result<Reply> {
    let command = protocol::parse(line)?.expect("recognized command");
    Ok(agent.handle(command)?)
}

#[test]
fn opening_reply_lands_in_the_linked_sub_board() -> Result<()> {
    let mut agent = test_agent();
    drive(&mut agent, "start(x)")?;

    let reply = drive(&mut agent, "second_move(2,5)")?;
    let Reply::Position(position) = reply else {
        panic!("expected a position, got {reply:?}");
    };

    // wire sub-board 5 is internal board 4; the reply must be a previously
    // empty cell there, now holding our mark
    let board = agent.board().unwrap();
    assert_eq!(board.get(1, 4), Cell::O);
    assert_eq!(board.get(4, position), Cell::X);
    Ok(())
}

#[test]
fn identical_openings_give_identical_replies() -> Result<()> {
    let mut first = test_agent();
    drive(&mut first, "start(x)")?;
    let a = drive(&mut first, "second_move(2,5)")?;

    let mut second = test_agent();
    drive(&mut second, "start(x)")?;
    let b = drive(&mut second, "second_move(2,5)")?;

    assert_eq!(a, b);
    Ok(())
}

#[test]
fn a_full_round_trip_game() -> Result<()> {
    let mut agent = test_agent();
    assert_eq!(drive(&mut agent, "init()")?, Reply::Silent);
    assert_eq!(drive(&mut agent, "start(o)")?, Reply::Silent);

    let Reply::Position(reply) = drive(&mut agent, "second_move(1,1)")? else {
        panic!("expected a reply position");
    };

    // opponent answers in the sub-board our reply selected
    let opp_pos = agent
        .board()
        .unwrap()
        .legal_moves(reply)
        .first()
        .copied()
        .unwrap();
    let next = drive(&mut agent, &format!("next_move({})", opp_pos + 1))?;
    assert!(matches!(next, Reply::Position(_)));

    assert_eq!(
        drive(&mut agent, "win(triple win)")?,
        Reply::Silent
    );
    assert_eq!(agent.phase(), Phase::Concluded(Outcome::Win));
    assert_eq!(drive(&mut agent, "end()")?, Reply::Terminate);

    let record = agent.record().unwrap();
    assert_eq!(record.agent_mark, Mark::O);
    assert_eq!(record.outcome, Some(Outcome::Win));
    assert_eq!(record.plies.len(), 4);
    Ok(())
}

#[test]
fn replies_format_to_wire_positions() -> Result<()> {
    let mut agent = test_agent();
    drive(&mut agent, "start(x)")?;
    let Reply::Position(position) = drive(&mut agent, "second_move(9,9)")? else {
        panic!("expected a reply position");
    };
    let wire = protocol::format_position(position);
    let value: usize = wire.parse()?;
    assert!((1..=9).contains(&value));
    Ok(())
}

#[test]
fn unrecognized_lines_parse_to_none() {
    assert_eq!(protocol::parse("frobnicate(1,2,3)").unwrap(), None);
    assert_eq!(protocol::parse("   ").unwrap(), None);
}

#[test]
fn ply_commands_before_start_are_errors() {
    let mut agent = test_agent();
    let command = protocol::parse("next_move(4)").unwrap().unwrap();
    assert!(matches!(
        agent.handle(command),
        Err(Error::GameNotStarted)
    ));
}

#[test]
fn record_round_trips_through_json() -> Result<()> {
    let mut agent = test_agent();
    drive(&mut agent, "start(x)")?;
    drive(&mut agent, "second_move(3,7)")?;
    drive(&mut agent, "loss(opponent tripled)")?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("game.json");
    agent.record().unwrap().save(&path)?;

    let loaded: GameRecord = serde_json::from_reader(std::fs::File::open(&path)?)?;
    assert_eq!(loaded.agent_mark, Mark::X);
    assert_eq!(loaded.outcome, Some(Outcome::Loss));
    assert_eq!(loaded.plies, agent.record().unwrap().plies);
    Ok(())
}
