//! Text-line command protocol
//!
//! Commands arrive as `name(args)` lines. Parsing produces a tagged
//! [`Command`] so that dispatch is an exhaustive match, and converts the
//! wire's 1-9 board and position numbers to the zero-based indices used
//! everywhere else. Replies travel the other way through
//! [`format_position`].

use crate::{Error, Result, board::Mark};

/// A parsed server command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init,
    Start {
        mark: Mark,
    },
    /// Opponent opened at (`board`, `position`); reply in sub-board
    /// `position`
    SecondMove {
        board: usize,
        position: usize,
    },
    /// Replay our own opening at (`board`, `own`), then the opponent's move
    /// at (`own`, `position`)
    ThirdMove {
        board: usize,
        own: usize,
        position: usize,
    },
    NextMove {
        position: usize,
    },
    LastMove {
        position: usize,
    },
    Win {
        reason: String,
    },
    Loss {
        reason: String,
    },
    Draw {
        reason: String,
    },
    End,
}

/// Parse one line into a command.
///
/// Returns `Ok(None)` for lines that are not a recognized `name(args)`
/// command; those are ignored by the caller. Malformed arguments to a
/// recognized command are an error.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    let Some((name, rest)) = line.split_once('(') else {
        return Ok(None);
    };
    let Some(args) = rest.strip_suffix(')') else {
        return Ok(None);
    };

    let command = match name {
        "init" => Command::Init,
        "start" => Command::Start {
            mark: Mark::parse(args.trim())?,
        },
        "second_move" => {
            let [board, position] = parse_indices(name, args)?;
            Command::SecondMove { board, position }
        }
        "third_move" => {
            let [board, own, position] = parse_indices(name, args)?;
            Command::ThirdMove {
                board,
                own,
                position,
            }
        }
        "next_move" => {
            let [position] = parse_indices(name, args)?;
            Command::NextMove { position }
        }
        "last_move" => {
            let [position] = parse_indices(name, args)?;
            Command::LastMove { position }
        }
        "win" => Command::Win {
            reason: args.to_string(),
        },
        "loss" => Command::Loss {
            reason: args.to_string(),
        },
        "draw" => Command::Draw {
            reason: args.to_string(),
        },
        "end" => Command::End,
        _ => return Ok(None),
    };
    Ok(Some(command))
}

/// Format a zero-based position for the wire (1-9)
pub fn format_position(position: usize) -> String {
    (position + 1).to_string()
}

/// Parse exactly `N` comma-separated wire indices (1-9), converting each to
/// its zero-based form.
fn parse_indices<const N: usize>(command: &str, args: &str) -> Result<[usize; N]> {
    let malformed = || Error::MalformedArguments {
        command: command.to_string(),
        args: args.to_string(),
    };

    let mut out = [0usize; N];
    let mut parts = args.split(',');
    for slot in &mut out {
        let part = parts.next().ok_or_else(malformed)?;
        let value: u64 = part.trim().parse().map_err(|_| malformed())?;
        if !(1..=9).contains(&value) {
            return Err(Error::IndexOutOfRange { value });
        }
        *slot = (value - 1) as usize;
    }
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(parse("init()").unwrap(), Some(Command::Init));
        assert_eq!(
            parse("start(x)").unwrap(),
            Some(Command::Start { mark: Mark::X })
        );
        assert_eq!(
            parse("second_move(2,5)").unwrap(),
            Some(Command::SecondMove {
                board: 1,
                position: 4
            })
        );
        assert_eq!(
            parse("third_move(6,1,9)").unwrap(),
            Some(Command::ThirdMove {
                board: 5,
                own: 0,
                position: 8
            })
        );
        assert_eq!(
            parse("next_move(7)").unwrap(),
            Some(Command::NextMove { position: 6 })
        );
        assert_eq!(
            parse("last_move(1)").unwrap(),
            Some(Command::LastMove { position: 0 })
        );
        assert_eq!(
            parse("win(triple)").unwrap(),
            Some(Command::Win {
                reason: "triple".to_string()
            })
        );
        assert_eq!(
            parse("loss(triple)").unwrap(),
            Some(Command::Loss {
                reason: "triple".to_string()
            })
        );
        assert_eq!(
            parse("draw(full board)").unwrap(),
            Some(Command::Draw {
                reason: "full board".to_string()
            })
        );
        assert_eq!(parse("end()").unwrap(), Some(Command::End));
    }

    #[test]
    fn unrecognized_commands_are_none() {
        assert_eq!(parse("hello(1,2)").unwrap(), None);
        assert_eq!(parse("not a command").unwrap(), None);
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("next_move(3").unwrap(), None);
    }

    #[test]
    fn whitespace_is_tolerated() {
        assert_eq!(
            parse("  second_move( 2 , 5 )\n").unwrap(),
            Some(Command::SecondMove {
                board: 1,
                position: 4
            })
        );
    }

    #[test]
    fn malformed_arguments_are_errors() {
        assert!(matches!(
            parse("next_move(abc)"),
            Err(Error::MalformedArguments { .. })
        ));
        assert!(matches!(
            parse("second_move(2)"),
            Err(Error::MalformedArguments { .. })
        ));
        assert!(matches!(
            parse("next_move(3,4)"),
            Err(Error::MalformedArguments { .. })
        ));
        assert!(matches!(
            parse("start(q)"),
            Err(Error::InvalidMark { .. })
        ));
    }

    #[test]
    fn out_of_range_indices_are_errors() {
        assert!(matches!(
            parse("next_move(0)"),
            Err(Error::IndexOutOfRange { value: 0 })
        ));
        assert!(matches!(
            parse("next_move(10)"),
            Err(Error::IndexOutOfRange { value: 10 })
        ));
    }

    #[test]
    fn format_position_uses_wire_numbering() {
        assert_eq!(format_position(0), "1");
        assert_eq!(format_position(8), "9");
    }
}
