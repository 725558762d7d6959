//! Nine-board Tic-Tac-Toe agent binary
//!
//! Connects to the game server, reads line commands, and writes each chosen
//! position back as its own line.

use std::{
    io::{BufRead, BufReader, Write},
    net::TcpStream,
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use nineboard::{
    agent::{Agent, Reply},
    protocol,
    search::{DEFAULT_DEPTH, MemoScope},
};

#[derive(Parser, Debug)]
#[command(name = "nineboard")]
#[command(version, about = "Nine-board Tic-Tac-Toe playing agent", long_about = None)]
struct Args {
    /// Server port to connect to
    #[arg(short, long)]
    port: u16,

    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Starting search depth; escalates as the game progresses
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// Key the transposition cache by board configuration alone
    /// (historical behavior; cached values may have been computed under a
    /// different depth limit or for the other side)
    #[arg(long)]
    board_only_memo: bool,

    /// Write the finished game as JSON to this path
    #[arg(long)]
    record: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stream = TcpStream::connect((args.host.as_str(), args.port))
        .with_context(|| format!("failed to connect to {}:{}", args.host, args.port))?;
    let mut reader = BufReader::new(stream.try_clone().context("failed to clone stream")?);
    let mut writer = stream;

    let scope = if args.board_only_memo {
        MemoScope::BoardOnly
    } else {
        MemoScope::BoardSideDepth
    };
    let mut agent = Agent::with_options(scope, args.depth);
    info!("connected to {}:{}", args.host, args.port);

    let mut line = String::new();
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .context("failed to read from server")?;
        if read == 0 {
            // server closed the channel
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = protocol::parse(&line)? else {
            warn!("ignoring unrecognized command: {}", line.trim());
            continue;
        };
        match agent.handle(command)? {
            Reply::Position(position) => {
                writeln!(writer, "{}", protocol::format_position(position))
                    .context("failed to write reply")?;
            }
            Reply::Silent => {}
            Reply::Terminate => break,
        }
    }

    if let Some(path) = args.record {
        if let Some(record) = agent.record() {
            record.save(&path)?;
            info!("wrote game record to {}", path.display());
        }
    }

    Ok(())
}
